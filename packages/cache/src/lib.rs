//! # oxygen-cache
//!
//! The caching contract consumed by the Oxygen client.
//!
//! A cache stores the whole content of a node, keyed by node id, and serves
//! arbitrary `(offset, size)` windows of it. The client never caches on its
//! own; it only talks to an implementation of [`Cache`] supplied by the caller.
//!
//! # Example
//!
//! ```rust
//! use std::io::Read;
//! use oxygen_cache::{Cache, MemoryCache};
//!
//! let cache = MemoryCache::new();
//! cache.put(7, &mut "hello".as_bytes()).unwrap();
//!
//! let mut window = String::new();
//! cache.get(7, 1, Some(3)).unwrap().read_to_string(&mut window).unwrap();
//! assert_eq!(window, "ell");
//! ```

mod error;
mod memory;
mod traits;

pub use error::CacheError;
pub use memory::MemoryCache;
pub use traits::{Cache, NodeId};
