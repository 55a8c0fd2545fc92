//! # oxygen-http
//!
//! Blocking HTTP client for the Oxygen storage service.
//!
//! The service stores a tree of nodes (directories and files) addressable by
//! numeric id or by slash-delimited path. Each client operation is a single
//! HTTP exchange; node metadata travels in the `Node-Id`, `Node-Type` and
//! `Node-Size` response headers rather than in a body.
//!
//! ```ignore
//! use std::io::Read;
//! use oxygen_http::{ByteRange, HttpClient};
//!
//! let client = HttpClient::new("https://oxygen.example.com", "my-token")?;
//!
//! let attr = client.create_path("a/b", "hello".as_bytes())?;
//! let (attr, mut content) = client.read_node(attr.id, ByteRange::window(1, 3))?;
//!
//! let mut text = String::new();
//! content.read_to_string(&mut text)?;
//! assert_eq!(text, "ell");
//! ```
//!
//! ## Layers
//!
//! - [`target`] builds request URLs and their `id` / `overwrite` flags.
//! - [`request`] turns a target into a method-specific request with the
//!   token and any `Range` header.
//! - [`executor`] sends it. [`ReqwestExecutor`] is the production
//!   implementation; [`DiagnosticExecutor`] wraps any executor to log
//!   exchanges.
//! - [`attributes`] decodes the node headers of a successful response and
//!   [`error::classify`] turns a failed one into an [`Error`].
//! - [`HttpClient`] ties them together.

pub mod attributes;
pub mod codes;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod executor;
pub mod request;
pub mod target;
pub mod types;

mod client;

pub use oxygen_cache::{Cache, CacheError, MemoryCache, NodeId};

pub use attributes::{NodeAttributes, NodeKind};
pub use client::{HttpClient, NodeContent, ROOT_NODE_ID};
pub use codes::{ErrorCode, ErrorEnvelope};
pub use config::ClientConfig;
pub use diagnostics::DiagnosticExecutor;
pub use error::Error;
pub use executor::{HttpExecutor, ReqwestExecutor};
pub use request::ByteRange;
pub use target::{Endpoint, RequestTarget};
pub use types::{Method, PreparedRequest, RawResponse, RequestBody};
