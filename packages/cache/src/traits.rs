//! The cache contract.

use std::io::Read;
use std::sync::Arc;

use crate::CacheError;

/// Numeric identifier of a node in the remote store.
pub type NodeId = i64;

/// Byte-range addressable storage for node content.
///
/// Implementations MUST be safe to use concurrently: `get`, `put` and `evict`
/// may be called from several threads at once, which is why the methods take
/// `&self` and the trait requires `Send + Sync`.
///
/// The only consistency required is that a `get` following a `put` for the
/// same id, with no `evict` in between, observes the content that was put.
/// Anything stronger is a property of a particular implementation.
///
/// # Object Safety
///
/// This trait is object-safe: the client holds an `Arc<dyn Cache>`.
pub trait Cache: Send + Sync {
    /// Read `size` bytes of node `id` starting at `offset`.
    ///
    /// A `size` of `None` reads to the end of the content. Returns
    /// [`CacheError::NotCached`] when nothing is stored for `id`.
    fn get(
        &self,
        id: NodeId,
        offset: u64,
        size: Option<u64>,
    ) -> Result<Box<dyn Read + Send>, CacheError>;

    /// Store the whole content of node `id`, replacing anything cached.
    fn put(&self, id: NodeId, content: &mut dyn Read) -> Result<(), CacheError>;

    /// Drop whatever is cached for node `id`. Evicting an absent id is not an
    /// error.
    fn evict(&self, id: NodeId) -> Result<(), CacheError>;
}

impl<T: Cache + ?Sized> Cache for Arc<T> {
    fn get(
        &self,
        id: NodeId,
        offset: u64,
        size: Option<u64>,
    ) -> Result<Box<dyn Read + Send>, CacheError> {
        self.as_ref().get(id, offset, size)
    }

    fn put(&self, id: NodeId, content: &mut dyn Read) -> Result<(), CacheError> {
        self.as_ref().put(id, content)
    }

    fn evict(&self, id: NodeId) -> Result<(), CacheError> {
        self.as_ref().evict(id)
    }
}

impl<T: Cache + ?Sized> Cache for Box<T> {
    fn get(
        &self,
        id: NodeId,
        offset: u64,
        size: Option<u64>,
    ) -> Result<Box<dyn Read + Send>, CacheError> {
        self.as_ref().get(id, offset, size)
    }

    fn put(&self, id: NodeId, content: &mut dyn Read) -> Result<(), CacheError> {
        self.as_ref().put(id, content)
    }

    fn evict(&self, id: NodeId) -> Result<(), CacheError> {
        self.as_ref().evict(id)
    }
}
