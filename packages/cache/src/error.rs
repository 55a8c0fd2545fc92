//! Error types for cache implementations.

use crate::NodeId;

/// Errors returned by a [`Cache`](crate::Cache).
///
/// `NotCached` is the expected miss and callers fall back to the service on
/// it. Every other variant is a real failure of the cache itself.
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    /// Nothing is cached for this node.
    #[error("node {id} is not cached")]
    NotCached { id: NodeId },

    /// Reading the content to store, or the stored content, failed.
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding the cache was poisoned by a panicking writer.
    #[error("cache lock poisoned")]
    Poisoned,

    /// Implementation-specific failure.
    #[error("cache error: {message}")]
    Other { message: String },
}

impl CacheError {
    /// True for a plain miss, false for every real failure.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::NotCached { .. })
    }
}
