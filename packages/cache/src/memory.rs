//! In-memory cache.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::RwLock;

use bytes::Bytes;

use crate::{Cache, CacheError, NodeId};

/// A [`Cache`] holding node content in process memory.
///
/// Content is stored as [`Bytes`], so a `get` hands out a zero-copy slice and
/// never holds the lock while the caller reads.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<NodeId, Bytes>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached nodes.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether anything is cached for `id`.
    pub fn contains(&self, id: NodeId) -> bool {
        self.entries
            .read()
            .map(|e| e.contains_key(&id))
            .unwrap_or(false)
    }
}

/// Clamp `[offset, offset + size)` to the content length.
fn window(content: &Bytes, offset: u64, size: Option<u64>) -> Bytes {
    let len = content.len() as u64;
    let start = offset.min(len);
    let end = match size {
        Some(size) => start.saturating_add(size).min(len),
        None => len,
    };
    content.slice(start as usize..end as usize)
}

impl Cache for MemoryCache {
    fn get(
        &self,
        id: NodeId,
        offset: u64,
        size: Option<u64>,
    ) -> Result<Box<dyn Read + Send>, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        let content = entries.get(&id).ok_or(CacheError::NotCached { id })?;
        Ok(Box::new(Cursor::new(window(content, offset, size))))
    }

    fn put(&self, id: NodeId, content: &mut dyn Read) -> Result<(), CacheError> {
        // Read outside the lock; the source may be slow.
        let mut buf = Vec::new();
        content.read_to_end(&mut buf)?;
        log::debug!("Caching {} bytes for node {}", buf.len(), id);

        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.insert(id, Bytes::from(buf));
        Ok(())
    }

    fn evict(&self, id: NodeId) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        if entries.remove(&id).is_some() {
            log::debug!("Evicted node {} from cache", id);
        }
        Ok(())
    }
}
