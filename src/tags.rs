//! Tag membership index
//!
//! Each tag's members are kept as an ordinary backend entry under the tag id:
//! a JSON array of member key ids, duplicate-free and in insertion order.
//!
//! Updates are read-modify-write. Within one process they are serialized by a
//! per-tag lock shared by every clone of the index. A tag's lock lives only
//! while someone holds or waits on it. Separate processes writing the same tag
//! through a persistent backend can still lose updates.

use crate::backend::CacheBackend;
use crate::error::{TagCacheError, TagCacheResult};
use crate::namespace::KeyNamespacer;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

type LockMap = DashMap<String, Arc<Mutex<()>>>;

/// Member key ids of a tag, as stored in the backend
pub type TagRecord = Vec<String>;

/// Which view of a tag's members to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Value members only
    Read,
    /// Value members followed by the tag id itself, for cascade deletes
    Delete,
}

/// Secondary index from tags to member key ids
#[derive(Clone)]
pub struct TagIndex {
    backend: Arc<dyn CacheBackend>,
    namespacer: KeyNamespacer,
    locks: Arc<LockMap>,
}

/// Exclusive hold on one tag's record
///
/// Dropping it releases the tag and forgets the lock entry once no other
/// task references it.
pub struct TagLock {
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<LockMap>,
    tag_id: String,
}

impl Drop for TagLock {
    fn drop(&mut self) {
        // Release first so our own guard no longer counts as a reference
        self.guard.take();
        self.locks
            .remove_if(&self.tag_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl TagIndex {
    pub fn new(backend: Arc<dyn CacheBackend>, namespacer: KeyNamespacer) -> Self {
        Self {
            backend,
            namespacer,
            locks: Arc::default(),
        }
    }

    /// Acquire the update lock for `tag`
    ///
    /// Held across the whole read-modify-write of the record.
    pub async fn lock(&self, tag: &str) -> TagLock {
        let tag_id = self.namespacer.tag_id(tag);
        let lock = Arc::clone(&self.locks.entry(tag_id.clone()).or_default());
        TagLock {
            guard: Some(lock.lock_owned().await),
            locks: Arc::clone(&self.locks),
            tag_id,
        }
    }

    /// Number of tags with a live lock entry
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    /// List the members of `tag`
    pub async fn list_members(&self, tag: &str, mode: ListMode) -> TagCacheResult<Vec<String>> {
        let tag_id = self.namespacer.tag_id(tag);
        let mut members = self.read_record(&tag_id).await?;
        if mode == ListMode::Delete {
            members.push(tag_id);
        }
        Ok(members)
    }

    /// Register `key_id` under `tag`
    ///
    /// Appends only when absent, then writes the record back. Returns the
    /// backend's store result for the record.
    pub async fn add_member(&self, tag: &str, key_id: &str) -> TagCacheResult<bool> {
        let _guard = self.lock(tag).await;
        let tag_id = self.namespacer.tag_id(tag);
        let mut members = self.read_record(&tag_id).await?;

        if !members.iter().any(|m| m == key_id) {
            members.push(key_id.to_string());
        }

        let stored = self
            .backend
            .store(&tag_id, serde_json::to_vec(&members)?, 0)
            .await?;
        debug!("Tag {} now has {} member(s)", tag_id, members.len());
        Ok(stored)
    }

    /// Remove the record of `tag`, leaving its members in place
    pub async fn clear(&self, tag: &str) -> TagCacheResult<bool> {
        self.backend.delete(&self.namespacer.tag_id(tag)).await
    }

    async fn read_record(&self, tag_id: &str) -> TagCacheResult<TagRecord> {
        let Some(bytes) = self.backend.fetch(tag_id).await? else {
            return Ok(Vec::new());
        };
        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| TagCacheError::corrupt(tag_id, e.to_string()))?;
        serde_json::from_value(value).map_err(|e| TagCacheError::mismatch(tag_id, e.to_string()))
    }
}
