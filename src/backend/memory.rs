//! In-process memory backend

use crate::backend::store::{deadline, is_expired, CacheBackend};
use crate::error::TagCacheResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: Vec<u8>,
    expires_at: Option<DateTime<Utc>>,
}

/// Backend holding entries in a shared in-process map
///
/// Clones share the same entries, so several facades (one per domain) can sit
/// on one physical cache.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<RwLock<HashMap<String, MemoryEntry>>>,
    max_entries: Option<usize>,
}

impl MemoryBackend {
    /// Create an unbounded memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that refuses new keys once `max_entries` are held
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: Arc::default(),
            max_entries: Some(max_entries),
        }
    }

    /// Number of entries currently held, including expired ones not yet reaped
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn store(&self, key: &str, value: Vec<u8>, expire_secs: u64) -> TagCacheResult<bool> {
        let mut entries = self.entries.write().await;

        if let Some(max) = self.max_entries {
            if !entries.contains_key(key) && entries.len() >= max {
                debug!("Memory backend full ({} entries), refusing {}", max, key);
                return Ok(false);
            }
        }

        entries.insert(
            key.to_string(),
            MemoryEntry {
                value,
                expires_at: deadline(expire_secs),
            },
        );
        Ok(true)
    }

    async fn fetch(&self, key: &str) -> TagCacheResult<Option<Vec<u8>>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !is_expired(entry.expires_at) => {
                    return Ok(Some(entry.value.clone()))
                }
                Some(_) => {}
            }
        }

        // Re-check under the write lock: the entry may have been replaced.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| is_expired(e.expires_at)) {
            debug!("Entry {} expired", key);
            entries.remove(key);
            return Ok(None);
        }
        Ok(entries.get(key).map(|e| e.value.clone()))
    }

    async fn delete(&self, key: &str) -> TagCacheResult<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn flush(&self) -> TagCacheResult<bool> {
        self.entries.write().await.clear();
        Ok(true)
    }

    async fn keys(&self) -> TagCacheResult<Vec<String>> {
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| !is_expired(e.expires_at));
        Ok(entries.keys().cloned().collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn store_and_fetch() {
        let backend = MemoryBackend::new();
        assert!(backend.store("k", b"v".to_vec(), 0).await.unwrap());
        assert_eq!(backend.fetch("k").await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn missing_returns_none() {
        let backend = MemoryBackend::new();
        assert!(backend.fetch("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let backend = MemoryBackend::new();
        backend.store("k", b"v".to_vec(), 0).await.unwrap();
        assert!(backend.delete("k").await.unwrap());
        assert!(!backend.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn expired_entry_is_reaped_on_fetch() {
        let backend = MemoryBackend::new();
        backend.entries.write().await.insert(
            "old".to_string(),
            MemoryEntry {
                value: b"v".to_vec(),
                expires_at: Some(Utc::now() - Duration::seconds(5)),
            },
        );

        assert!(backend.fetch("old").await.unwrap().is_none());
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn keys_skip_expired() {
        let backend = MemoryBackend::new();
        backend.store("live", b"v".to_vec(), 3600).await.unwrap();
        backend.entries.write().await.insert(
            "dead".to_string(),
            MemoryEntry {
                value: b"v".to_vec(),
                expires_at: Some(Utc::now() - Duration::seconds(5)),
            },
        );

        assert_eq!(backend.keys().await.unwrap(), vec!["live".to_string()]);
    }

    #[tokio::test]
    async fn full_backend_refuses_new_keys_only() {
        let backend = MemoryBackend::with_max_entries(1);
        assert!(backend.store("a", b"1".to_vec(), 0).await.unwrap());
        assert!(!backend.store("b", b"2".to_vec(), 0).await.unwrap());
        // Overwriting an existing key is still allowed
        assert!(backend.store("a", b"3".to_vec(), 0).await.unwrap());
        assert_eq!(backend.fetch("a").await.unwrap(), Some(b"3".to_vec()));
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let backend = MemoryBackend::new();
        let other = backend.clone();
        backend.store("k", b"v".to_vec(), 0).await.unwrap();
        assert_eq!(other.fetch("k").await.unwrap(), Some(b"v".to_vec()));

        assert!(other.flush().await.unwrap());
        assert_eq!(backend.len().await, 0);
    }
}
