//! Namespaced, tag-aware cache facade
//!
//! `TagCache` binds a domain to a backend. Every key it touches is rewritten
//! to `lowercase(domain + "_" + key)`, so several applications can share one
//! physical cache without seeing each other's entries.
//!
//! # Tags
//!
//! `store_by_tag` writes the value first and only then registers its key id
//! in the tag's record. There is no rollback: if the index update fails the
//! value stays reachable by key but not through the tag, reported as
//! [`StoreOutcome::Unindexed`].
//!
//! # Results
//!
//! | Operation | Miss / refusal | Fault |
//! |-----------|----------------|-------|
//! | store | `Ok(false)` | `Err` |
//! | fetch | `Ok(None)` | `Err` |
//! | fetch_by_tag | member `None` | member `None`, logged; `Err` for the record |
//! | delete, delete_tag | per-key `false` | per-key `false`, logged |

use crate::backend::{create_backend, CacheBackend};
use crate::config::CacheConfig;
use crate::error::{TagCacheError, TagCacheResult};
use crate::namespace::{is_tag_id, KeyNamespacer};
use crate::tags::{ListMode, TagIndex};
use futures_util::future::join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a tagged store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// Value written and registered under the tag
    Stored,
    /// Value written, but the tag record could not be updated
    Unindexed,
    /// Backend refused the value; the tag was not touched
    NotStored,
}

impl StoreOutcome {
    /// Whether the value itself was written
    pub fn is_stored(&self) -> bool {
        !matches!(self, StoreOutcome::NotStored)
    }

    /// Whether the value is reachable through its tag
    pub fn is_indexed(&self) -> bool {
        matches!(self, StoreOutcome::Stored)
    }
}

/// Cache facade for one domain
///
/// Clones share the backend and the per-tag update locks.
#[derive(Clone)]
pub struct TagCache {
    backend: Arc<dyn CacheBackend>,
    namespacer: KeyNamespacer,
    index: TagIndex,
}

impl TagCache {
    /// Create a facade for `domain` over `backend`
    pub fn new(domain: impl Into<String>, backend: Arc<dyn CacheBackend>) -> TagCacheResult<Self> {
        let domain = domain.into();
        if domain.is_empty() {
            return Err(TagCacheError::EmptyDomain);
        }

        let namespacer = KeyNamespacer::new(domain);
        let index = TagIndex::new(Arc::clone(&backend), namespacer.clone());
        Ok(Self {
            backend,
            namespacer,
            index,
        })
    }

    /// Create a facade from the cache section of the configuration
    pub async fn from_config(config: &CacheConfig) -> TagCacheResult<Self> {
        let backend = create_backend(config).await?;
        Self::new(config.domain.clone(), backend)
    }

    pub fn domain(&self) -> &str {
        self.namespacer.domain()
    }

    pub fn namespacer(&self) -> &KeyNamespacer {
        &self.namespacer
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Store `value` under `key`; `expire` is in seconds, 0 for no expiry
    pub async fn store<T>(&self, key: &str, value: &T, expire: u64) -> TagCacheResult<bool>
    where
        T: Serialize + ?Sized + Sync,
    {
        let id = self.value_id(key)?;
        self.store_id(&id, value, expire).await
    }

    /// Store `value` under `key` and register it under `tag`
    pub async fn store_by_tag<T>(
        &self,
        key: &str,
        value: &T,
        tag: &str,
        expire: u64,
    ) -> TagCacheResult<StoreOutcome>
    where
        T: Serialize + ?Sized + Sync,
    {
        let id = self.value_id(key)?;
        if !self.store_id(&id, value, expire).await? {
            return Ok(StoreOutcome::NotStored);
        }

        match self.index.add_member(tag, &id).await {
            Ok(true) => Ok(StoreOutcome::Stored),
            Ok(false) => {
                warn!("Stored {} but backend refused tag record for {}", id, tag);
                Ok(StoreOutcome::Unindexed)
            }
            Err(e) => {
                warn!("Stored {} but failed to update tag {}: {}", id, tag, e);
                Ok(StoreOutcome::Unindexed)
            }
        }
    }

    /// Fetch the value under `key`
    ///
    /// Stored values are returned as-is, including `0`, `""` and `false`.
    pub async fn fetch<T: DeserializeOwned>(&self, key: &str) -> TagCacheResult<Option<T>> {
        self.fetch_id(&self.namespacer.key_id(key)).await
    }

    /// Fetch the value under `key`, or `default` on a miss
    pub async fn fetch_or<T: DeserializeOwned>(&self, key: &str, default: T) -> TagCacheResult<T> {
        Ok(self.fetch(key).await?.unwrap_or(default))
    }

    /// Fetch every value registered under `tag`, keyed by key id
    ///
    /// Members that expired or were deleted since tagging map to `None`, as do
    /// members that fail to read or decode as `T` (logged at warn). Only a
    /// failure to read the tag record itself is an error.
    pub async fn fetch_by_tag<T: DeserializeOwned>(
        &self,
        tag: &str,
    ) -> TagCacheResult<BTreeMap<String, Option<T>>> {
        let members = self.index.list_members(tag, ListMode::Read).await?;
        let values = join_all(members.iter().map(|id| self.fetch_id::<T>(id))).await;

        Ok(members
            .into_iter()
            .zip(values)
            .map(|(id, value)| {
                let value = value.unwrap_or_else(|e| {
                    warn!("Skipping member {} of tag {}: {}", id, tag, e);
                    None
                });
                (id, value)
            })
            .collect())
    }

    /// Fetch every value registered under `tag`, substituting `default` for misses
    pub async fn fetch_by_tag_or<T: DeserializeOwned + Clone>(
        &self,
        tag: &str,
        default: T,
    ) -> TagCacheResult<BTreeMap<String, T>> {
        Ok(self
            .fetch_by_tag(tag)
            .await?
            .into_iter()
            .map(|(id, value)| (id, value.unwrap_or_else(|| default.clone())))
            .collect())
    }

    /// Delete each of `keys`, reporting the backend result per key
    ///
    /// Pass a one-element slice or use [`TagCache::delete_one`] for a single key.
    /// Keys that map to a tag record are left alone and reported `false`; use
    /// [`TagCache::delete_tag`] or [`TagCache::untag`] for those.
    pub async fn delete<I, K>(&self, keys: I) -> BTreeMap<String, bool>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut results = BTreeMap::new();
        for key in keys {
            let key = key.as_ref();
            results.insert(key.to_string(), self.delete_one(key).await);
        }
        results
    }

    /// Delete a single key
    pub async fn delete_one(&self, key: &str) -> bool {
        match self.value_id(key) {
            Ok(id) => self.delete_id(&id).await,
            Err(e) => {
                warn!("Not deleting {}: {}", key, e);
                false
            }
        }
    }

    /// Delete every member of `tag` together with the tag record
    ///
    /// Results are keyed by backend id; the tag id is always the last entry
    /// attempted.
    pub async fn delete_tag(&self, tag: &str) -> TagCacheResult<BTreeMap<String, bool>> {
        let _guard = self.index.lock(tag).await;
        let ids = self.index.list_members(tag, ListMode::Delete).await?;
        debug!("Deleting tag {} with {} id(s)", tag, ids.len());
        Ok(self.delete_ids(ids).await)
    }

    /// Drop the tag record of `tag`, keeping its member values
    pub async fn untag(&self, tag: &str) -> TagCacheResult<bool> {
        let _guard = self.index.lock(tag).await;
        self.index.clear(tag).await
    }

    /// Flush the whole backend
    ///
    /// This clears every domain sharing the backend, not only this one. Use
    /// [`TagCache::delete_domain`] to remove only this domain's entries.
    pub async fn delete_all(&self) -> TagCacheResult<bool> {
        info!(
            "Flushing entire {} backend (all domains)",
            self.backend.backend_name()
        );
        self.backend.flush().await
    }

    /// Delete every entry whose id carries this domain's prefix
    ///
    /// A domain that is a prefix of another (`app` and `app_x`) also matches
    /// the other domain's entries.
    pub async fn delete_domain(&self) -> TagCacheResult<BTreeMap<String, bool>> {
        let ids: Vec<String> = self
            .backend
            .keys()
            .await?
            .into_iter()
            .filter(|id| self.namespacer.owns(id))
            .collect();
        info!("Deleting {} entries of domain {}", ids.len(), self.domain());
        Ok(self.delete_ids(ids).await)
    }

    fn value_id(&self, key: &str) -> TagCacheResult<String> {
        let id = self.namespacer.key_id(key);
        if is_tag_id(&id) {
            return Err(TagCacheError::ReservedKey {
                key: key.to_string(),
                id,
            });
        }
        Ok(id)
    }

    async fn store_id<T>(&self, id: &str, value: &T, expire: u64) -> TagCacheResult<bool>
    where
        T: Serialize + ?Sized + Sync,
    {
        let bytes = serde_json::to_vec(value)?;
        let stored = self.backend.store(id, bytes, expire).await?;
        debug!("Store {} (expire {}s): {}", id, expire, stored);
        Ok(stored)
    }

    async fn fetch_id<T: DeserializeOwned>(&self, id: &str) -> TagCacheResult<Option<T>> {
        let Some(bytes) = self.backend.fetch(id).await? else {
            debug!("Miss {}", id);
            return Ok(None);
        };
        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| TagCacheError::corrupt(id, e.to_string()))?;
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| TagCacheError::mismatch(id, e.to_string()))
    }

    async fn delete_id(&self, id: &str) -> bool {
        match self.backend.delete(id).await {
            Ok(deleted) => deleted,
            Err(e) => {
                warn!("Failed to delete {}: {}", id, e);
                false
            }
        }
    }

    async fn delete_ids(&self, ids: Vec<String>) -> BTreeMap<String, bool> {
        let mut results = BTreeMap::new();
        for id in ids {
            let deleted = self.delete_id(&id).await;
            results.insert(id, deleted);
        }
        results
    }
}
