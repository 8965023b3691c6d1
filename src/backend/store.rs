//! Key-value backend abstraction
//!
//! Provides a trait for raw entry operations that can be implemented by
//! different stores (in-process memory, on-disk files, networked caches).
//! Backends know nothing about domains or tags.

use crate::error::TagCacheResult;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

/// Abstract cache backend interface
///
/// Per-key operations are expected to be atomic. No cross-key transaction is
/// assumed by callers.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Store `value` under `key`; `expire_secs == 0` means no expiry
    ///
    /// Returns `Ok(false)` when the backend refuses the write.
    async fn store(&self, key: &str, value: Vec<u8>, expire_secs: u64) -> TagCacheResult<bool>;

    /// Fetch the raw bytes under `key`, `None` on miss or expiry
    async fn fetch(&self, key: &str) -> TagCacheResult<Option<Vec<u8>>>;

    /// Delete `key`, returning whether an entry was removed
    async fn delete(&self, key: &str) -> TagCacheResult<bool>;

    /// Remove every entry in the backend, across all domains
    async fn flush(&self) -> TagCacheResult<bool>;

    /// List the keys of all live entries
    async fn keys(&self) -> TagCacheResult<Vec<String>>;

    /// Get the human-readable backend name for display
    fn backend_name(&self) -> &'static str;
}

/// Compute the absolute deadline for an expiry hint in seconds
///
/// Zero, and hints too large to represent, mean no expiry.
pub(crate) fn deadline(expire_secs: u64) -> Option<DateTime<Utc>> {
    if expire_secs == 0 {
        return None;
    }
    let secs = i64::try_from(expire_secs).ok()?;
    Utc::now().checked_add_signed(Duration::try_seconds(secs)?)
}

/// Whether a deadline has passed
pub(crate) fn is_expired(expires_at: Option<DateTime<Utc>>) -> bool {
    expires_at.is_some_and(|at| Utc::now() >= at)
}
