//! tagcache - Namespaced, tag-aware caching
//!
//! A facade over interchangeable key-value backends that isolates
//! applications by domain and groups keys under tags for bulk fetch and
//! invalidation.

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod facade;
pub mod namespace;
pub mod tags;

pub use backend::{CacheBackend, FileBackend, MemoryBackend};
pub use error::{TagCacheError, TagCacheResult};
pub use facade::{StoreOutcome, TagCache};
pub use namespace::KeyNamespacer;
pub use tags::{ListMode, TagIndex};
