//! Backend factory for binding a configured selector to an implementation

use crate::backend::file::FileBackend;
use crate::backend::memory::MemoryBackend;
use crate::backend::store::CacheBackend;
use crate::config::{BackendKind, CacheConfig};
use crate::error::TagCacheResult;
use std::sync::Arc;
use tracing::debug;

/// Create the backend named by `config.backend`
///
/// # Arguments
/// * `config` - The cache section of the application configuration
///
/// # Returns
/// * `Ok(Arc<dyn CacheBackend>)` - A shared backend implementation
/// * `Err` - If the backend could not be opened
pub async fn create_backend(config: &CacheConfig) -> TagCacheResult<Arc<dyn CacheBackend>> {
    match config.backend {
        BackendKind::Memory => Ok(Arc::new(MemoryBackend::new())),
        BackendKind::File => {
            let dir = config.store_dir();
            debug!("Opening file backend at {}", dir.display());
            Ok(Arc::new(FileBackend::open(dir).await?))
        }
    }
}
