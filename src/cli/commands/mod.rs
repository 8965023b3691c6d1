//! CLI command implementations

pub mod completions;
pub mod config;
pub mod delete;
pub mod fetch;
pub mod flush;
pub mod store;

pub use completions::execute as completions;
pub use config::execute as config;
pub use delete::{execute as delete, execute_tag as delete_tag, execute_untag as untag};
pub use fetch::{execute as fetch, execute_tag as fetch_tag};
pub use flush::execute as flush;
pub use store::execute as store;

use crate::config::Config;
use crate::error::TagCacheResult;
use crate::facade::TagCache;
use serde::Serialize;
use tracing::warn;

/// Open the cache described by the merged configuration
pub(crate) async fn open_cache(config: &Config) -> TagCacheResult<TagCache> {
    let cache = TagCache::from_config(&config.cache).await?;
    if cache.backend_name() == "memory" {
        warn!("memory backend does not persist between invocations, use --backend file");
    }
    Ok(cache)
}

/// Print a value as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> TagCacheResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
