//! Fetch commands - read values by key or by tag

use crate::cli::args::{FetchArgs, TagArgs};
use crate::cli::commands::{open_cache, print_json};
use crate::cli::commands::store::parse_value;
use crate::config::Config;
use crate::error::{TagCacheError, TagCacheResult};
use serde_json::Value;

/// Execute the fetch command
pub async fn execute(args: FetchArgs, config: &Config) -> TagCacheResult<()> {
    let cache = open_cache(config).await?;

    let value = match (cache.fetch::<Value>(&args.key).await?, args.default) {
        (Some(value), _) => value,
        (None, Some(default)) => parse_value(&default),
        (None, None) => return Err(TagCacheError::KeyNotFound(args.key)),
    };

    print_json(&value)
}

/// Execute the fetch-tag command
pub async fn execute_tag(args: TagArgs, config: &Config) -> TagCacheResult<()> {
    let cache = open_cache(config).await?;
    let values = cache.fetch_by_tag::<Value>(&args.tag).await?;
    print_json(&values)
}
