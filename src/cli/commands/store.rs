//! Store command - write a value, optionally tagged

use crate::cli::args::StoreArgs;
use crate::cli::commands::open_cache;
use crate::config::Config;
use crate::error::{TagCacheError, TagCacheResult};
use crate::facade::StoreOutcome;
use console::style;
use serde_json::Value;

/// Execute the store command
pub async fn execute(args: StoreArgs, config: &Config) -> TagCacheResult<()> {
    let cache = open_cache(config).await?;
    let value = parse_value(&args.value);
    let expire = args.expire.unwrap_or(config.cache.default_expire_secs);

    let outcome = match &args.tag {
        Some(tag) => cache.store_by_tag(&args.key, &value, tag, expire).await?,
        None => {
            if cache.store(&args.key, &value, expire).await? {
                StoreOutcome::Stored
            } else {
                StoreOutcome::NotStored
            }
        }
    };

    match outcome {
        StoreOutcome::Stored => println!(
            "{} Stored {}",
            style("✓").green(),
            style(cache.namespacer().key_id(&args.key)).cyan()
        ),
        StoreOutcome::Unindexed => println!(
            "{} Stored {} but could not register it under tag {}",
            style("!").yellow(),
            style(cache.namespacer().key_id(&args.key)).cyan(),
            style(args.tag.as_deref().unwrap_or_default()).cyan()
        ),
        StoreOutcome::NotStored => return Err(TagCacheError::NotStored(args.key)),
    }

    Ok(())
}

/// Interpret CLI input as JSON, falling back to a plain string
pub(crate) fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_input_is_parsed() {
        assert_eq!(parse_value("42"), Value::from(42));
        assert_eq!(parse_value("[1,2]"), serde_json::json!([1, 2]));
        assert_eq!(parse_value("false"), Value::Bool(false));
    }

    #[test]
    fn other_input_is_a_string() {
        assert_eq!(parse_value("Bruce Wayne"), Value::from("Bruce Wayne"));
        assert_eq!(parse_value("{broken"), Value::from("{broken"));
    }
}
