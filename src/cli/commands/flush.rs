//! Flush command - clear the backend or the current domain

use crate::cli::args::FlushArgs;
use crate::cli::commands::{open_cache, print_json};
use crate::config::Config;
use crate::error::TagCacheResult;
use console::style;

/// Execute the flush command
pub async fn execute(args: FlushArgs, config: &Config) -> TagCacheResult<()> {
    let cache = open_cache(config).await?;

    if args.domain_only {
        let results = cache.delete_domain().await?;
        return print_json(&results);
    }

    if cache.delete_all().await? {
        println!(
            "{} Flushed {} backend (all domains)",
            style("✓").green(),
            cache.backend_name()
        );
    } else {
        println!("{} Backend refused to flush", style("!").yellow());
    }

    Ok(())
}
