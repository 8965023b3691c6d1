//! Delete commands - remove keys, tags or tag records

use crate::cli::args::{DeleteArgs, TagArgs};
use crate::cli::commands::{open_cache, print_json};
use crate::config::Config;
use crate::error::TagCacheResult;
use console::style;

/// Execute the delete command
pub async fn execute(args: DeleteArgs, config: &Config) -> TagCacheResult<()> {
    let cache = open_cache(config).await?;
    let results = cache.delete(&args.keys).await;
    print_json(&results)
}

/// Execute the delete-tag command
pub async fn execute_tag(args: TagArgs, config: &Config) -> TagCacheResult<()> {
    let cache = open_cache(config).await?;
    let results = cache.delete_tag(&args.tag).await?;
    print_json(&results)
}

/// Execute the untag command
pub async fn execute_untag(args: TagArgs, config: &Config) -> TagCacheResult<()> {
    let cache = open_cache(config).await?;

    if cache.untag(&args.tag).await? {
        println!(
            "{} Tag {} removed, values kept",
            style("✓").green(),
            style(&args.tag).cyan()
        );
    } else {
        println!("{} Tag {} not found", style("!").yellow(), style(&args.tag).cyan());
    }

    Ok(())
}
