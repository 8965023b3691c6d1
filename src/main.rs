//! tagcache - Namespaced, tag-aware cache
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tagcache::cli::{Cli, Commands};
use tagcache::config::{CacheOverrides, Config, ConfigManager};
use tagcache::error::TagCacheResult;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> TagCacheResult<()> {
    let cli = Cli::parse();

    // Completions don't need config loading
    if let Commands::Completions(args) = cli.command {
        return tagcache::cli::commands::completions(args);
    }

    let config_manager = ConfigManager::discover(cli.config.clone());
    let mut config = config_manager.load().await?;

    init_logging(cli.verbose, &config);
    debug!("Using config {}", config_manager.path().display());

    // Flags and TAGCACHE_* env vars win over the file
    config.apply(CacheOverrides {
        domain: cli.domain.clone(),
        backend: cli.backend,
        dir: cli.dir.clone(),
    });

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::Store(args) => tagcache::cli::commands::store(args, &config).await,
        Commands::Fetch(args) => tagcache::cli::commands::fetch(args, &config).await,
        Commands::FetchTag(args) => tagcache::cli::commands::fetch_tag(args, &config).await,
        Commands::Delete(args) => tagcache::cli::commands::delete(args, &config).await,
        Commands::DeleteTag(args) => tagcache::cli::commands::delete_tag(args, &config).await,
        Commands::Untag(args) => tagcache::cli::commands::untag(args, &config).await,
        Commands::Flush(args) => tagcache::cli::commands::flush(args, &config).await,
        Commands::Config(args) => {
            tagcache::cli::commands::config(args, &config_manager, &config).await
        }
    }
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("tagcache=warn"),
        1 => EnvFilter::new("tagcache=info"),
        _ => EnvFilter::new("tagcache=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

