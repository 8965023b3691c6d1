//! CLI argument definitions using clap derive

use crate::config::BackendKind;
use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// tagcache - Namespaced, tag-aware cache
///
/// Stores values under domain-prefixed keys, groups keys under tags and
/// fetches or invalidates whole tags at once.
#[derive(Parser, Debug)]
#[command(name = "tagcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "TAGCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Domain (namespace) for all keys
    #[arg(short, long, global = true, env = "TAGCACHE_DOMAIN")]
    pub domain: Option<String>,

    /// Backend to bind to
    #[arg(short, long, global = true, value_enum, env = "TAGCACHE_BACKEND")]
    pub backend: Option<BackendKind>,

    /// Directory for the file backend
    #[arg(long, global = true, env = "TAGCACHE_DIR")]
    pub dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a value, optionally under a tag
    Store(StoreArgs),

    /// Fetch a value by key
    Fetch(FetchArgs),

    /// Fetch every value stored under a tag
    FetchTag(TagArgs),

    /// Delete one or more keys
    Delete(DeleteArgs),

    /// Delete a tag and every value stored under it
    DeleteTag(TagArgs),

    /// Forget a tag but keep its values
    Untag(TagArgs),

    /// Remove cached entries
    Flush(FlushArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the store command
#[derive(Parser, Debug)]
pub struct StoreArgs {
    /// Key to store under
    pub key: String,

    /// Value (parsed as JSON when valid, otherwise stored as a string)
    pub value: String,

    /// Tag to register the key under
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Expiry in seconds (0 = never; defaults to cache.default_expire_secs)
    #[arg(short, long)]
    pub expire: Option<u64>,
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Key to fetch
    pub key: String,

    /// Value to print on a miss instead of failing
    #[arg(long)]
    pub default: Option<String>,
}

/// Arguments for commands operating on a tag
#[derive(Parser, Debug)]
pub struct TagArgs {
    /// Tag name
    pub tag: String,
}

/// Arguments for the delete command
#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Keys to delete
    #[arg(required = true)]
    pub keys: Vec<String>,
}

/// Arguments for the flush command
#[derive(Parser, Debug)]
pub struct FlushArgs {
    /// Only remove entries of the current domain
    #[arg(long)]
    pub domain_only: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_tagged_store() {
        let cli = Cli::parse_from([
            "tagcache", "--domain", "myapp", "store", "bat", "Bruce", "--tag", "heroes",
        ]);
        assert_eq!(cli.domain.as_deref(), Some("myapp"));
        match cli.command {
            Commands::Store(args) => {
                assert_eq!(args.key, "bat");
                assert_eq!(args.tag.as_deref(), Some("heroes"));
                assert!(args.expire.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn delete_requires_a_key() {
        assert!(Cli::try_parse_from(["tagcache", "delete"]).is_err());
    }

    #[test]
    fn backend_flag_accepts_file() {
        let cli = Cli::parse_from(["tagcache", "-b", "file", "flush"]);
        assert_eq!(cli.backend, Some(BackendKind::File));
    }
}
