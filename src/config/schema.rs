//! Configuration schema for tagcache
//!
//! Configuration is stored at `~/.config/tagcache/config.toml`. Every field
//! has a default, so an empty file (or none at all) is a valid config.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Domain used when none is configured
pub const DEFAULT_DOMAIN: &str = "default";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Which backend implementation a cache binds to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process map, lost when the process exits
    Memory,
    /// One JSON file per entry under a directory
    #[default]
    File,
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Namespace prefix for every key written by this application
    pub domain: String,

    /// Backend selector
    pub backend: BackendKind,

    /// Directory for the file backend (defaults to the data dir)
    pub dir: Option<PathBuf>,

    /// Expiry applied by the CLI when --expire is not given (0 = none)
    pub default_expire_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            backend: BackendKind::default(),
            dir: None,
            default_expire_secs: 0,
        }
    }
}

impl CacheConfig {
    /// In-process cache for `domain`, nothing touches the disk
    pub fn in_memory(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            backend: BackendKind::Memory,
            ..Self::default()
        }
    }

    /// Directory the file backend writes to
    pub fn store_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tagcache")
                .join("store")
        })
    }
}

/// Values given on the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct CacheOverrides {
    pub domain: Option<String>,
    pub backend: Option<BackendKind>,
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Replace file values with any override that is set
    pub fn apply(&mut self, overrides: CacheOverrides) {
        if let Some(domain) = overrides.domain {
            self.cache.domain = domain;
        }
        if let Some(backend) = overrides.backend {
            self.cache.backend = backend;
        }
        if let Some(dir) = overrides.dir {
            self.cache.dir = Some(dir);
        }
    }
}
