//! Configuration loading and persistence
//!
//! The file is optional: a missing file yields [`Config::default`], and
//! command-line overrides are applied on top with [`Config::apply`].

pub mod schema;

pub use schema::{BackendKind, CacheConfig, CacheOverrides, Config};

use crate::error::{TagCacheError, TagCacheResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Locates, reads and writes the configuration file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Use `explicit` when given, otherwise `<config_dir>/tagcache/config.toml`
    pub fn discover(explicit: Option<PathBuf>) -> Self {
        let config_path = explicit.unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tagcache")
                .join("config.toml")
        });
        Self { config_path }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub async fn load(&self) -> TagCacheResult<Config> {
        let content = match fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", self.config_path.display());
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(TagCacheError::io(
                    format!("reading config from {}", self.config_path.display()),
                    e,
                ))
            }
        };

        toml::from_str(&content).map_err(|e| TagCacheError::ConfigInvalid {
            path: self.config_path.clone(),
            reason: e.to_string(),
        })
    }

    pub async fn save(&self, config: &Config) -> TagCacheResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| TagCacheError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        fs::write(&self.config_path, toml::to_string_pretty(config)?)
            .await
            .map_err(|e| {
                TagCacheError::io(
                    format!("writing config to {}", self.config_path.display()),
                    e,
                )
            })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Write a default config unless one exists; returns whether it wrote
    pub async fn init(&self, force: bool) -> TagCacheResult<bool> {
        if self.config_path.exists() && !force {
            return Ok(false);
        }
        self.save(&Config::default()).await?;
        Ok(true)
    }
}
