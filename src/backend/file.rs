//! On-disk backend storing one JSON file per entry
//!
//! File names are the SHA256 of the entry key, so arbitrary keys map to safe
//! paths. Writes go through a temporary file and a rename.

use crate::backend::store::{deadline, is_expired, CacheBackend};
use crate::error::{TagCacheError, TagCacheResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tracing::{debug, info, warn};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Entry record as written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileEntry {
    /// Original backend key
    key: String,

    /// Hex-encoded payload
    value: String,

    /// When the entry expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

/// Backend persisting entries under a directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (and create if needed) a file backend rooted at `dir`
    pub async fn open(dir: impl Into<PathBuf>) -> TagCacheResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|e| {
            TagCacheError::io(format!("creating cache directory {}", dir.display()), e)
        })?;

        // Cached values may be sensitive
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            std::fs::set_permissions(&dir, perms)
                .map_err(|e| TagCacheError::io("setting cache dir permissions", e))?;
        }

        Ok(Self { dir })
    }

    /// Directory holding the entry files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(digest)))
    }

    async fn read_entry(&self, path: &Path) -> TagCacheResult<Option<FileEntry>> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(TagCacheError::io(
                    format!("reading cache file {}", path.display()),
                    e,
                ))
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| TagCacheError::corrupt(path.display().to_string(), e.to_string()))
    }

    async fn remove_file(path: &Path) -> TagCacheResult<bool> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(TagCacheError::io(
                format!("removing cache file {}", path.display()),
                e,
            )),
        }
    }

    /// Paths of all entry files in the directory
    async fn entry_files(&self) -> TagCacheResult<Vec<PathBuf>> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| TagCacheError::io("reading cache directory", e))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| TagCacheError::io("reading cache entry", e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

#[async_trait]
impl CacheBackend for FileBackend {
    async fn store(&self, key: &str, value: Vec<u8>, expire_secs: u64) -> TagCacheResult<bool> {
        let path = self.entry_path(key);
        let entry = FileEntry {
            key: key.to_string(),
            value: hex::encode(value),
            expires_at: deadline(expire_secs),
        };
        let content = serde_json::to_string(&entry)?;

        let tmp = path.with_extension(format!(
            "{}.{}.tmp",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&tmp, content)
            .await
            .map_err(|e| TagCacheError::io(format!("writing cache file {}", tmp.display()), e))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| TagCacheError::io(format!("renaming cache file {}", path.display()), e))?;

        debug!("Stored {} at {}", key, path.display());
        Ok(true)
    }

    async fn fetch(&self, key: &str) -> TagCacheResult<Option<Vec<u8>>> {
        let path = self.entry_path(key);
        let Some(entry) = self.read_entry(&path).await? else {
            return Ok(None);
        };

        if is_expired(entry.expires_at) {
            debug!("Entry {} expired", key);
            Self::remove_file(&path).await?;
            return Ok(None);
        }

        hex::decode(&entry.value)
            .map(Some)
            .map_err(|e| TagCacheError::corrupt(key, e.to_string()))
    }

    async fn delete(&self, key: &str) -> TagCacheResult<bool> {
        Self::remove_file(&self.entry_path(key)).await
    }

    async fn flush(&self) -> TagCacheResult<bool> {
        let files = self.entry_files().await?;
        let count = files.len();
        for path in files {
            Self::remove_file(&path).await?;
        }
        info!("Flushed {} entries from {}", count, self.dir.display());
        Ok(true)
    }

    async fn keys(&self) -> TagCacheResult<Vec<String>> {
        let mut keys = Vec::new();
        for path in self.entry_files().await? {
            match self.read_entry(&path).await {
                Ok(Some(entry)) if !is_expired(entry.expires_at) => keys.push(entry.key),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable cache file: {}", e),
            }
        }
        Ok(keys)
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
