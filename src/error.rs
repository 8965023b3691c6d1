//! Error types for tagcache
//!
//! All modules use `TagCacheResult<T>` as their return type. Backend refusals
//! and cache misses are not errors: they surface as `Ok(false)` / `Ok(None)`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tagcache operations
pub type TagCacheResult<T> = Result<T, TagCacheError>;

/// All errors that can occur in tagcache
#[derive(Error, Debug)]
pub enum TagCacheError {
    // Key errors
    #[error("Key {key:?} maps to reserved id {id:?} (ids ending in \"#tag\" hold tag records)")]
    ReservedKey { key: String, id: String },

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Backend refused to store {0}")]
    NotStored(String),

    #[error("Domain must not be empty")]
    EmptyDomain,

    // Entry errors
    #[error("Corrupted cache entry {key}: {reason}")]
    CorruptEntry { key: String, reason: String },

    #[error("Cache entry {key} holds a different type: {reason}")]
    TypeMismatch { key: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl TagCacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a corrupted entry error
    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptEntry {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a type mismatch error for a well-formed entry
    pub fn mismatch(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ReservedKey { .. } => Some("Pick a key that does not end in \"#tag\""),
            Self::EmptyDomain => Some("Pass --domain or set cache.domain in config.toml"),
            Self::KeyNotFound(_) => Some("Pass --default to print a fallback value on a miss"),
            Self::TypeMismatch { .. } => Some("Fetch with the type the key was stored as"),
            Self::CorruptEntry { .. } => Some("Run: tagcache delete <key>"),
            Self::ConfigInvalid { .. } => Some("Run: tagcache config init --force"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TagCacheError::ReservedKey {
            key: "x#tag".to_string(),
            id: "app_x#tag".to_string(),
        };
        assert!(err.to_string().contains("reserved id"));
    }

    #[test]
    fn error_hint() {
        let err = TagCacheError::KeyNotFound("k".to_string());
        assert_eq!(
            err.hint(),
            Some("Pass --default to print a fallback value on a miss")
        );
    }

    #[test]
    fn mismatch_does_not_suggest_deleting() {
        let err = TagCacheError::mismatch("app_k", "expected a string");
        assert!(err.to_string().contains("different type"));
        assert!(!err.hint().unwrap().contains("delete"));
    }

    #[test]
    fn io_error_keeps_context() {
        let err = TagCacheError::io(
            "reading entry",
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        );
        assert_eq!(err.to_string(), "IO error: reading entry");
        assert!(err.hint().is_none());
    }
}
