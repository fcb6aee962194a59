//! Local key/value persistence for the document and theme preference

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

/// Key holding the raw markdown document
pub const CONTENT_KEY: &str = "cerberus-content";

/// Key holding the theme preference
pub const THEME_KEY: &str = "theme";

/// Errors raised while writing the store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode store: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string key/value store
pub trait Storage {
    /// Read the value stored under `key`
    fn load_text(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn save_text(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Store backed by a single JSON object file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStorage {
    /// Open the store at `path`. A missing or unreadable file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::error!("Ignoring corrupt store {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                tracing::error!("Failed to read store {}: {}", path.display(), e);
                HashMap::new()
            }
        };

        tracing::info!("Using store: {} ({} keys)", path.display(), entries.len());
        Self { path, entries }
    }

    fn flush(&self) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string(&self.entries)?;
        std::fs::write(&self.path, content).map_err(io_err)
    }
}

impl Storage for FileStorage {
    fn load_text(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save_text(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// In-memory store
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn load_text(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save_text(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
