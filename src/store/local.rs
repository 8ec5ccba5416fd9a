//! JSON document store on disk
//!
//! Provides a `LocalStore` that saves serializable values to one JSON file
//! per key, stamped with the time they were saved.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while saving a document
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Envelope written to disk around every document
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    data: T,
    saved_at: DateTime<Utc>,
}

/// A loaded document with its save time
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<T> {
    pub data: T,
    pub saved_at: DateTime<Utc>,
}

/// Reads and writes JSON documents in a directory
///
/// Uses `~/.local/share/tourmap/` on Linux, or the equivalent data directory
/// on other platforms. Unreadable or corrupt documents load as absent so a
/// damaged file never prevents startup.
#[derive(Debug, Clone)]
pub struct LocalStore {
    data_dir: PathBuf,
}

impl LocalStore {
    /// Creates a store in the platform data directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home
    /// directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "tourmap")?;
        Some(Self {
            data_dir: project_dirs.data_dir().to_path_buf(),
        })
    }

    /// Creates a store in a specific directory
    pub fn with_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing `key`
    pub fn path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    /// Saves a document, replacing any previous one under `key`
    ///
    /// # Arguments
    /// * `key` - Document name (e.g., "favorites")
    /// * `data` - The value to persist
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(StoreError)` if serialization, directory creation or the write fails
    pub fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|source| StoreError::Io {
            path: self.data_dir.clone(),
            source,
        })?;

        let envelope = Envelope {
            data,
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&envelope)?;

        let path = self.path(key);
        fs::write(&path, json).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(key, path = %path.display(), "Saved document");
        Ok(())
    }

    /// Loads a document with its save time
    ///
    /// Returns `None` if the document doesn't exist or cannot be parsed.
    pub fn load_stored<T: DeserializeOwned>(&self, key: &str) -> Option<Stored<T>> {
        let path = self.path(key);
        let content = fs::read_to_string(&path).ok()?;

        match serde_json::from_str::<Envelope<T>>(&content) {
            Ok(envelope) => Some(Stored {
                data: envelope.data,
                saved_at: envelope.saved_at,
            }),
            Err(e) => {
                warn!(key, error = %e, "Ignoring unreadable document");
                None
            }
        }
    }

    /// Loads a document
    ///
    /// Returns `None` if the document doesn't exist or cannot be parsed.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.load_stored(key).map(|stored| stored.data)
    }

    /// Deletes a document; a missing document is not an error
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}
