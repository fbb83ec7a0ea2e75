//! Key-value string store backing session persistence.
//!
//! The store is used with a single fixed key; the file backend keeps one
//! JSON document per key under a base directory, the crate's stand-in for
//! browser `localStorage`.

use crate::error::StorageError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-per-key store: `{base_dir}/{sanitized_key}.json`.
pub struct FileKvStore {
    base_dir: PathBuf,
}

impl FileKvStore {
    /// Creates the store, creating `base_dir` if it doesn't exist.
    pub fn new(base_dir: PathBuf) -> Result<Self, StorageError> {
        std::fs::create_dir_all(&base_dir).map_err(|error| StorageError::Write {
            key: base_dir.display().to_string(),
            message: error.to_string(),
        })?;
        Ok(Self { base_dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|error| StorageError::Read {
                key: key.to_string(),
                message: error.to_string(),
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::write(self.key_path(key), value).map_err(|error| StorageError::Write {
            key: key.to_string(),
            message: error.to_string(),
        })
    }
}

/// In-memory store for tests and degraded (persistence-less) mode. Clones
/// share the same map, so a reloaded store sees earlier writes.
#[derive(Clone, Default)]
pub struct MemoryKvStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.inner.lock().map_err(|error| StorageError::Read {
            key: key.to_string(),
            message: error.to_string(),
        })?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.inner.lock().map_err(|error| StorageError::Write {
            key: key.to_string(),
            message: error.to_string(),
        })?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Sanitize a key for safe use as a filename. Replaces non-alphanumeric
/// characters (except `_` and `-`) with `_`.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
