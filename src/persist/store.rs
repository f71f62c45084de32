//! Key-value storage for saved games.
//!
//! A [`KeyValueStore`] holds typed [`SaveValue`]s under string keys.
//! [`MemoryStore`] keeps them in a map; [`FileStore`] additionally writes
//! the whole map to disk with bincode after every change, so a save
//! survives a process restart.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::core::StoreError;

/// A stored value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SaveValue {
    Text(String),
    Float(f64),
    Int(i64),
    Bool(bool),
}

impl SaveValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SaveValue::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            SaveValue::Float(f) => Some(f),
            SaveValue::Int(i) => Some(i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            SaveValue::Int(i) => Some(i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            SaveValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

/// Persistent key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<&SaveValue>;

    fn set(&mut self, key: &str, value: SaveValue) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// In-memory store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    values: FxHashMap<String, SaveValue>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&SaveValue> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: SaveValue) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store backed by a bincode file, rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: FxHashMap<String, SaveValue>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    #[instrument(level = "debug")]
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let values = match fs::read(path) {
            Ok(bytes) => bincode::deserialize(&bytes).map_err(|source| StoreError::Encoding {
                path: path.to_path_buf(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no store file yet");
                FxHashMap::default()
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let bytes = bincode::serialize(&self.values).map_err(|source| StoreError::Encoding {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, bytes).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<&SaveValue> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: SaveValue) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
