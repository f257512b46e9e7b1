//! Key-value storage backends for the state cache

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::StateError;

/// String key-value store, the equivalent of browser local storage
pub trait StateStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StateError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StateError>;

    fn remove(&mut self, key: &str) -> Result<(), StateError>;

    /// All stored keys, sorted
    fn keys(&self) -> Result<Vec<String>, StateError>;
}

/// In-process storage, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StateError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StateError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StateError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StateError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Storage persisted as a single JSON object, written through on every change
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StateError> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| StateError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };

        debug!("Opened state file {:?} ({} entries)", path, entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StateError> {
        let io_err = |source| StateError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content).map_err(io_err)
    }
}

impl StateStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StateError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StateError> {
        self.entries.insert(key.to_string(), value);
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), StateError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StateError> {
        Ok(self.entries.keys().cloned().collect())
    }
}
