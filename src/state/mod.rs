//! Local state cache - per-user, per-organization key-value state

mod storage;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

pub use storage::{FileStorage, MemoryStorage, StateStorage};

/// Placeholder for a missing organization in scoped keys. Percent-encoding
/// always escapes `*`, so no organization id can render as this.
const NO_ORGANIZATION: &str = "*";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to access state file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid state data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Typed view over a [`StateStorage`], scoped to one user and organization.
///
/// Keys are stored as `"{user}:{organization}:{key}"` with both ids
/// percent-encoded, so an id containing `:` cannot reach into another scope.
/// Values are stored as JSON.
pub struct LocalStateCache {
    storage: Box<dyn StateStorage>,
    prefix: String,
}

impl LocalStateCache {
    pub fn new(storage: Box<dyn StateStorage>, user_id: &str, organization_id: Option<&str>) -> Self {
        let organization = match organization_id {
            Some(org) => urlencoding::encode(org),
            None => NO_ORGANIZATION.into(),
        };
        let prefix = format!("{}:{}:", urlencoding::encode(user_id), organization);
        Self { storage, prefix }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Read a value. Missing, unreadable, or mistyped values are `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get(&self.scoped(key)) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read state '{}': {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring stale state '{}': {}", key, e);
                None
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StateError> {
        let raw = serde_json::to_string(value)?;
        let key = self.scoped(key);
        self.storage.set(&key, raw)
    }

    pub fn remove(&mut self, key: &str) -> Result<(), StateError> {
        let key = self.scoped(key);
        self.storage.remove(&key)
    }

    /// Keys in this scope, without the scope prefix
    pub fn keys(&self) -> Result<Vec<String>, StateError> {
        Ok(self
            .storage
            .keys()?
            .into_iter()
            .filter_map(|k| k.strip_prefix(&self.prefix).map(str::to_string))
            .collect())
    }

    /// Remove every key in this scope; other scopes are untouched
    pub fn clear(&mut self) -> Result<usize, StateError> {
        let keys = self.keys()?;
        for key in &keys {
            self.remove(key)?;
        }
        Ok(keys.len())
    }
}
