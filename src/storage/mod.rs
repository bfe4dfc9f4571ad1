//! Durable key-value storage for session-scoped client state
//!
//! The browser keeps guest carts and auth sessions in local storage; this
//! module is the equivalent seam for native callers. `MemoryStore` covers
//! ephemeral sessions and tests, `FileStore` keeps state across restarts.

use async_trait::async_trait;
use log::warn;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::Error;

/// Async durable key-value store
///
/// Values are opaque strings; callers serialize their own payloads. A missing
/// key loads as `None`, never as an error.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Load the value stored under `key`
    async fn load(&self, key: &str) -> Result<Option<String>, Error>;

    /// Save `value` under `key`, replacing any previous value
    async fn save(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove the value stored under `key`
    async fn clear(&self, key: &str) -> Result<(), Error>;
}

/// In-memory store, scoped to the lifetime of the client
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty MemoryStore
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>, Error> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), Error> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
        Ok(())
    }
}

/// File-backed store holding all keys in a single JSON object
///
/// A missing or unreadable file is treated as an empty store, so a corrupted
/// payload degrades to "no saved state" instead of failing every operation.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a new FileStore backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_entries(&self) -> HashMap<String, String> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(_) => return HashMap::new(),
        };

        match serde_json::from_slice::<HashMap<String, Value>>(&bytes) {
            Ok(map) => map
                .into_iter()
                .filter_map(|(key, value)| match value {
                    Value::String(value) => Some((key, value)),
                    _ => None,
                })
                .collect(),
            Err(err) => {
                warn!(
                    "Discarding unreadable store file {}: {}",
                    self.path.display(),
                    err
                );
                HashMap::new()
            }
        }
    }

    async fn write_entries(&self, entries: &HashMap<String, String>) -> Result<(), Error> {
        let json = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|err| Error::storage(format!("{}: {}", self.path.display(), err)))
    }
}

#[async_trait]
impl LocalStore for FileStore {
    async fn load(&self, key: &str) -> Result<Option<String>, Error> {
        let entries = self.read_entries().await;
        Ok(entries.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut entries = self.read_entries().await;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }

    async fn clear(&self, key: &str) -> Result<(), Error> {
        let mut entries = self.read_entries().await;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}
