use std::collections::HashMap;
use std::path::PathBuf;

use crate::storage::errors::StorageError;

pub struct InMemoryStore {
    pub(super) entry: HashMap<String, String>,
}

pub struct FileStore {
    pub(super) path: PathBuf,
}

/// Durable string key-value storage, the equivalent of browser local storage.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Get the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a value under `key`, replacing any previous value.
    fn put(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Store several values. Backends that can write them in one step
    /// override this so a crash never leaves only some of them written.
    fn put_all(&mut self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.put(&key, value)?;
        }
        Ok(())
    }

    /// Remove several keys.
    fn remove_all(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}
