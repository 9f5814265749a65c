use std::collections::HashMap;

use crate::storage::errors::StorageError;

use super::types::{InMemoryStore, KeyValueStore};

impl InMemoryStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session store");
        Self {
            entry: HashMap::new(),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entry.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entry.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entry.remove(key);
        Ok(())
    }
}
