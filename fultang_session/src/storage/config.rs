use std::{env, sync::LazyLock};

use crate::storage::errors::StorageError;

use super::types::{FileStore, InMemoryStore, KeyValueStore};

/// Suffix appended to every durable session key (`token_key_<ns>`, ...).
pub static SESSION_KEY_NAMESPACE: LazyLock<String> = LazyLock::new(|| {
    env::var("SESSION_KEY_NAMESPACE").unwrap_or_else(|_| DEFAULT_KEY_NAMESPACE.to_string())
});

pub static SESSION_STORE_TYPE: LazyLock<String> =
    LazyLock::new(|| env::var("SESSION_STORE_TYPE").unwrap_or_else(|_| "file".to_string()));

pub static SESSION_STORE_PATH: LazyLock<String> = LazyLock::new(|| {
    env::var("SESSION_STORE_PATH").unwrap_or_else(|_| ".fultang_session.json".to_string())
});

pub(crate) const DEFAULT_KEY_NAMESPACE: &str = "fultang";

pub(super) fn store_from_env() -> Result<Box<dyn KeyValueStore>, StorageError> {
    build_store(SESSION_STORE_TYPE.as_str(), SESSION_STORE_PATH.as_str())
}

fn build_store(store_type: &str, store_path: &str) -> Result<Box<dyn KeyValueStore>, StorageError> {
    tracing::info!(
        "Initializing session store with type: {}, path: {}",
        store_type,
        store_path
    );

    let store: Box<dyn KeyValueStore> = match store_type {
        "memory" => Box::new(InMemoryStore::new()),
        "file" => Box::new(FileStore::new(store_path)),
        t => return Err(StorageError::UnsupportedStoreType(t.to_string())),
    };

    Ok(store)
}
