mod config;
mod errors;
mod file;
mod memory;
mod persisted;
mod types;

pub use config::{SESSION_KEY_NAMESPACE, SESSION_STORE_PATH, SESSION_STORE_TYPE};
pub use errors::StorageError;
pub use persisted::{PersistedSession, SessionKeys, SessionRecord, TokenPair};
pub use types::{FileStore, InMemoryStore, KeyValueStore};
