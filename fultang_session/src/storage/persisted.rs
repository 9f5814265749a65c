use std::fmt;

use serde::{Deserialize, Serialize};

use crate::role::User;
use crate::storage::config::{DEFAULT_KEY_NAMESPACE, SESSION_KEY_NAMESPACE, store_from_env};
use crate::storage::errors::StorageError;
use crate::storage::types::{InMemoryStore, KeyValueStore};

/// Access/refresh credential pair issued by the backend. Never inspected.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"[redacted]")
            .field("refresh", &"[redacted]")
            .finish()
    }
}

/// Everything `PersistedSession::load` hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub tokens: TokenPair,
    pub user: User,
    pub effective_role: String,
}

/// Durable key names, compatible with the web client's local storage layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    pub token: String,
    pub refresh_token: String,
    pub user_data: String,
    pub user_role: String,
}

impl SessionKeys {
    pub fn new(namespace: &str) -> Self {
        Self {
            token: format!("token_key_{namespace}"),
            refresh_token: format!("refresh_token_{namespace}"),
            user_data: format!("user_data_{namespace}"),
            user_role: format!("user_role_{namespace}"),
        }
    }

    fn all(&self) -> [&str; 4] {
        [
            &self.token,
            &self.refresh_token,
            &self.user_data,
            &self.user_role,
        ]
    }
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_NAMESPACE)
    }
}

/// Token pair, user and effective role kept across restarts.
pub struct PersistedSession {
    store: Box<dyn KeyValueStore>,
    keys: SessionKeys,
}

impl PersistedSession {
    pub fn new(store: Box<dyn KeyValueStore>, keys: SessionKeys) -> Self {
        Self { store, keys }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(InMemoryStore::new()), SessionKeys::default())
    }

    /// Store selected by `SESSION_STORE_TYPE` / `SESSION_STORE_PATH`, keys
    /// namespaced by `SESSION_KEY_NAMESPACE`.
    pub fn from_env() -> Result<Self, StorageError> {
        Ok(Self::new(
            store_from_env()?,
            SessionKeys::new(SESSION_KEY_NAMESPACE.as_str()),
        ))
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    pub fn save(
        &mut self,
        tokens: &TokenPair,
        user: &User,
        effective_role: &str,
    ) -> Result<(), StorageError> {
        let user_data = serde_json::to_string(user)?;

        self.store.put_all(vec![
            (self.keys.user_data.clone(), user_data),
            (self.keys.user_role.clone(), effective_role.to_string()),
            (self.keys.token.clone(), tokens.access.clone()),
            (self.keys.refresh_token.clone(), tokens.refresh.clone()),
        ])?;

        tracing::debug!("Persisted session for user {}", user.id());
        Ok(())
    }

    /// Returns `None` unless token, refresh token, user and role are all
    /// present and the user record parses.
    pub fn load(&self) -> Result<Option<SessionRecord>, StorageError> {
        let Some(access) = self.non_empty(&self.keys.token)? else {
            tracing::debug!("No persisted access token");
            return Ok(None);
        };
        let (Some(refresh), Some(user_data), Some(effective_role)) = (
            self.non_empty(&self.keys.refresh_token)?,
            self.non_empty(&self.keys.user_data)?,
            self.non_empty(&self.keys.user_role)?,
        ) else {
            tracing::warn!("Persisted session is incomplete");
            return Ok(None);
        };

        let user: User = match serde_json::from_str(&user_data) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Persisted user record is unreadable: {}", e);
                return Ok(None);
            }
        };

        Ok(Some(SessionRecord {
            tokens: TokenPair { access, refresh },
            user,
            effective_role,
        }))
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove_all(&self.keys.all())?;
        tracing::debug!("Cleared persisted session");
        Ok(())
    }

    fn non_empty(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.store.get(key)?.filter(|v| !v.is_empty()))
    }
}

impl fmt::Debug for PersistedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedSession")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}
