//! fultang-session - Session and role core of the Fultang hospital client
//!
//! This crate keeps the one authenticated identity of a client instance:
//! it logs in against the Fultang REST backend, derives the effective role
//! used for every authorization decision, and keeps the session across
//! restarts in a small key-value store.
//!
//! ```no_run
//! use fultang_session::{Credentials, LoginReply, SessionStore};
//!
//! # async fn run() -> Result<(), fultang_session::AuthFailure> {
//! let store = SessionStore::from_env()?;
//! if !store.restore() {
//!     let reply = LoginReply::from(store.login(&Credentials::email("doc@h.cm", "secret")).await);
//!     println!("{}", serde_json::to_string(&reply).unwrap_or_default());
//! }
//! if store.has_role("medecin") {
//!     // show the consultation pages
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod gateway;
mod role;
mod session;
mod storage;

pub use config::BACKEND_API_BASE_URL;

pub use gateway::{
    AuthGateway, Credentials, GatewayError, GatewayResponse, HttpAuthGateway, LoginId,
};

pub use role::{
    DirectRoleUser, PERSONNEL_ROLE, PersonnelUser, RoleError, User, resolve_effective_role,
};

pub use session::{
    AuthFailure, LoginReply, LoginSuccess, Revalidation, SessionSnapshot, SessionStatus,
    SessionStore,
};

pub use storage::{
    FileStore, InMemoryStore, KeyValueStore, PersistedSession, SESSION_KEY_NAMESPACE,
    SESSION_STORE_PATH, SESSION_STORE_TYPE, SessionKeys, SessionRecord, StorageError, TokenPair,
};
