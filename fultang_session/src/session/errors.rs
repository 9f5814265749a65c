use thiserror::Error;

use crate::gateway::GatewayError;
use crate::storage::StorageError;

pub(crate) const DEFAULT_REJECTED_ERROR: &str = "authentication error";
pub(crate) const DEFAULT_REJECTED_DETAIL: &str = "an error occurred";

/// Classified failure of a session operation.
///
/// Pages render `error()` and `detail()` directly, so a wrong password
/// (`Rejected`) and a stopped backend (`Unreachable`) read differently.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthFailure {
    /// The backend answered with an error status (or an unusable body).
    #[error("{error}: {detail} (status {status})")]
    Rejected {
        status: u16,
        error: String,
        detail: String,
    },

    /// The request was sent but no response came back.
    #[error("connection error: backend unreachable")]
    Unreachable { cause: String },

    /// The request could not be built.
    #[error("error: {0}")]
    Request(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("login in progress")]
    LoginInProgress,

    /// A logout (or another login) replaced the session while the request
    /// was in flight; its result was dropped.
    #[error("login cancelled")]
    Superseded,
}

impl AuthFailure {
    /// HTTP status, only for answers the backend actually sent.
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthFailure::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn error(&self) -> &str {
        match self {
            AuthFailure::Rejected { error, .. } => error,
            AuthFailure::Unreachable { .. } => "connection error",
            AuthFailure::Request(_) => "error",
            AuthFailure::Storage(_) => "storage error",
            AuthFailure::LoginInProgress => "login in progress",
            AuthFailure::Superseded => "login cancelled",
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AuthFailure::Rejected { detail, .. } => detail,
            AuthFailure::Unreachable { .. } => "backend unreachable",
            AuthFailure::Request(message) | AuthFailure::Storage(message) => message,
            AuthFailure::LoginInProgress => "a login request is already pending",
            AuthFailure::Superseded => "the session was closed before the request completed",
        }
    }

    pub(crate) fn rejected(status: u16, error: Option<String>, detail: Option<String>) -> Self {
        AuthFailure::Rejected {
            status,
            error: error.unwrap_or_else(|| DEFAULT_REJECTED_ERROR.to_string()),
            detail: detail.unwrap_or_else(|| DEFAULT_REJECTED_DETAIL.to_string()),
        }
    }
}

impl From<GatewayError> for AuthFailure {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Request(message) => AuthFailure::Request(message),
            GatewayError::Connection(cause) => AuthFailure::Unreachable { cause },
        }
    }
}

impl From<StorageError> for AuthFailure {
    fn from(err: StorageError) -> Self {
        AuthFailure::Storage(err.to_string())
    }
}
