use serde::{Deserialize, Serialize};

use crate::role::User;
use crate::session::errors::AuthFailure;
use crate::storage::SessionRecord;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum SessionState {
    Unauthenticated,
    LoadingLogin,
    Authenticated(SessionRecord),
}

/// Externally visible state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Unauthenticated,
    LoadingLogin,
    Authenticated,
}

impl From<&SessionState> for SessionStatus {
    fn from(state: &SessionState) -> Self {
        match state {
            SessionState::Unauthenticated => SessionStatus::Unauthenticated,
            SessionState::LoadingLogin => SessionStatus::LoadingLogin,
            SessionState::Authenticated(_) => SessionStatus::Authenticated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccess {
    /// Effective role of the user that just logged in.
    pub role: String,
    pub message: String,
}

/// Outcome of `SessionStore::revalidate`.
#[derive(Debug, Clone, PartialEq)]
pub enum Revalidation {
    /// Nothing to check, no session is open.
    NotAuthenticated,
    /// The backend still recognises the token.
    Valid { user: User, effective_role: String },
    /// The backend refused the token; the session was closed.
    Revoked,
}

/// Flat `{success, status, role, message, error, detail}` view of a login
/// result, the shape the login page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<LoginSuccess> for LoginReply {
    fn from(success: LoginSuccess) -> Self {
        Self {
            success: true,
            status: None,
            role: Some(success.role),
            message: Some(success.message),
            error: None,
            detail: None,
        }
    }
}

impl From<AuthFailure> for LoginReply {
    fn from(failure: AuthFailure) -> Self {
        Self {
            success: false,
            status: failure.status(),
            role: None,
            message: None,
            error: Some(failure.error().to_string()),
            detail: Some(failure.detail().to_string()),
        }
    }
}

impl From<Result<LoginSuccess, AuthFailure>> for LoginReply {
    fn from(result: Result<LoginSuccess, AuthFailure>) -> Self {
        match result {
            Ok(success) => success.into(),
            Err(failure) => failure.into(),
        }
    }
}

/// Read-only copy of the session for the page layer. Carries no tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub user: Option<User>,
    pub effective_role: Option<String>,
}

impl From<&SessionState> for SessionSnapshot {
    fn from(state: &SessionState) -> Self {
        let (user, effective_role) = match state {
            SessionState::Authenticated(record) => (
                Some(record.user.clone()),
                Some(record.effective_role.clone()),
            ),
            _ => (None, None),
        };

        Self {
            status: state.into(),
            is_authenticated: matches!(state, SessionState::Authenticated(_)),
            is_loading: matches!(state, SessionState::LoadingLogin),
            user,
            effective_role,
        }
    }
}
