use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::errors::GatewayError;
use crate::role::User;

/// Identifier accepted by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginId {
    Email(String),
    Matricule(String),
}

/// Login payload: `{"email": ..., "password": ...}` or
/// `{"matricule": ..., "password": ...}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(flatten)]
    pub login_id: LoginId,
    pub password: String,
}

impl Credentials {
    pub fn email(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login_id: LoginId::Email(email.into()),
            password: password.into(),
        }
    }

    pub fn matricule(matricule: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login_id: LoginId::Matricule(matricule.into()),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login_id", &self.login_id)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Whatever the backend answered, error statuses included.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status: u16,
    /// Parsed JSON body, `Value::Null` when the body is empty or not JSON.
    pub body: Value,
}

impl GatewayResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait AuthGateway: Send + Sync + 'static {
    /// `POST {base}login/` with the credentials as JSON.
    async fn login(&self, credentials: &Credentials) -> Result<GatewayResponse, GatewayError>;

    /// `GET {base}me/` with `Authorization: Bearer <access_token>`.
    async fn who_am_i(&self, access_token: &str) -> Result<GatewayResponse, GatewayError>;
}

/// Body of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginEnvelope {
    #[serde(default)]
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) message: String,
    pub(crate) data: LoginData,
}

#[derive(Clone, Deserialize)]
pub(crate) struct LoginData {
    pub(crate) access: String,
    pub(crate) refresh: String,
    pub(crate) user: User,
}

impl fmt::Debug for LoginData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginData")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// `{error, detail}` as sent by the backend on failures. Both optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ErrorBody {
    pub(crate) error: Option<String>,
    pub(crate) detail: Option<String>,
}

impl ErrorBody {
    pub(crate) fn from_value(body: &Value) -> Self {
        Self {
            error: text_field(body, "error"),
            detail: text_field(body, "detail"),
        }
    }
}

fn text_field(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}
