use async_trait::async_trait;
use serde_json::Value;

use crate::config::BACKEND_API_BASE_URL;
use crate::gateway::errors::GatewayError;
use crate::gateway::types::{AuthGateway, Credentials, GatewayResponse};

use super::utils::{endpoint_url, get_client};

const LOGIN_PATH: &str = "login/";
const WHO_AM_I_PATH: &str = "me/";

/// `AuthGateway` talking to the backend REST API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAuthGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        Ok(Self::with_client(base_url, get_client()?))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Gateway rooted at `BACKEND_API_BASE_URL`.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::new(BACKEND_API_BASE_URL.as_str())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<GatewayResponse, GatewayError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        // The backend has answered once the status is in; a truncated body
        // still carries that status.
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read response body (status {}): {}", status, e);
                String::new()
            }
        };

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::debug!("Response body is not JSON ({}): {:.200}", e, text);
                Value::Null
            })
        };

        Ok(GatewayResponse { status, body })
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, credentials: &Credentials) -> Result<GatewayResponse, GatewayError> {
        let url = endpoint_url(&self.base_url, LOGIN_PATH)?;
        tracing::debug!("POST {} for {:?}", url, credentials.login_id);

        let response = self.send(self.client.post(url).json(credentials)).await?;

        tracing::debug!("Login answered with status {}", response.status);
        Ok(response)
    }

    async fn who_am_i(&self, access_token: &str) -> Result<GatewayResponse, GatewayError> {
        let url = endpoint_url(&self.base_url, WHO_AM_I_PATH)?;
        tracing::debug!("GET {}", url);

        let response = self
            .send(self.client.get(url).bearer_auth(access_token))
            .await?;

        tracing::debug!("Who-am-i answered with status {}", response.status);
        Ok(response)
    }
}
