use std::time::Duration;

use crate::gateway::errors::GatewayError;

/// HTTP client for backend calls.
///
/// No request timeout is set: a login waits as long as the transport does.
/// Idle connections are pooled so `login/` and `me/` reuse the connection.
pub(super) fn get_client() -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(32)
        .build()
        .map_err(|e| GatewayError::Request(format!("Failed to create HTTP client: {e}")))
}

/// Join `path` onto the API root. A root without trailing slash is treated
/// as a directory, so `http://h/api` + `login/` gives `http://h/api/login/`.
pub(super) fn endpoint_url(base_url: &str, path: &str) -> Result<url::Url, GatewayError> {
    let base = if base_url.ends_with('/') {
        url::Url::parse(base_url)?
    } else {
        url::Url::parse(&format!("{base_url}/"))?
    };
    Ok(base.join(path)?)
}
