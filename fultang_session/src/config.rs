//! Central configuration for the fultang_session crate

use std::sync::LazyLock;

/// Root of the backend REST API.
///
/// Every gateway endpoint (`login/`, `me/`) is resolved relative to this URL.
/// Default: "http://127.0.0.1:8000/api/"
pub static BACKEND_API_BASE_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("BACKEND_API_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_BACKEND_API_BASE_URL.to_string())
});

pub(crate) const DEFAULT_BACKEND_API_BASE_URL: &str = "http://127.0.0.1:8000/api/";
