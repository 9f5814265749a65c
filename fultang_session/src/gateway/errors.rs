use thiserror::Error;

/// Transport-level failures, split the way callers need to report them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GatewayError {
    /// The request could not be built (bad base URL, invalid header, ...).
    #[error("Request error: {0}")]
    Request(String),

    /// The request was sent but no response came back.
    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<url::ParseError> for GatewayError {
    fn from(err: url::ParseError) -> Self {
        Self::Request(err.to_string())
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Request(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }
}
