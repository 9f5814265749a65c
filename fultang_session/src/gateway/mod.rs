mod errors;
mod http;
mod types;
mod utils;

pub use errors::GatewayError;
pub use http::HttpAuthGateway;
pub use types::{AuthGateway, Credentials, GatewayResponse, LoginId};

pub(crate) use types::{ErrorBody, LoginEnvelope};
