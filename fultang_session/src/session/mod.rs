mod errors;
mod main;
mod types;

pub use errors::AuthFailure;
pub use main::SessionStore;
pub use types::{LoginReply, LoginSuccess, Revalidation, SessionSnapshot, SessionStatus};
