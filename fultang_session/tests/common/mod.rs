pub mod mock_backend;

pub use fixtures::*;
pub use mock_backend::MockBackend;
