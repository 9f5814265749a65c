mod errors;
mod resolver;
mod types;

pub use errors::RoleError;
pub use resolver::resolve_effective_role;
pub use types::{DirectRoleUser, PERSONNEL_ROLE, PersonnelUser, User};

pub(crate) use resolver::roles_match;
