use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoleError {
    #[error("Personnel record has no poste")]
    MissingPoste,

    #[error("Invalid poste value: {0}")]
    InvalidPoste(String),
}
