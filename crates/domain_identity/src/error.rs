//! Identity domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur while authenticating
///
/// Unknown users and wrong passwords both surface as `InvalidCredentials`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User store error: {0}")]
    Store(#[from] PortError),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(error: bcrypt::BcryptError) -> Self {
        AuthError::Hashing(error.to_string())
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AuthError::InvalidInput(errors.to_string())
    }
}
