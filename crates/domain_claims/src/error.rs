//! Claims domain errors

use thiserror::Error;

use core_kernel::{CoreError, PortError};

/// Errors that can occur in the claims domain
///
/// `InvalidTransition` carries only the operation name. It never says whether
/// the claim was in the wrong status or the actor held the wrong role.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Cannot {operation} this claim")]
    InvalidTransition { operation: &'static str },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Claim store unavailable: {0}")]
    Unavailable(String),
}

impl ClaimError {
    pub fn invalid_transition(operation: &'static str) -> Self {
        ClaimError::InvalidTransition { operation }
    }
}

impl From<PortError> for ClaimError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::NotFound { id, .. } => ClaimError::NotFound(id),
            PortError::Validation { message, .. } => ClaimError::InvalidArgument(message),
            PortError::Conflict { message } => ClaimError::Conflict(message),
            // conditional write found the status already moved on
            PortError::PreconditionFailed { .. } => {
                ClaimError::InvalidTransition { operation: "modify" }
            }
            e @ (PortError::Connection { .. }
            | PortError::Timeout { .. }
            | PortError::Internal { .. }) => ClaimError::Unavailable(e.to_string()),
        }
    }
}

impl From<CoreError> for ClaimError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(message) => ClaimError::InvalidArgument(message),
            CoreError::UnknownRole(role) => ClaimError::InvalidArgument(format!("unknown role: {}", role)),
        }
    }
}
