//! API error handling
//!
//! Every failure renders as `{"success": false, "error": "..."}` with the
//! status code for its kind.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use domain_claims::ClaimError;
use domain_identity::AuthError;

use crate::auth::TokenError;
use crate::dto::ApiResponse;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("service unavailable")]
    Unavailable(String),

    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Unavailable(detail) | ApiError::Internal(detail) = &self {
            error!(status = status.as_u16(), %detail, "Request failed");
        }

        (status, Json(ApiResponse::failure(self.to_string()))).into_response()
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        let message = err.to_string();
        match err {
            ClaimError::NotFound(_) => ApiError::NotFound(message),
            ClaimError::Forbidden(_) => ApiError::Forbidden(message),
            ClaimError::InvalidTransition { .. } | ClaimError::Conflict(_) => ApiError::Conflict(message),
            ClaimError::InvalidArgument(_) => ApiError::BadRequest(message),
            ClaimError::Unavailable(_) => ApiError::Unavailable(message),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::InvalidCredentials => ApiError::Unauthorized(message),
            AuthError::InvalidInput(_) => ApiError::BadRequest(message),
            AuthError::Store(e) if e.is_transient() => ApiError::Unavailable(message),
            AuthError::Store(_) | AuthError::Hashing(_) => ApiError::Internal(message),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidToken | TokenError::TokenExpired => ApiError::Unauthorized(err.to_string()),
            TokenError::Signing(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::PortError;

    #[test]
    fn test_claim_error_status_mapping() {
        let cases = [
            (ClaimError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ClaimError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ClaimError::invalid_transition("approve"), StatusCode::CONFLICT),
            (ClaimError::InvalidArgument("x".into()), StatusCode::BAD_REQUEST),
            (ClaimError::Conflict("x".into()), StatusCode::CONFLICT),
            (ClaimError::Unavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_invalid_transition_keeps_operation_message() {
        let err = ApiError::from(ClaimError::invalid_transition("submit"));
        assert_eq!(err.to_string(), "Cannot submit this claim");
    }

    #[test]
    fn test_auth_error_status_mapping() {
        assert_eq!(ApiError::from(AuthError::InvalidCredentials).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::InvalidInput("x".into())).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(AuthError::Store(PortError::connection("down"))).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_unavailable_hides_detail() {
        let err = ApiError::from(ClaimError::Unavailable("pool timed out at 10.0.0.3".into()));
        assert_eq!(err.to_string(), "service unavailable");
    }
}
