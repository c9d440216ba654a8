//! Extractors whose rejections render through [`ApiError`]

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON body; malformed or mistyped bodies become 400 envelopes
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters; unparseable ids become 400 envelopes
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string; mistyped parameters become 400 envelopes
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Parses a body that may be empty, falling back to `T::default()`
pub fn optional_json<T>(body: &Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::claims::ReviewRequest;

    #[test]
    fn test_empty_body_defaults() {
        let review: ReviewRequest = optional_json(&Bytes::new()).unwrap();
        assert!(review.note.is_none());
    }

    #[test]
    fn test_body_is_parsed() {
        let review: ReviewRequest = optional_json(&Bytes::from_static(br#"{"note":"ok"}"#)).unwrap();
        assert_eq!(review.note.as_deref(), Some("ok"));
    }

    #[test]
    fn test_malformed_body_is_bad_request() {
        let result: Result<ReviewRequest, _> = optional_json(&Bytes::from_static(b"{note"));
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
