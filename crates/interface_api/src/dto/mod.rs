//! Request/response data transfer objects
//!
//! Every response body, success or failure, is an [`ApiResponse`] envelope.

pub mod auth;
pub mod claims;

use serde::{Deserialize, Serialize};

use core_kernel::{Page, PageRequest};

use crate::error::ApiError;

/// Response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// `?page=&limit=` query; absent values default to page 1, limit 10
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl PaginationQuery {
    pub fn to_request(self) -> Result<PageRequest, ApiError> {
        PageRequest::new(self.page, self.limit).map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

/// List payload: `{items, pagination: {page, limit, total}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn from_page<S>(page: Page<S>, f: impl FnMut(S) -> T) -> Self {
        let pagination = PaginationMeta {
            page: page.request.page(),
            limit: page.request.limit(),
            total: page.total,
        };
        Self {
            items: page.items.into_iter().map(f).collect(),
            pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_omits_absent_fields() {
        let json = serde_json::to_value(ApiResponse::ok(7)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 7}));

        let json = serde_json::to_value(ApiResponse::failure("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "nope"}));
    }

    #[test]
    fn test_pagination_defaults() {
        let query: PaginationQuery = serde_json::from_str("{}").unwrap();
        let request = query.to_request().unwrap();
        assert_eq!((request.page(), request.limit()), (1, 10));
    }

    #[test]
    fn test_non_positive_page_is_bad_request() {
        let query = PaginationQuery { page: 0, limit: 10 };
        assert!(matches!(query.to_request(), Err(ApiError::BadRequest(_))));
    }
}
