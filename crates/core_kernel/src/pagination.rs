//! Pagination requests and result pages

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Upper bound on `limit` for a single page
pub const MAX_PAGE_LIMIT: u32 = 100;

/// A validated one-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validates and creates a page request
    ///
    /// Non-positive values are rejected rather than defaulted, so a caller never
    /// silently receives a different window than the one it asked for.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `page < 1`, `limit < 1`, or
    /// `limit > MAX_PAGE_LIMIT`
    pub fn new(page: i64, limit: i64) -> Result<Self, CoreError> {
        if page < 1 {
            return Err(CoreError::validation(format!("page must be >= 1, got {}", page)));
        }
        if limit < 1 {
            return Err(CoreError::validation(format!("limit must be >= 1, got {}", limit)));
        }
        if limit > MAX_PAGE_LIMIT as i64 {
            return Err(CoreError::validation(format!(
                "limit must be <= {}, got {}",
                MAX_PAGE_LIMIT, limit
            )));
        }
        let page = u32::try_from(page)
            .map_err(|_| CoreError::validation(format!("page out of range: {}", page)))?;

        Ok(Self { page, limit: limit as u32 })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records preceding this page
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// One window of a larger result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total matching records, independent of the window
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self { items, total, request }
    }

    /// Applies `request` to an already sorted, fully materialized result set
    pub fn from_sorted(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .collect();
        Self { items, total, request }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        let req = PageRequest::new(3, 10).unwrap();
        assert_eq!(req.offset(), 20);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert!(PageRequest::new(-1, 5).is_err());
    }

    #[test]
    fn test_rejects_oversized_limit() {
        assert!(PageRequest::new(1, MAX_PAGE_LIMIT as i64 + 1).is_err());
        assert!(PageRequest::new(1, MAX_PAGE_LIMIT as i64).is_ok());
    }

    #[test]
    fn test_from_sorted_windows_and_counts() {
        let page = Page::from_sorted((1..=25).collect::<Vec<_>>(), PageRequest::new(3, 10).unwrap());
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);
    }

    #[test]
    fn test_from_sorted_past_end_is_empty() {
        let page = Page::from_sorted(vec![1, 2, 3], PageRequest::new(2, 10).unwrap());
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }
}
