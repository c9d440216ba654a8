//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::{PageRequest, Role};

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_display() {
    let error = CoreError::validation("Test error");
    let display = format!("{}", error);

    assert!(display.contains("Validation error"));
}

#[test]
fn test_page_request_error_mentions_field() {
    let error = PageRequest::new(0, 10).unwrap_err();
    assert!(error.to_string().contains("page"));

    let error = PageRequest::new(1, -3).unwrap_err();
    assert!(error.to_string().contains("limit"));
}

#[test]
fn test_unknown_role_error() {
    let error = "superuser".parse::<Role>().unwrap_err();
    assert!(matches!(error, CoreError::UnknownRole(ref r) if r == "superuser"));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn valid_page_requests_have_consistent_offsets(page in 1i64..10_000, limit in 1i64..=100) {
            let req = PageRequest::new(page, limit).unwrap();
            prop_assert_eq!(req.offset(), ((page - 1) * limit) as u64);
        }

        #[test]
        fn non_positive_pages_are_rejected(page in -1_000i64..1, limit in 1i64..=100) {
            prop_assert!(PageRequest::new(page, limit).is_err());
        }
    }
}
