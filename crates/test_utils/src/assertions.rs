//! Custom Test Assertions
//!
//! Provides assertion helpers for claims that give more meaningful failure
//! messages than standard assertions.

use core_kernel::UserId;
use domain_claims::{Claim, ClaimStatus, ClaimError};

/// Asserts every history invariant of a claim
///
/// # Panics
///
/// Panics if the history is empty, does not start at `draft`, is not ordered by
/// time, or does not end in the claim's current status
pub fn assert_history_consistent(claim: &Claim) {
    assert!(!claim.history.is_empty(), "Claim {} has an empty history", claim.id);
    assert_eq!(
        claim.history[0].status,
        ClaimStatus::Draft,
        "Claim {} history does not start at draft",
        claim.id
    );
    assert_eq!(
        claim.history[0].changed_by, claim.owner_id,
        "Claim {} draft entry was not recorded by the owner",
        claim.id
    );
    for pair in claim.history.windows(2) {
        assert!(
            pair[0].changed_at <= pair[1].changed_at,
            "Claim {} history goes back in time: {} then {}",
            claim.id,
            pair[0].changed_at,
            pair[1].changed_at
        );
    }
    assert!(
        claim.is_consistent(),
        "Claim {} status {} does not match last history entry {:?}",
        claim.id,
        claim.status,
        claim.last_entry().map(|e| e.status)
    );
}

/// Asserts the sequence of statuses recorded in a claim's history
pub fn assert_history_statuses(claim: &Claim, expected: &[ClaimStatus]) {
    let actual: Vec<ClaimStatus> = claim.history.iter().map(|e| e.status).collect();
    assert_eq!(actual, expected, "Claim {} history statuses differ", claim.id);
}

/// Asserts who recorded each history entry
pub fn assert_history_actors(claim: &Claim, expected: &[UserId]) {
    let actual: Vec<UserId> = claim.history.iter().map(|e| e.changed_by).collect();
    assert_eq!(actual, expected, "Claim {} history actors differ", claim.id);
}

/// Asserts a result failed with `InvalidTransition` for `operation`
pub fn assert_invalid_transition<T: std::fmt::Debug>(result: Result<T, ClaimError>, operation: &str) {
    match result {
        Err(ClaimError::InvalidTransition { operation: op }) => assert_eq!(
            op, operation,
            "Expected InvalidTransition for {}, got it for {}",
            operation, op
        ),
        other => panic!("Expected InvalidTransition for {}, got {:?}", operation, other),
    }
}
