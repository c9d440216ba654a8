//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating claim workflow data that
//! maintains domain invariants.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::{Actor, Role, UserId};
use domain_claims::{ClaimStatus, NewClaim, Transition};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating any claim status
pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop::sample::select(ClaimStatus::ALL.to_vec())
}

/// Strategy for generating any role
pub fn role_strategy() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

/// Strategy for generating an actor with a fresh id
pub fn actor_strategy() -> impl Strategy<Value = Actor> {
    role_strategy().prop_map(|role| Actor::new(UserId::new(), role))
}

/// Strategy for generating short optional notes
pub fn note_strategy() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-zA-Z0-9 ]{1,40}")
}

/// Strategy for generating any requested transition
pub fn transition_strategy() -> impl Strategy<Value = Transition> {
    prop_oneof![
        Just(Transition::Submit),
        note_strategy().prop_map(|note| Transition::Review { note }),
        Just(Transition::Approve),
        note_strategy().prop_map(|reason| Transition::Reject { reason }),
    ]
}

/// Strategy for generating non-negative amounts with two decimal places
pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for generating valid claim requests
pub fn new_claim_strategy() -> impl Strategy<Value = NewClaim> {
    (
        "P-[0-9]{1,6}",
        amount_strategy(),
        "[a-z]{1,10}( [a-z]{1,10}){0,4}",
        proptest::collection::vec("doc-[a-z0-9]{4}", 0..4),
    )
        .prop_map(|(policy_number, claim_amount, description, documents)| NewClaim {
            policy_number,
            claim_amount,
            description,
            documents,
        })
}

/// Strategy for generating timestamps within 2024
pub fn timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..365 * 24 * 3600).prop_map(|secs| {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    })
}
