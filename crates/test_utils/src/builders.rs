//! Test Data Builders
//!
//! Provides builder patterns for constructing claims in any lifecycle status
//! with a consistent history. Tests specify only the relevant fields and get
//! defaults for everything else.

use chrono::{DateTime, Duration, Utc};
use core_kernel::{Actor, UserId};
use domain_claims::{Claim, ClaimHistoryEntry, ClaimStatus, NewClaim};
use rust_decimal::Decimal;

use crate::fixtures::ClaimFixtures;

/// Builder for claims already advanced to a given status
///
/// The history is generated edge by edge, one second apart, with a distinct
/// verifier and approver, so the result satisfies every lifecycle invariant.
pub struct TestClaimBuilder {
    owner: Actor,
    request: NewClaim,
    status: ClaimStatus,
    created_at: DateTime<Utc>,
    verifier: Actor,
    approver: Actor,
    review_note: Option<String>,
    reject_reason: Option<String>,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    /// Creates a new builder for a draft flood claim
    pub fn new() -> Self {
        Self {
            owner: Actor::user(UserId::new_v7()),
            request: ClaimFixtures::flood(),
            status: ClaimStatus::Draft,
            created_at: Utc::now(),
            verifier: Actor::verifier(UserId::new_v7()),
            approver: Actor::approver(UserId::new_v7()),
            review_note: None,
            reject_reason: None,
        }
    }

    /// Sets the owner
    pub fn owned_by(mut self, owner: Actor) -> Self {
        self.owner = owner;
        self
    }

    /// Sets the status the claim is advanced to
    pub fn in_status(mut self, status: ClaimStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the creation time
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.request.claim_amount = amount;
        self
    }

    pub fn with_policy_number(mut self, number: impl Into<String>) -> Self {
        self.request.policy_number = number.into();
        self
    }

    pub fn reviewed_by(mut self, verifier: Actor) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn decided_by(mut self, approver: Actor) -> Self {
        self.approver = approver;
        self
    }

    pub fn with_review_note(mut self, note: impl Into<String>) -> Self {
        self.review_note = Some(note.into());
        self
    }

    pub fn with_reject_reason(mut self, reason: impl Into<String>) -> Self {
        self.reject_reason = Some(reason.into());
        self
    }

    /// Builds the claim
    ///
    /// # Panics
    ///
    /// Panics if the request fields are invalid
    pub fn build(self) -> Claim {
        let mut claim = Claim::draft(self.owner.id, self.request, self.created_at)
            .expect("builder request is valid");

        let path: &[ClaimStatus] = match self.status {
            ClaimStatus::Draft => &[],
            ClaimStatus::Submitted => &[ClaimStatus::Submitted],
            ClaimStatus::Reviewed => &[ClaimStatus::Submitted, ClaimStatus::Reviewed],
            ClaimStatus::Approved => &[ClaimStatus::Submitted, ClaimStatus::Reviewed, ClaimStatus::Approved],
            ClaimStatus::Rejected => &[ClaimStatus::Submitted, ClaimStatus::Reviewed, ClaimStatus::Rejected],
        };

        for (step, status) in path.iter().copied().enumerate() {
            let at = self.created_at + Duration::seconds(step as i64 + 1);
            let entry = match status {
                ClaimStatus::Submitted => ClaimHistoryEntry::new(status, self.owner.id, at),
                ClaimStatus::Reviewed => {
                    ClaimHistoryEntry::new(status, self.verifier.id, at).with_note(self.review_note.clone())
                }
                ClaimStatus::Rejected => {
                    ClaimHistoryEntry::new(status, self.approver.id, at).with_note(self.reject_reason.clone())
                }
                _ => ClaimHistoryEntry::new(status, self.approver.id, at),
            };
            claim.record(entry);
        }
        claim
    }
}
