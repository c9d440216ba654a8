//! Claim lifecycle engine
//!
//! Pure decision logic for every status change and every owner-only mutation.
//! Nothing here touches storage or the clock; callers pass in the current state,
//! the actor, and the time to stamp on the history entry.
//!
//! ```text
//!            submit (owner)      review (verifier)     approve (approver)
//!   Draft ───────────────▶ Submitted ───────────▶ Reviewed ───────────▶ Approved
//!     │                                              │
//!     │ edit / delete (owner)                        │ reject (approver)
//!     ▼                                              ▼
//!   Draft / removed                               Rejected
//! ```
//!
//! A refused request is reported as `InvalidTransition` whether the status or the
//! actor was wrong.

use chrono::{DateTime, Utc};
use std::fmt;

use core_kernel::{Actor, Role, UserId};
use crate::claim::{ClaimHistoryEntry, ClaimStatus};
use crate::error::ClaimError;

const VERIFIER_QUEUE: &[ClaimStatus] = &[ClaimStatus::Submitted, ClaimStatus::Reviewed];
const APPROVER_QUEUE: &[ClaimStatus] = &[
    ClaimStatus::Reviewed,
    ClaimStatus::Approved,
    ClaimStatus::Rejected,
];

/// A requested status change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Submit,
    Review { note: Option<String> },
    Approve,
    Reject { reason: Option<String> },
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::Submit => "submit",
            Transition::Review { .. } => "review",
            Transition::Approve => "approve",
            Transition::Reject { .. } => "reject",
        }
    }

    /// The only status this transition may leave
    pub fn source(&self) -> ClaimStatus {
        match self {
            Transition::Submit => ClaimStatus::Draft,
            Transition::Review { .. } => ClaimStatus::Submitted,
            Transition::Approve | Transition::Reject { .. } => ClaimStatus::Reviewed,
        }
    }

    pub fn target(&self) -> ClaimStatus {
        match self {
            Transition::Submit => ClaimStatus::Submitted,
            Transition::Review { .. } => ClaimStatus::Reviewed,
            Transition::Approve => ClaimStatus::Approved,
            Transition::Reject { .. } => ClaimStatus::Rejected,
        }
    }

    fn permits(&self, actor: &Actor, owner_id: UserId) -> bool {
        match self {
            Transition::Submit => actor.is(owner_id),
            Transition::Review { .. } => actor.role == Role::Verifier,
            Transition::Approve | Transition::Reject { .. } => actor.role == Role::Approver,
        }
    }

    fn into_note(self) -> Option<String> {
        match self {
            Transition::Review { note } => note,
            Transition::Reject { reason } => reason,
            Transition::Submit | Transition::Approve => None,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Owner-only changes that keep the claim in `Draft` (or remove it)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Edit,
    Delete,
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Edit => "edit",
            Mutation::Delete => "delete",
        }
    }
}

/// An accepted transition: the status it leaves, and the entry to append
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub from: ClaimStatus,
    pub entry: ClaimHistoryEntry,
}

impl Decision {
    pub fn to(&self) -> ClaimStatus {
        self.entry.status
    }
}

/// Decides whether `actor` may apply `transition` to a claim currently in
/// `current` and owned by `owner_id`
///
/// # Returns
///
/// The resulting history entry, stamped with `at`
///
/// # Errors
///
/// `ClaimError::InvalidTransition` if the claim is not in the transition's source
/// status or the actor fails its role/ownership predicate
pub fn decide(
    current: ClaimStatus,
    actor: &Actor,
    owner_id: UserId,
    transition: Transition,
    at: DateTime<Utc>,
) -> Result<Decision, ClaimError> {
    if current != transition.source() || !transition.permits(actor, owner_id) {
        return Err(ClaimError::invalid_transition(transition.name()));
    }

    let to = transition.target();
    let entry = ClaimHistoryEntry::new(to, actor.id, at).with_note(transition.into_note());

    Ok(Decision { from: current, entry })
}

/// Authorizes an edit or delete: owner only, draft only
pub fn authorize_mutation(
    mutation: Mutation,
    current: ClaimStatus,
    actor: &Actor,
    owner_id: UserId,
) -> Result<(), ClaimError> {
    if current != ClaimStatus::Draft || !actor.is(owner_id) {
        return Err(ClaimError::invalid_transition(mutation.name()));
    }
    Ok(())
}

/// Owners read their own claims; verifiers and approvers read any claim
pub fn can_read(actor: &Actor, owner_id: UserId) -> bool {
    actor.is(owner_id) || matches!(actor.role, Role::Verifier | Role::Approver)
}

/// Statuses a role may see when listing claims beyond its own
///
/// # Errors
///
/// `ClaimError::Forbidden` for roles without a cross-owner listing
pub fn visible_statuses(role: Role) -> Result<&'static [ClaimStatus], ClaimError> {
    match role {
        Role::Verifier => Ok(VERIFIER_QUEUE),
        Role::Approver => Ok(APPROVER_QUEUE),
        Role::User => Err(ClaimError::Forbidden(
            "listing all claims requires the verifier or approver role".to_string(),
        )),
    }
}
