//! Claim aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClaimId, UserId};
use crate::error::ClaimError;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Being prepared by its owner
    Draft,
    /// Handed in, waiting for a verifier
    Submitted,
    /// Checked by a verifier, waiting for an approver
    Reviewed,
    /// Accepted
    Approved,
    /// Turned down
    Rejected,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 5] = [
        ClaimStatus::Draft,
        ClaimStatus::Submitted,
        ClaimStatus::Reviewed,
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
    ];

    /// Returns true once no further transition can leave this status
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Approved | ClaimStatus::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Draft => "draft",
            ClaimStatus::Submitted => "submitted",
            ClaimStatus::Reviewed => "reviewed",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClaimStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ClaimError::InvalidArgument(format!("unknown claim status: {}", s)))
    }
}

/// Audit record of one status change, immutable once appended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimHistoryEntry {
    pub status: ClaimStatus,
    pub changed_by: UserId,
    pub changed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ClaimHistoryEntry {
    pub fn new(status: ClaimStatus, changed_by: UserId, changed_at: DateTime<Utc>) -> Self {
        Self {
            status,
            changed_by,
            changed_at,
            note: None,
        }
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }
}

/// Fields supplied by the owner when filing a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClaim {
    pub policy_number: String,
    pub claim_amount: Decimal,
    pub description: String,
    #[serde(default)]
    pub documents: Vec<String>,
}

impl NewClaim {
    /// Checks the fields a draft must always carry
    pub fn validate(&self) -> Result<(), ClaimError> {
        require_text("policy_number", &self.policy_number)?;
        require_text("description", &self.description)?;
        require_non_negative(self.claim_amount)
    }
}

/// Partial edit of a draft claim; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimUpdate {
    pub policy_number: Option<String>,
    pub claim_amount: Option<Decimal>,
    pub description: Option<String>,
    pub documents: Option<Vec<String>>,
}

impl ClaimUpdate {
    pub fn is_empty(&self) -> bool {
        self.policy_number.is_none()
            && self.claim_amount.is_none()
            && self.description.is_none()
            && self.documents.is_none()
    }

    /// Rejects empty edits, blank text, and negative amounts
    pub fn validate(&self) -> Result<(), ClaimError> {
        if self.is_empty() {
            return Err(ClaimError::InvalidArgument("update contains no fields".to_string()));
        }
        if let Some(policy_number) = &self.policy_number {
            require_text("policy_number", policy_number)?;
        }
        if let Some(description) = &self.description {
            require_text("description", description)?;
        }
        if let Some(amount) = self.claim_amount {
            require_non_negative(amount)?;
        }
        Ok(())
    }
}

/// A claim filed by a policyholder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// User who filed the claim
    pub owner_id: UserId,
    /// Policy the claim is made against
    pub policy_number: String,
    /// Amount claimed, never negative
    pub claim_amount: Decimal,
    /// Free-text description of the loss
    pub description: String,
    /// Opaque document references
    pub documents: Vec<String>,
    /// Current status, always equal to the last history entry's status
    pub status: ClaimStatus,
    /// Append-only status log
    pub history: Vec<ClaimHistoryEntry>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Creates a new draft owned by `owner_id`, seeding the history with its
    /// `draft` entry
    pub fn draft(owner_id: UserId, request: NewClaim, now: DateTime<Utc>) -> Result<Self, ClaimError> {
        request.validate()?;

        Ok(Self {
            id: ClaimId::new_v7(),
            owner_id,
            policy_number: request.policy_number,
            claim_amount: request.claim_amount,
            description: request.description,
            documents: request.documents,
            status: ClaimStatus::Draft,
            history: vec![ClaimHistoryEntry::new(ClaimStatus::Draft, owner_id, now)],
            created_at: now,
            updated_at: now,
        })
    }

    /// Appends a history entry and moves the status along with it
    pub fn record(&mut self, entry: ClaimHistoryEntry) {
        self.status = entry.status;
        self.updated_at = entry.changed_at;
        self.history.push(entry);
    }

    /// Applies the present fields of `update`
    pub fn apply_update(&mut self, update: &ClaimUpdate, now: DateTime<Utc>) {
        if let Some(policy_number) = &update.policy_number {
            self.policy_number = policy_number.clone();
        }
        if let Some(amount) = update.claim_amount {
            self.claim_amount = amount;
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(documents) = &update.documents {
            self.documents = documents.clone();
        }
        self.updated_at = now;
    }

    /// The most recent history entry, which carries the current status
    pub fn last_entry(&self) -> Option<&ClaimHistoryEntry> {
        self.history.last()
    }

    /// True when the history is non-empty and ends in the current status
    pub fn is_consistent(&self) -> bool {
        self.last_entry().map(|e| e.status) == Some(self.status)
    }
}

fn require_text(field: &str, value: &str) -> Result<(), ClaimError> {
    if value.trim().is_empty() {
        return Err(ClaimError::InvalidArgument(format!("{} must not be blank", field)));
    }
    Ok(())
}

fn require_non_negative(amount: Decimal) -> Result<(), ClaimError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ClaimError::InvalidArgument(format!(
            "claim_amount must not be negative, got {}",
            amount
        )));
    }
    Ok(())
}
