//! Claims DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_claims::{Claim, ClaimHistoryEntry, ClaimStatus, ClaimUpdate, NewClaim};

#[derive(Debug, Deserialize)]
pub struct CreateClaimRequest {
    pub policy_number: String,
    pub claim_amount: Decimal,
    pub description: String,
    #[serde(default)]
    pub documents: Vec<String>,
}

impl From<CreateClaimRequest> for NewClaim {
    fn from(request: CreateClaimRequest) -> Self {
        NewClaim {
            policy_number: request.policy_number,
            claim_amount: request.claim_amount,
            description: request.description,
            documents: request.documents,
        }
    }
}

/// Draft edit; absent fields keep their stored value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateClaimRequest {
    pub policy_number: Option<String>,
    pub claim_amount: Option<Decimal>,
    pub description: Option<String>,
    pub documents: Option<Vec<String>>,
}

impl From<UpdateClaimRequest> for ClaimUpdate {
    fn from(request: UpdateClaimRequest) -> Self {
        ClaimUpdate {
            policy_number: request.policy_number,
            claim_amount: request.claim_amount,
            description: request.description,
            documents: request.documents,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewRequest {
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryEntryResponse {
    pub status: ClaimStatus,
    pub changed_by: Uuid,
    pub changed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<ClaimHistoryEntry> for HistoryEntryResponse {
    fn from(entry: ClaimHistoryEntry) -> Self {
        Self {
            status: entry.status,
            changed_by: entry.changed_by.into(),
            changed_at: entry.changed_at,
            note: entry.note,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub policy_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub claim_amount: Decimal,
    pub description: String,
    pub documents: Vec<String>,
    pub status: ClaimStatus,
    pub history: Vec<HistoryEntryResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: claim.id.into(),
            user_id: claim.owner_id.into(),
            policy_number: claim.policy_number,
            claim_amount: claim.claim_amount,
            description: claim.description,
            documents: claim.documents,
            status: claim.status,
            history: claim.history.into_iter().map(Into::into).collect(),
            created_at: claim.created_at,
            updated_at: claim.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::UserId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_accepts_number_and_renders_as_number() {
        let request: CreateClaimRequest = serde_json::from_value(serde_json::json!({
            "policy_number": "P-1",
            "claim_amount": 500.5,
            "description": "flood"
        }))
        .unwrap();
        assert_eq!(request.claim_amount, dec!(500.5));
        assert!(request.documents.is_empty());

        let claim = Claim::draft(UserId::new(), request.into(), Utc::now()).unwrap();
        let json = serde_json::to_value(ClaimResponse::from(claim)).unwrap();

        assert_eq!(json["claim_amount"], serde_json::json!(500.5));
        assert_eq!(json["status"], "draft");
        assert_eq!(json["history"].as_array().unwrap().len(), 1);
        assert!(json["history"][0].get("note").is_none());
    }
}
