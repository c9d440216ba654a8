//! Claims Domain Ports
//!
//! This module defines the `ClaimStore` port: the persistence contract the
//! workflow service relies on. Multiple adapters implement it:
//!
//! - **PostgreSQL Adapter**: `infra_db::adapters::PostgresClaimStore`
//! - **In-memory Adapter**: [`memory::InMemoryClaimStore`], for tests and
//!   single-process runs
//!
//! # Atomicity
//!
//! Every method is one logical operation. The three writes that depend on the
//! claim's current status (`replace_fields`, `delete`, `apply_transition`) are
//! conditional: the adapter checks the persisted status and writes in a single
//! atomic step, returning `PortError::PreconditionFailed` when the status no
//! longer matches. `apply_transition` never leaves `status` and the last history
//! entry disagreeing, even if interrupted.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_claims::{ClaimStore, ClaimWorkflowService};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn ClaimStore> = Arc::new(PostgresClaimStore::new(pool));
//! let service = ClaimWorkflowService::new(store);
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{ClaimId, UserId, Page, PageRequest, PortError, DomainPort, HealthCheckable};

use crate::claim::{Claim, ClaimHistoryEntry, ClaimStatus, ClaimUpdate};

/// Persistence contract for claim records
///
/// List results are ordered by `created_at` descending and carry the total
/// number of matching records independent of the requested window.
#[async_trait]
pub trait ClaimStore: DomainPort + HealthCheckable {
    /// Inserts a new claim, including its seeded history
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` if a claim with the same id exists
    async fn create(&self, claim: &Claim) -> Result<(), PortError>;

    /// Fetches a claim with its full history
    ///
    /// # Errors
    ///
    /// `PortError::NotFound` if no claim has this id
    async fn get(&self, id: ClaimId) -> Result<Claim, PortError>;

    /// Lists claims filed by `owner_id`
    async fn list_by_owner(&self, owner_id: UserId, page: PageRequest) -> Result<Page<Claim>, PortError>;

    /// Lists claims whose status is one of `statuses`
    async fn list_by_status(
        &self,
        statuses: &[ClaimStatus],
        page: PageRequest,
    ) -> Result<Page<Claim>, PortError>;

    /// Applies a field edit, only while the claim is still a draft
    ///
    /// # Returns
    ///
    /// The claim as persisted after the edit
    ///
    /// # Errors
    ///
    /// `PortError::PreconditionFailed` if the claim has left `Draft`
    async fn replace_fields(
        &self,
        id: ClaimId,
        update: &ClaimUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Claim, PortError>;

    /// Removes a claim, only while it is still a draft
    ///
    /// # Errors
    ///
    /// `PortError::PreconditionFailed` if the claim has left `Draft`
    async fn delete(&self, id: ClaimId) -> Result<(), PortError>;

    /// Moves the claim to `entry.status` and appends `entry`, only if the
    /// persisted status equals `expected`
    ///
    /// Status, `updated_at`, and history change together or not at all.
    ///
    /// # Errors
    ///
    /// `PortError::PreconditionFailed` if the persisted status differs from
    /// `expected` (a concurrent transition won)
    async fn apply_transition(
        &self,
        id: ClaimId,
        expected: ClaimStatus,
        entry: &ClaimHistoryEntry,
    ) -> Result<Claim, PortError>;
}

/// In-memory implementation of ClaimStore
///
/// This adapter stores claims in a map behind a single async `RwLock`. Every
/// conditional write holds the write lock across its check and its update, which
/// makes it atomic with respect to every other store call.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use core_kernel::HealthCheckResult;

    /// In-memory ClaimStore
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryClaimStore {
        claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
    }

    impl InMemoryClaimStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with claims for testing
        pub async fn with_claims(claims: Vec<Claim>) -> Self {
            let store = Self::new();
            {
                let mut map = store.claims.write().await;
                for claim in claims {
                    map.insert(claim.id, claim);
                }
            }
            store
        }

        /// Number of stored claims
        pub async fn len(&self) -> usize {
            self.claims.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.claims.read().await.is_empty()
        }

        async fn select(
            &self,
            page: PageRequest,
            predicate: impl Fn(&Claim) -> bool,
        ) -> Page<Claim> {
            let claims = self.claims.read().await;
            let mut matching: Vec<Claim> = claims.values().filter(|c| predicate(c)).cloned().collect();
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
            Page::from_sorted(matching, page)
        }
    }

    fn require_status(claim: &Claim, expected: ClaimStatus) -> Result<(), PortError> {
        if claim.status != expected {
            return Err(PortError::precondition_failed(format!(
                "claim {} is {}, expected {}",
                claim.id, claim.status, expected
            )));
        }
        Ok(())
    }

    impl DomainPort for InMemoryClaimStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryClaimStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("in-memory-claim-store")
        }
    }

    #[async_trait]
    impl ClaimStore for InMemoryClaimStore {
        async fn create(&self, claim: &Claim) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            if claims.contains_key(&claim.id) {
                return Err(PortError::conflict(format!("claim {} already exists", claim.id)));
            }
            claims.insert(claim.id, claim.clone());
            Ok(())
        }

        async fn get(&self, id: ClaimId) -> Result<Claim, PortError> {
            self.claims
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))
        }

        async fn list_by_owner(&self, owner_id: UserId, page: PageRequest) -> Result<Page<Claim>, PortError> {
            Ok(self.select(page, |c| c.owner_id == owner_id).await)
        }

        async fn list_by_status(
            &self,
            statuses: &[ClaimStatus],
            page: PageRequest,
        ) -> Result<Page<Claim>, PortError> {
            Ok(self.select(page, |c| statuses.contains(&c.status)).await)
        }

        async fn replace_fields(
            &self,
            id: ClaimId,
            update: &ClaimUpdate,
            updated_at: DateTime<Utc>,
        ) -> Result<Claim, PortError> {
            let mut claims = self.claims.write().await;
            let claim = claims.get_mut(&id).ok_or_else(|| PortError::not_found("Claim", id))?;
            require_status(claim, ClaimStatus::Draft)?;
            claim.apply_update(update, updated_at);
            Ok(claim.clone())
        }

        async fn delete(&self, id: ClaimId) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            let claim = claims.get(&id).ok_or_else(|| PortError::not_found("Claim", id))?;
            require_status(claim, ClaimStatus::Draft)?;
            claims.remove(&id);
            Ok(())
        }

        async fn apply_transition(
            &self,
            id: ClaimId,
            expected: ClaimStatus,
            entry: &ClaimHistoryEntry,
        ) -> Result<Claim, PortError> {
            let mut claims = self.claims.write().await;
            let claim = claims.get_mut(&id).ok_or_else(|| PortError::not_found("Claim", id))?;
            require_status(claim, expected)?;
            claim.record(entry.clone());
            Ok(claim.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::memory::InMemoryClaimStore;
    use crate::claim::NewClaim;
    use rust_decimal_macros::dec;

    fn draft_for(owner: UserId, created_at: DateTime<Utc>) -> Claim {
        Claim::draft(
            owner,
            NewClaim {
                policy_number: "P-1".to_string(),
                claim_amount: dec!(100),
                description: "hail".to_string(),
                documents: vec![],
            },
            created_at,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryClaimStore::new();
        let claim = draft_for(UserId::new(), Utc::now());

        store.create(&claim).await.unwrap();
        assert_eq!(store.get(claim.id).await.unwrap(), claim);
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let store = InMemoryClaimStore::new();
        let claim = draft_for(UserId::new(), Utc::now());

        store.create(&claim).await.unwrap();
        let err = store.create(&claim).await.unwrap_err();
        assert!(matches!(err, PortError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = InMemoryClaimStore::new();
        assert!(store.get(ClaimId::new()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_by_owner_sorts_newest_first() {
        let owner = UserId::new();
        let base = Utc::now();
        let older = draft_for(owner, base);
        let newer = draft_for(owner, base + chrono::Duration::seconds(10));
        let other = draft_for(UserId::new(), base);
        let store = InMemoryClaimStore::with_claims(vec![older.clone(), newer.clone(), other]).await;

        let page = store.list_by_owner(owner, PageRequest::new(1, 10).unwrap()).await.unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].id, newer.id);
        assert_eq!(page.items[1].id, older.id);
    }

    #[tokio::test]
    async fn test_apply_transition_checks_expected_status() {
        let owner = UserId::new();
        let claim = draft_for(owner, Utc::now());
        let store = InMemoryClaimStore::with_claims(vec![claim.clone()]).await;
        let entry = ClaimHistoryEntry::new(ClaimStatus::Reviewed, UserId::new(), Utc::now());

        let err = store
            .apply_transition(claim.id, ClaimStatus::Submitted, &entry)
            .await
            .unwrap_err();

        assert!(matches!(err, PortError::PreconditionFailed { .. }));
        let unchanged = store.get(claim.id).await.unwrap();
        assert_eq!(unchanged.history.len(), 1);
        assert_eq!(unchanged.status, ClaimStatus::Draft);
    }

    #[tokio::test]
    async fn test_delete_refuses_non_draft() {
        let owner = UserId::new();
        let mut claim = draft_for(owner, Utc::now());
        claim.record(ClaimHistoryEntry::new(ClaimStatus::Submitted, owner, Utc::now()));
        let store = InMemoryClaimStore::with_claims(vec![claim.clone()]).await;

        assert!(store.delete(claim.id).await.is_err());
        assert_eq!(store.len().await, 1);
    }
}
