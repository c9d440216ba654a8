//! PostgreSQL Claim Store Adapter
//!
//! Implements the `ClaimStore` port on top of [`ClaimsRepository`]. The guarded
//! writes in the repository provide the conditional semantics the port requires;
//! this adapter only translates types and errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    ClaimId, UserId, Page, PageRequest, PortError, DomainPort,
    HealthCheckable, HealthCheckResult,
};
use domain_claims::{Claim, ClaimHistoryEntry, ClaimStatus, ClaimStore, ClaimUpdate};

use crate::repositories::claims::{
    ClaimsRepository, ClaimRecord, ClaimRow, HistoryRow, ClaimChanges,
    ClaimStatus as DbClaimStatus,
};

/// PostgreSQL-backed implementation of the ClaimStore port
#[derive(Debug, Clone)]
pub struct PostgresClaimStore {
    repository: ClaimsRepository,
    pool: PgPool,
}

impl PostgresClaimStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &ClaimsRepository {
        &self.repository
    }
}

impl DomainPort for PostgresClaimStore {}

#[async_trait]
impl HealthCheckable for PostgresClaimStore {
    async fn health_check(&self) -> HealthCheckResult {
        super::probe(&self.pool, "postgres-claim-store").await
    }
}

#[async_trait]
impl ClaimStore for PostgresClaimStore {
    #[instrument(skip(self, claim), fields(claim_id = %claim.id))]
    async fn create(&self, claim: &Claim) -> Result<(), PortError> {
        let row = claim_to_row(claim);
        let history: Vec<HistoryRow> = claim
            .history
            .iter()
            .map(|entry| entry_to_row(claim.id, entry))
            .collect();

        self.repository.insert(&row, &history).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn get(&self, id: ClaimId) -> Result<Claim, PortError> {
        debug!("Fetching claim by ID");
        record_to_claim(self.repository.get_by_id(id.into()).await?)
    }

    #[instrument(skip(self), fields(owner_id = %owner_id))]
    async fn list_by_owner(&self, owner_id: UserId, page: PageRequest) -> Result<Page<Claim>, PortError> {
        let (records, total) = self
            .repository
            .find_by_owner(owner_id.into(), page.limit() as i64, page.offset() as i64)
            .await?;
        to_page(records, total, page)
    }

    #[instrument(skip(self))]
    async fn list_by_status(
        &self,
        statuses: &[ClaimStatus],
        page: PageRequest,
    ) -> Result<Page<Claim>, PortError> {
        let statuses: Vec<DbClaimStatus> = statuses.iter().copied().map(status_to_db).collect();
        let (records, total) = self
            .repository
            .find_by_status(&statuses, page.limit() as i64, page.offset() as i64)
            .await?;
        to_page(records, total, page)
    }

    #[instrument(skip(self, update), fields(claim_id = %id))]
    async fn replace_fields(
        &self,
        id: ClaimId,
        update: &ClaimUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Claim, PortError> {
        let changes = ClaimChanges {
            policy_number: update.policy_number.clone(),
            claim_amount: update.claim_amount,
            description: update.description.clone(),
            documents: update.documents.clone(),
        };
        record_to_claim(self.repository.update_draft_fields(id.into(), &changes, updated_at).await?)
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn delete(&self, id: ClaimId) -> Result<(), PortError> {
        self.repository.delete_draft(id.into()).await?;
        Ok(())
    }

    #[instrument(skip(self, entry), fields(claim_id = %id, to = %entry.status))]
    async fn apply_transition(
        &self,
        id: ClaimId,
        expected: ClaimStatus,
        entry: &ClaimHistoryEntry,
    ) -> Result<Claim, PortError> {
        let record = self
            .repository
            .transition(id.into(), status_to_db(expected), &entry_to_row(id, entry))
            .await?;
        record_to_claim(record)
    }
}

fn to_page(records: Vec<ClaimRecord>, total: i64, page: PageRequest) -> Result<Page<Claim>, PortError> {
    let items = records
        .into_iter()
        .map(record_to_claim)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page::new(items, total.max(0) as u64, page))
}

fn claim_to_row(claim: &Claim) -> ClaimRow {
    ClaimRow {
        claim_id: claim.id.into(),
        owner_id: claim.owner_id.into(),
        policy_number: claim.policy_number.clone(),
        claim_amount: claim.claim_amount,
        description: claim.description.clone(),
        documents: claim.documents.clone(),
        status: status_to_db(claim.status),
        created_at: claim.created_at,
        updated_at: claim.updated_at,
    }
}

fn entry_to_row(claim_id: ClaimId, entry: &ClaimHistoryEntry) -> HistoryRow {
    HistoryRow {
        claim_id: claim_id.into(),
        status: status_to_db(entry.status),
        changed_by: entry.changed_by.into(),
        changed_at: entry.changed_at,
        note: entry.note.clone(),
    }
}

fn record_to_claim(record: ClaimRecord) -> Result<Claim, PortError> {
    let ClaimRecord { claim: row, history } = record;

    let claim = Claim {
        id: ClaimId::from(row.claim_id),
        owner_id: UserId::from(row.owner_id),
        policy_number: row.policy_number,
        claim_amount: row.claim_amount,
        description: row.description,
        documents: row.documents,
        status: status_from_db(row.status),
        history: history
            .into_iter()
            .map(|h| ClaimHistoryEntry {
                status: status_from_db(h.status),
                changed_by: UserId::from(h.changed_by),
                changed_at: h.changed_at,
                note: h.note,
            })
            .collect(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    };

    if !claim.is_consistent() {
        return Err(PortError::internal(format!(
            "claim {} status does not match its history",
            claim.id
        )));
    }
    Ok(claim)
}

fn status_to_db(status: ClaimStatus) -> DbClaimStatus {
    match status {
        ClaimStatus::Draft => DbClaimStatus::Draft,
        ClaimStatus::Submitted => DbClaimStatus::Submitted,
        ClaimStatus::Reviewed => DbClaimStatus::Reviewed,
        ClaimStatus::Approved => DbClaimStatus::Approved,
        ClaimStatus::Rejected => DbClaimStatus::Rejected,
    }
}

fn status_from_db(status: DbClaimStatus) -> ClaimStatus {
    match status {
        DbClaimStatus::Draft => ClaimStatus::Draft,
        DbClaimStatus::Submitted => ClaimStatus::Submitted,
        DbClaimStatus::Reviewed => ClaimStatus::Reviewed,
        DbClaimStatus::Approved => ClaimStatus::Approved,
        DbClaimStatus::Rejected => ClaimStatus::Rejected,
    }
}
