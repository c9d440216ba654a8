//! Claims repository implementation
//!
//! This module provides database access for claim records and their status
//! history. Every write that depends on the claim's current status is a guarded
//! statement (`... WHERE status = $expected`) so that concurrent requests cannot
//! both pass a check made on a stale read. Reads that span the claim row and its
//! history run in one `REPEATABLE READ` snapshot, so a concurrent transition is
//! seen entirely or not at all.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool, Postgres, Transaction};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::DatabaseError;

const CLAIM_COLUMNS: &str = "claim_id, owner_id, policy_number, claim_amount, description, \
     documents, status, created_at, updated_at";

const HISTORY_COLUMNS: &str = "claim_id, status, changed_by, changed_at, note";

/// Repository for managing claims data
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    /// Creates a new ClaimsRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a claim and its seeded history in one transaction
    pub async fn insert(&self, claim: &ClaimRow, history: &[HistoryRow]) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO claims (
                claim_id, owner_id, policy_number, claim_amount, description,
                documents, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(claim.claim_id)
        .bind(claim.owner_id)
        .bind(&claim.policy_number)
        .bind(claim.claim_amount)
        .bind(&claim.description)
        .bind(&claim.documents)
        .bind(claim.status)
        .bind(claim.created_at)
        .bind(claim.updated_at)
        .execute(&mut *tx)
        .await?;

        for entry in history {
            insert_history(&mut tx, entry).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Retrieves a claim with its full history
    ///
    /// The row and its history are read from one snapshot.
    pub async fn get_by_id(&self, claim_id: Uuid) -> Result<ClaimRecord, DatabaseError> {
        let mut tx = self.snapshot().await?;
        let record = fetch_record(&mut tx, claim_id).await?;
        tx.commit().await?;
        Ok(record)
    }

    /// Lists one page of an owner's claims, newest first, with the total count
    pub async fn find_by_owner(
        &self,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ClaimRecord>, i64), DatabaseError> {
        let mut tx = self.snapshot().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM claims WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;

        let claims = sqlx::query_as::<_, ClaimRow>(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE owner_id = $1 \
             ORDER BY created_at DESC, claim_id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *tx)
        .await?;

        let records = attach_history(&mut tx, claims).await?;
        tx.commit().await?;
        Ok((records, total))
    }

    /// Lists one page of claims in any of `statuses`, newest first, with the total count
    pub async fn find_by_status(
        &self,
        statuses: &[ClaimStatus],
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ClaimRecord>, i64), DatabaseError> {
        let mut tx = self.snapshot().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM claims WHERE status = ANY($1)")
            .bind(statuses)
            .fetch_one(&mut *tx)
            .await?;

        let claims = sqlx::query_as::<_, ClaimRow>(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE status = ANY($1) \
             ORDER BY created_at DESC, claim_id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(statuses)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *tx)
        .await?;

        let records = attach_history(&mut tx, claims).await?;
        tx.commit().await?;
        Ok((records, total))
    }

    /// Overwrites the present fields of a draft claim
    ///
    /// # Errors
    ///
    /// `DatabaseError::StateMismatch` if the claim exists but is no longer a draft
    pub async fn update_draft_fields(
        &self,
        claim_id: Uuid,
        changes: &ClaimChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<ClaimRecord, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE claims SET
                policy_number = COALESCE($2, policy_number),
                claim_amount  = COALESCE($3, claim_amount),
                description   = COALESCE($4, description),
                documents     = COALESCE($5, documents),
                updated_at    = $6
            WHERE claim_id = $1 AND status = 'draft'
            "#,
        )
        .bind(claim_id)
        .bind(changes.policy_number.as_deref())
        .bind(changes.claim_amount)
        .bind(changes.description.as_deref())
        .bind(changes.documents.as_deref())
        .bind(updated_at)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(self.explain_miss(claim_id, ClaimStatus::Draft).await);
        }

        // the updated row stays locked until commit, so the read-back is current
        let record = fetch_record(&mut tx, claim_id).await?;
        tx.commit().await?;
        Ok(record)
    }

    /// Deletes a draft claim and its history
    ///
    /// # Errors
    ///
    /// `DatabaseError::StateMismatch` if the claim exists but is no longer a draft
    pub async fn delete_draft(&self, claim_id: Uuid) -> Result<(), DatabaseError> {
        let deleted = sqlx::query("DELETE FROM claims WHERE claim_id = $1 AND status = 'draft'")
            .bind(claim_id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(self.explain_miss(claim_id, ClaimStatus::Draft).await);
        }
        Ok(())
    }

    /// Moves a claim from `expected` to `entry.status` and appends `entry`
    ///
    /// The guarded update and the history insert commit together.
    ///
    /// # Errors
    ///
    /// `DatabaseError::StateMismatch` if the claim is no longer in `expected`
    pub async fn transition(
        &self,
        claim_id: Uuid,
        expected: ClaimStatus,
        entry: &HistoryRow,
    ) -> Result<ClaimRecord, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let moved = sqlx::query(
            "UPDATE claims SET status = $3, updated_at = $4 WHERE claim_id = $1 AND status = $2",
        )
        .bind(claim_id)
        .bind(expected)
        .bind(entry.status)
        .bind(entry.changed_at)
        .execute(&mut *tx)
        .await?;

        if moved.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(self.explain_miss(claim_id, expected).await);
        }

        insert_history(&mut tx, entry).await?;
        let record = fetch_record(&mut tx, claim_id).await?;
        tx.commit().await?;

        debug!(%claim_id, from = ?expected, to = ?entry.status, "Claim transition committed");
        Ok(record)
    }

    /// Opens a read-only transaction whose statements all see one snapshot
    async fn snapshot(&self) -> Result<Transaction<'static, Postgres>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    /// Distinguishes a missing claim from one in the wrong status after a
    /// guarded write matched no row
    async fn explain_miss(&self, claim_id: Uuid, expected: ClaimStatus) -> DatabaseError {
        let current: Result<Option<ClaimStatus>, sqlx::Error> =
            sqlx::query_scalar("SELECT status FROM claims WHERE claim_id = $1")
                .bind(claim_id)
                .fetch_optional(&self.pool)
                .await;

        match current {
            Ok(Some(status)) => DatabaseError::StateMismatch(format!(
                "claim {} is {:?}, expected {:?}",
                claim_id, status, expected
            )),
            Ok(None) => DatabaseError::not_found("Claim", claim_id),
            Err(e) => e.into(),
        }
    }
}

async fn fetch_record(conn: &mut PgConnection, claim_id: Uuid) -> Result<ClaimRecord, DatabaseError> {
    let claim = sqlx::query_as::<_, ClaimRow>(&format!(
        "SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = $1"
    ))
    .bind(claim_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Claim", claim_id))?;

    let history = sqlx::query_as::<_, HistoryRow>(&format!(
        "SELECT {HISTORY_COLUMNS} FROM claim_history WHERE claim_id = $1 ORDER BY seq"
    ))
    .bind(claim_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(ClaimRecord { claim, history })
}

async fn attach_history(conn: &mut PgConnection, claims: Vec<ClaimRow>) -> Result<Vec<ClaimRecord>, DatabaseError> {
    if claims.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = claims.iter().map(|c| c.claim_id).collect();

    let rows = sqlx::query_as::<_, HistoryRow>(&format!(
        "SELECT {HISTORY_COLUMNS} FROM claim_history WHERE claim_id = ANY($1) ORDER BY seq"
    ))
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut by_claim: HashMap<Uuid, Vec<HistoryRow>> = HashMap::new();
    for row in rows {
        by_claim.entry(row.claim_id).or_default().push(row);
    }

    Ok(claims
        .into_iter()
        .map(|claim| {
            let history = by_claim.remove(&claim.claim_id).unwrap_or_default();
            ClaimRecord { claim, history }
        })
        .collect())
}

async fn insert_history(tx: &mut Transaction<'_, Postgres>, entry: &HistoryRow) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO claim_history (claim_id, status, changed_by, changed_at, note)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(entry.claim_id)
    .bind(entry.status)
    .bind(entry.changed_by)
    .bind(entry.changed_at)
    .bind(entry.note.as_deref())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// A claim row together with its ordered history rows
#[derive(Debug, Clone)]
pub struct ClaimRecord {
    pub claim: ClaimRow,
    pub history: Vec<HistoryRow>,
}

/// Database row for claims
#[derive(Debug, Clone, FromRow)]
pub struct ClaimRow {
    pub claim_id: Uuid,
    pub owner_id: Uuid,
    pub policy_number: String,
    pub claim_amount: Decimal,
    pub description: String,
    pub documents: Vec<String>,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for claim status history
#[derive(Debug, Clone, FromRow)]
pub struct HistoryRow {
    pub claim_id: Uuid,
    pub status: ClaimStatus,
    pub changed_by: Uuid,
    pub changed_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// Field overwrites for a draft; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ClaimChanges {
    pub policy_number: Option<String>,
    pub claim_amount: Option<Decimal>,
    pub description: Option<String>,
    pub documents: Option<Vec<String>>,
}

/// Claim status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_status", rename_all = "snake_case")]
pub enum ClaimStatus {
    Draft,
    Submitted,
    Reviewed,
    Approved,
    Rejected,
}
