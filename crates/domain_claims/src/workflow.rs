//! Claim workflow service
//!
//! One method per use case. Each follows the same shape: fetch the current claim,
//! ask the lifecycle engine for a decision, then persist through a single
//! conditional store call. The service keeps no state of its own beyond the
//! injected store handle, so one instance is shared by every request.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use core_kernel::{Actor, ClaimId, HealthCheckResult, Page, PageRequest, PortError};

use crate::claim::{Claim, ClaimUpdate, NewClaim};
use crate::error::ClaimError;
use crate::lifecycle::{self, Mutation, Transition};
use crate::ports::ClaimStore;

/// Default bound on a single store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Orchestrates the claim store and the lifecycle engine
#[derive(Clone)]
pub struct ClaimWorkflowService {
    store: Arc<dyn ClaimStore>,
    store_timeout: Duration,
}

impl ClaimWorkflowService {
    /// Creates a service over `store` with the default store timeout
    pub fn new(store: Arc<dyn ClaimStore>) -> Self {
        Self {
            store,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Sets the bound applied to every store call
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    /// Files a new draft claim owned by `actor`
    #[instrument(skip(self, request), fields(actor = %actor.id))]
    pub async fn create_claim(&self, actor: &Actor, request: NewClaim) -> Result<Claim, ClaimError> {
        let claim = Claim::draft(actor.id, request, Utc::now())?;
        self.bounded("create", self.store.create(&claim)).await?;

        info!(claim_id = %claim.id, "Claim created");
        Ok(claim)
    }

    /// Fetches a claim the actor is allowed to read
    #[instrument(skip(self), fields(actor = %actor.id, role = %actor.role))]
    pub async fn get_claim(&self, actor: &Actor, id: ClaimId) -> Result<Claim, ClaimError> {
        let claim = self.fetch(id).await?;
        if !lifecycle::can_read(actor, claim.owner_id) {
            warn!(claim_id = %id, "Read denied");
            return Err(ClaimError::Forbidden(format!("not allowed to read claim {}", id)));
        }
        Ok(claim)
    }

    /// Lists the actor's own claims, newest first
    #[instrument(skip(self), fields(actor = %actor.id))]
    pub async fn list_own_claims(&self, actor: &Actor, page: PageRequest) -> Result<Page<Claim>, ClaimError> {
        let claims = self
            .bounded("list_by_owner", self.store.list_by_owner(actor.id, page))
            .await?;
        debug!(total = claims.total, "Listed own claims");
        Ok(claims)
    }

    /// Lists every claim the actor's role may see, newest first
    #[instrument(skip(self), fields(actor = %actor.id, role = %actor.role))]
    pub async fn list_visible_claims(&self, actor: &Actor, page: PageRequest) -> Result<Page<Claim>, ClaimError> {
        let statuses = lifecycle::visible_statuses(actor.role).inspect_err(|_| {
            warn!("Cross-owner listing denied");
        })?;
        let claims = self
            .bounded("list_by_status", self.store.list_by_status(statuses, page))
            .await?;
        debug!(total = claims.total, "Listed visible claims");
        Ok(claims)
    }

    /// Edits fields of a draft claim owned by the actor
    #[instrument(skip(self, update), fields(actor = %actor.id))]
    pub async fn update_claim(
        &self,
        actor: &Actor,
        id: ClaimId,
        update: ClaimUpdate,
    ) -> Result<Claim, ClaimError> {
        update.validate()?;
        let claim = self.fetch(id).await?;
        self.authorize(Mutation::Edit, &claim, actor)?;

        let updated = self
            .bounded("replace_fields", self.store.replace_fields(id, &update, Utc::now()))
            .await
            .map_err(|e| lost_race(e, Mutation::Edit.name()))?;

        info!(claim_id = %id, "Claim updated");
        Ok(updated)
    }

    /// Removes a draft claim owned by the actor
    #[instrument(skip(self), fields(actor = %actor.id))]
    pub async fn delete_claim(&self, actor: &Actor, id: ClaimId) -> Result<(), ClaimError> {
        let claim = self.fetch(id).await?;
        self.authorize(Mutation::Delete, &claim, actor)?;

        self.bounded("delete", self.store.delete(id))
            .await
            .map_err(|e| lost_race(e, Mutation::Delete.name()))?;

        info!(claim_id = %id, "Claim deleted");
        Ok(())
    }

    /// Owner hands a draft in for verification
    pub async fn submit_claim(&self, actor: &Actor, id: ClaimId) -> Result<Claim, ClaimError> {
        self.transition(actor, id, Transition::Submit).await
    }

    /// Verifier marks a submitted claim as reviewed
    pub async fn review_claim(
        &self,
        actor: &Actor,
        id: ClaimId,
        note: Option<String>,
    ) -> Result<Claim, ClaimError> {
        self.transition(actor, id, Transition::Review { note }).await
    }

    /// Approver accepts a reviewed claim
    pub async fn approve_claim(&self, actor: &Actor, id: ClaimId) -> Result<Claim, ClaimError> {
        self.transition(actor, id, Transition::Approve).await
    }

    /// Approver turns down a reviewed claim
    pub async fn reject_claim(
        &self,
        actor: &Actor,
        id: ClaimId,
        reason: Option<String>,
    ) -> Result<Claim, ClaimError> {
        self.transition(actor, id, Transition::Reject { reason }).await
    }

    /// Reports the health of the underlying store
    pub async fn health(&self) -> HealthCheckResult {
        self.store.health_check().await
    }

    #[instrument(skip(self, transition), fields(actor = %actor.id, role = %actor.role, transition = transition.name()))]
    async fn transition(
        &self,
        actor: &Actor,
        id: ClaimId,
        transition: Transition,
    ) -> Result<Claim, ClaimError> {
        let name = transition.name();
        let claim = self.fetch(id).await?;

        let decision = lifecycle::decide(claim.status, actor, claim.owner_id, transition, Utc::now())
            .inspect_err(|_| {
                warn!(claim_id = %id, status = %claim.status, "Transition refused");
            })?;

        let updated = self
            .bounded(
                "apply_transition",
                self.store.apply_transition(id, decision.from, &decision.entry),
            )
            .await
            .map_err(|e| lost_race(e, name))?;

        info!(claim_id = %id, from = %decision.from, to = %decision.to(), "Claim status changed");
        Ok(updated)
    }

    fn authorize(&self, mutation: Mutation, claim: &Claim, actor: &Actor) -> Result<(), ClaimError> {
        lifecycle::authorize_mutation(mutation, claim.status, actor, claim.owner_id).inspect_err(|_| {
            warn!(claim_id = %claim.id, status = %claim.status, mutation = mutation.name(), "Mutation refused");
        })
    }

    async fn fetch(&self, id: ClaimId) -> Result<Claim, ClaimError> {
        Ok(self.bounded("get", self.store.get(id)).await?)
    }

    /// Runs a store call under the store timeout, failing closed on expiry
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, PortError>>,
    ) -> Result<T, PortError> {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout_ms = self.store_timeout.as_millis() as u64, "Store call timed out");
                Err(PortError::Timeout {
                    operation: operation.to_string(),
                    duration_ms: self.store_timeout.as_millis() as u64,
                })
            }
        }
    }
}

/// Maps a failed conditional write to the refused operation
fn lost_race(error: PortError, operation: &'static str) -> ClaimError {
    match error {
        PortError::PreconditionFailed { message } => {
            warn!(operation, %message, "Conditional write lost to a concurrent change");
            ClaimError::invalid_transition(operation)
        }
        other => other.into(),
    }
}
