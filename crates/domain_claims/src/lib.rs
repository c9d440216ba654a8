//! Claims Workflow Domain
//!
//! This crate implements the claim lifecycle: the data model, the pure decision
//! engine that gates every status change, the persistence port, and the workflow
//! service that ties them together.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Draft -> Submitted -> Reviewed -> Approved/Rejected
//! ```
//!
//! Only the owner edits, deletes, or submits a draft. Verifiers review submitted
//! claims; approvers approve or reject reviewed ones. Every status change appends
//! exactly one entry to the claim's history.

pub mod claim;
pub mod lifecycle;
pub mod ports;
pub mod workflow;
pub mod error;

pub use claim::{Claim, ClaimStatus, ClaimHistoryEntry, NewClaim, ClaimUpdate};
pub use lifecycle::{Transition, Mutation, Decision, decide, authorize_mutation, can_read, visible_statuses};
pub use ports::ClaimStore;
pub use ports::memory::InMemoryClaimStore;
pub use workflow::{ClaimWorkflowService, DEFAULT_STORE_TIMEOUT};
pub use error::ClaimError;
