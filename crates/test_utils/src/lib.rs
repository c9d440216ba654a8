//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims workflow test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built actors, accounts, and claim requests
//! - `builders`: `TestClaimBuilder` for claims in any lifecycle status
//! - `database`: throwaway PostgreSQL with the claims schema
//! - `assertions`: History and error assertion helpers
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
