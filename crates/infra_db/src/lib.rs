//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence for the claims workflow using
//! SQLx: connection pooling, embedded migrations, repositories over the raw
//! tables, and the adapters that implement the domain store ports.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. Repositories speak in row types;
//! adapters translate rows to domain types and `DatabaseError` to `PortError`.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresClaimStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/claims")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresClaimStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabaseConfig, create_pool, run_migrations};
pub use error::DatabaseError;
pub use adapters::{PostgresClaimStore, PostgresUserStore};
