//! Repository implementations for domain entities
//!
//! Repositories encapsulate SQL queries and map between database rows and
//! plain column types. They know nothing about domain types; the adapters in
//! [`crate::adapters`] do that translation.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Runtime-checked queries, so the crate builds without a live database
//! - Transaction support for multi-table writes
//! - Guarded `UPDATE ... WHERE status = $expected` for state-dependent writes

pub mod claims;
pub mod users;

pub use claims::ClaimsRepository;
pub use users::UsersRepository;
