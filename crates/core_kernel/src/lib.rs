//! Core Kernel - Foundational types shared by every claims workflow crate
//!
//! This crate provides the building blocks the domain and adapter crates agree on:
//! - Strongly-typed identifiers for claims and users
//! - The authenticated actor (`Actor`) and its `Role`
//! - Pagination requests and result pages
//! - Port infrastructure (`PortError`, `DomainPort`, health checks)

pub mod identifiers;
pub mod identity;
pub mod pagination;
pub mod ports;
pub mod error;

pub use identifiers::{ClaimId, UserId};
pub use identity::{Actor, Role};
pub use pagination::{Page, PageRequest, MAX_PAGE_LIMIT};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
