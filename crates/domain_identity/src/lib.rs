//! Identity Domain
//!
//! This crate owns user accounts and the login use case. It produces the
//! [`core_kernel::Actor`] that every claim operation is performed as; the token
//! format that carries an actor between requests lives in the API layer.
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use core_kernel::Role;
//! use domain_identity::{InMemoryUserStore, LoginService, PasswordHasher, User};
//!
//! let hasher = PasswordHasher::with_cost(4);
//! let store = InMemoryUserStore::with_users(vec![
//!     User::new("alice", hasher.hash("s3cret").unwrap(), Role::User).unwrap(),
//! ])
//! .await;
//!
//! let login = LoginService::new(Arc::new(store), hasher);
//! let user = login.login("alice", "s3cret").await.unwrap();
//! assert_eq!(user.actor().role, Role::User);
//! ```

pub mod user;
pub mod password;
pub mod ports;
pub mod login;
pub mod error;

pub use user::{User, LoginRequest};
pub use password::PasswordHasher;
pub use ports::UserStore;
pub use ports::memory::InMemoryUserStore;
pub use login::LoginService;
pub use error::AuthError;
