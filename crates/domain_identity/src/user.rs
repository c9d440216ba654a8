//! User accounts

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use core_kernel::{Actor, Role, UserId};
use crate::error::AuthError;

/// A user account
///
/// The password hash never leaves the identity layer in serialized form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

impl User {
    /// Creates a new account with a fresh id
    ///
    /// # Errors
    ///
    /// `AuthError::InvalidInput` if the username is blank
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Result<Self, AuthError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(AuthError::InvalidInput("username must not be blank".to_string()));
        }
        Ok(Self {
            id: UserId::new_v7(),
            username,
            password_hash: password_hash.into(),
            role,
        })
    }

    /// The identity this user acts as once logged in
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Credentials presented at login
#[derive(Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(length(min = 1, max = 72))]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
