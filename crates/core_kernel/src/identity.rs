//! The authenticated actor
//!
//! An `Actor` is produced by the authentication layer (token validation) and
//! trusted by everything below it. The domain never sees tokens, only this pair.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::identifiers::UserId;

/// Role carried by a user account and by every authenticated request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Policyholder filing claims
    User,
    /// Checks submitted claims
    Verifier,
    /// Makes the final decision on reviewed claims
    Approver,
}

impl Role {
    /// All roles, in privilege order
    pub const ALL: [Role; 3] = [Role::User, Role::Verifier, Role::Approver];

    /// Returns the wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Verifier => "verifier",
            Role::Approver => "approver",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "verifier" => Ok(Role::Verifier),
            "approver" => Ok(Role::Approver),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }
}

/// Identity of whoever is performing a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Shorthand for a policyholder actor
    pub fn user(id: UserId) -> Self {
        Self::new(id, Role::User)
    }

    /// Shorthand for a verifier actor
    pub fn verifier(id: UserId) -> Self {
        Self::new(id, Role::Verifier)
    }

    /// Shorthand for an approver actor
    pub fn approver(id: UserId) -> Self {
        Self::new(id, Role::Approver)
    }

    pub fn is(&self, user_id: UserId) -> bool {
        self.id == user_id
    }
}
