//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the claims workflow. These fixtures are
//! consistent and predictable for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{Actor, Role, UserId};
use domain_claims::NewClaim;
use domain_identity::{PasswordHasher, User};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// bcrypt cost used for every fixture hash; the minimum bcrypt accepts
pub const TEST_BCRYPT_COST: u32 = 4;

/// Password shared by every fixture account
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Fixture for authenticated actors
pub struct ActorFixtures;

impl ActorFixtures {
    /// A policyholder with a fresh id
    pub fn owner() -> Actor {
        Actor::user(UserId::new_v7())
    }

    /// A second policyholder, unrelated to any owner
    pub fn stranger() -> Actor {
        Actor::user(UserId::new_v7())
    }

    pub fn verifier() -> Actor {
        Actor::verifier(UserId::new_v7())
    }

    pub fn approver() -> Actor {
        Actor::approver(UserId::new_v7())
    }

    /// One actor of every role
    pub fn all_roles() -> Vec<Actor> {
        Role::ALL.into_iter().map(|role| Actor::new(UserId::new_v7(), role)).collect()
    }
}

/// Fixture for claim request data
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// Standard policy number
    pub fn policy_number() -> &'static str {
        "P-1"
    }

    /// Standard claimed amount
    pub fn amount() -> Decimal {
        dec!(500.0)
    }

    /// The canonical flood claim
    pub fn flood() -> NewClaim {
        NewClaim {
            policy_number: Self::policy_number().to_string(),
            claim_amount: Self::amount(),
            description: "flood".to_string(),
            documents: vec![],
        }
    }

    /// A claim with supporting documents attached
    pub fn with_documents() -> NewClaim {
        NewClaim {
            policy_number: "POL-2024-0042".to_string(),
            claim_amount: dec!(12500.75),
            description: "Kitchen fire".to_string(),
            documents: vec!["doc-fire-report".to_string(), "doc-photos".to_string()],
        }
    }
}

/// Fixture for user accounts
pub struct UserFixtures;

impl UserFixtures {
    /// An account with `role`, hashed with [`TEST_PASSWORD`]
    pub fn account(username: &str, role: Role) -> User {
        let hash = PasswordHasher::with_cost(TEST_BCRYPT_COST)
            .hash(TEST_PASSWORD)
            .expect("bcrypt hash of fixture password");
        User::new(username, hash, role).expect("fixture username is not blank")
    }

    /// One account per role: `alice` (user), `vera` (verifier), `adam` (approver)
    pub fn standard_accounts() -> Vec<User> {
        vec![
            Self::account("alice", Role::User),
            Self::account("vera", Role::Verifier),
            Self::account("adam", Role::Approver),
        ]
    }
}

/// Fixture for timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A fixed instant (Jan 1, 2024 09:00 UTC)
    pub fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    /// `epoch` shifted by `seconds`
    pub fn at(seconds: i64) -> DateTime<Utc> {
        Self::epoch() + chrono::Duration::seconds(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flood_is_valid() {
        assert!(ClaimFixtures::flood().validate().is_ok());
        assert!(ClaimFixtures::with_documents().validate().is_ok());
    }

    #[test]
    fn test_all_roles() {
        let roles: Vec<Role> = ActorFixtures::all_roles().iter().map(|a| a.role).collect();
        assert_eq!(roles, Role::ALL.to_vec());
    }

    #[test]
    fn test_fixture_password_verifies() {
        let user = UserFixtures::account("alice", Role::User);
        assert!(PasswordHasher::with_cost(TEST_BCRYPT_COST).verify(TEST_PASSWORD, &user.password_hash));
    }
}
