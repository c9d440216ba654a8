//! Comprehensive tests for domain_identity

use std::sync::Arc;

use core_kernel::Role;

use domain_identity::{AuthError, InMemoryUserStore, LoginRequest, LoginService, PasswordHasher, User, UserStore};

async fn login_service(users: &[(&str, &str, Role)]) -> LoginService {
    let hasher = PasswordHasher::with_cost(4);
    let accounts = users
        .iter()
        .map(|(name, password, role)| User::new(*name, hasher.hash(password).unwrap(), *role).unwrap())
        .collect();
    let store = InMemoryUserStore::with_users(accounts).await;
    LoginService::new(Arc::new(store), hasher)
}

// ============================================================================
// Login Tests
// ============================================================================

mod login_tests {
    use super::*;

    #[tokio::test]
    async fn test_valid_credentials() {
        let svc = login_service(&[("alice", "s3cret", Role::User), ("vera", "pw", Role::Verifier)]).await;

        let user = svc.login("vera", "pw").await.unwrap();

        assert_eq!(user.username, "vera");
        assert_eq!(user.role, Role::Verifier);
        assert_eq!(user.actor().id, user.id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let svc = login_service(&[("alice", "s3cret", Role::User)]).await;

        let wrong_password = svc.login("alice", "guess").await.unwrap_err();
        let unknown_user = svc.login("mallory", "s3cret").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_authenticate_validates_request() {
        let svc = login_service(&[("alice", "s3cret", Role::User)]).await;
        let request = LoginRequest {
            username: String::new(),
            password: "s3cret".to_string(),
        };

        let err = svc.authenticate(&request).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_corrupt_stored_hash_is_invalid_credentials() {
        let store = InMemoryUserStore::new();
        store.create(&User::new("bob", "plaintext", Role::User).unwrap()).await.unwrap();
        let svc = LoginService::new(Arc::new(store), PasswordHasher::with_cost(4));

        assert!(matches!(svc.login("bob", "plaintext").await, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_health_reports_store() {
        let svc = login_service(&[]).await;
        assert!(svc.health().await.is_healthy());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn test_only_the_exact_password_verifies(password in "[ -~]{1,20}", other in "[ -~]{1,20}") {
            let hasher = PasswordHasher::with_cost(4);
            let hash = hasher.hash(&password).unwrap();

            prop_assert!(hasher.verify(&password, &hash));
            prop_assert_eq!(hasher.verify(&other, &hash), other == password);
        }
    }
}
