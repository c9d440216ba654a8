//! Identity Domain Ports
//!
//! The `UserStore` port is the persistence contract for user accounts.
//!
//! - **PostgreSQL Adapter**: `infra_db::adapters::PostgresUserStore`
//! - **In-memory Adapter**: [`memory::InMemoryUserStore`]

use async_trait::async_trait;

use core_kernel::{UserId, PortError, DomainPort, HealthCheckable};

use crate::user::User;

/// Persistence contract for user accounts
#[async_trait]
pub trait UserStore: DomainPort + HealthCheckable {
    /// Looks up an account by its unique username
    ///
    /// # Errors
    ///
    /// `PortError::NotFound` if no account has this username
    async fn find_by_username(&self, username: &str) -> Result<User, PortError>;

    /// Looks up an account by id
    ///
    /// # Errors
    ///
    /// `PortError::NotFound` if no account has this id
    async fn find_by_id(&self, id: UserId) -> Result<User, PortError>;

    /// Inserts a new account
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` if the id or username is taken
    async fn create(&self, user: &User) -> Result<(), PortError>;
}

/// In-memory implementation of UserStore
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use core_kernel::HealthCheckResult;

    /// In-memory UserStore
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryUserStore {
        users: Arc<RwLock<HashMap<UserId, User>>>,
    }

    impl InMemoryUserStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with users for testing
        pub async fn with_users(users: Vec<User>) -> Self {
            let store = Self::new();
            {
                let mut map = store.users.write().await;
                for user in users {
                    map.insert(user.id, user);
                }
            }
            store
        }
    }

    impl DomainPort for InMemoryUserStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryUserStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("in-memory-user-store")
        }
    }

    #[async_trait]
    impl UserStore for InMemoryUserStore {
        async fn find_by_username(&self, username: &str) -> Result<User, PortError> {
            self.users
                .read()
                .await
                .values()
                .find(|u| u.username == username)
                .cloned()
                .ok_or_else(|| PortError::not_found("User", username))
        }

        async fn find_by_id(&self, id: UserId) -> Result<User, PortError> {
            self.users
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("User", id))
        }

        async fn create(&self, user: &User) -> Result<(), PortError> {
            let mut users = self.users.write().await;
            if users.contains_key(&user.id) {
                return Err(PortError::conflict(format!("user {} already exists", user.id)));
            }
            if users.values().any(|u| u.username == user.username) {
                return Err(PortError::conflict(format!("username {} is taken", user.username)));
            }
            users.insert(user.id, user.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::memory::InMemoryUserStore;
    use core_kernel::Role;

    #[tokio::test]
    async fn test_find_by_username_and_id() {
        let user = User::new("alice", "h", Role::User).unwrap();
        let store = InMemoryUserStore::with_users(vec![user.clone()]).await;

        assert_eq!(store.find_by_username("alice").await.unwrap(), user);
        assert_eq!(store.find_by_id(user.id).await.unwrap(), user);
        assert!(store.find_by_username("bob").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = InMemoryUserStore::new();
        store.create(&User::new("alice", "h", Role::User).unwrap()).await.unwrap();

        let err = store
            .create(&User::new("alice", "h2", Role::Approver).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Conflict { .. }));
    }
}
