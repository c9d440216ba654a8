//! PostgreSQL User Store Adapter

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{Role, UserId, PortError, DomainPort, HealthCheckable, HealthCheckResult};
use domain_identity::{User, UserStore};

use crate::repositories::users::{UsersRepository, UserRow, UserRole};

/// PostgreSQL-backed implementation of the UserStore port
#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    repository: UsersRepository,
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UsersRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresUserStore {}

#[async_trait]
impl HealthCheckable for PostgresUserStore {
    async fn health_check(&self) -> HealthCheckResult {
        super::probe(&self.pool, "postgres-user-store").await
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<User, PortError> {
        Ok(row_to_user(self.repository.find_by_username(username).await?))
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn find_by_id(&self, id: UserId) -> Result<User, PortError> {
        Ok(row_to_user(self.repository.get_by_id(id.into()).await?))
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &User) -> Result<(), PortError> {
        let row = UserRow {
            user_id: user.id.into(),
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            role: role_to_db(user.role),
            created_at: Utc::now(),
        };
        self.repository.insert(&row).await?;
        Ok(())
    }
}

fn row_to_user(row: UserRow) -> User {
    User {
        id: UserId::from(row.user_id),
        username: row.username,
        password_hash: row.password_hash,
        role: role_from_db(row.role),
    }
}

fn role_to_db(role: Role) -> UserRole {
    match role {
        Role::User => UserRole::User,
        Role::Verifier => UserRole::Verifier,
        Role::Approver => UserRole::Approver,
    }
}

fn role_from_db(role: UserRole) -> Role {
    match role {
        UserRole::User => Role::User,
        UserRole::Verifier => Role::Verifier,
        UserRole::Approver => Role::Approver,
    }
}
