//! Throwaway PostgreSQL for the claim and user store tests
//!
//! Each [`ClaimsTestDatabase`] owns its own container with the claims schema
//! applied, so tests that start one never see each other's rows.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

use core_kernel::ClaimId;

const SCHEMA: &str = include_str!("../../../migrations/20240101_000001_initial_schema.sql");
const DB_NAME: &str = "claims_test";
const DB_PASSWORD: &str = "claims";

pub type TestDbResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// A running PostgreSQL container holding the claims schema
pub struct ClaimsTestDatabase {
    _container: ContainerAsync<GenericImage>,
    pool: PgPool,
}

impl ClaimsTestDatabase {
    /// Starts the container and applies the schema
    pub async fn start() -> TestDbResult<Self> {
        let container = GenericImage::new("postgres", "16-alpine")
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr("database system is ready to accept connections"))
            .with_env_var("POSTGRES_PASSWORD", DB_PASSWORD)
            .with_env_var("POSTGRES_DB", DB_NAME)
            .start()
            .await?;

        let url = format!(
            "postgres://postgres:{}@{}:{}/{}",
            DB_PASSWORD,
            container.get_host().await?,
            container.get_host_port_ipv4(5432).await?,
            DB_NAME
        );
        // concurrent store tests hold several connections at once
        let pool = PgPoolOptions::new().max_connections(8).connect(&url).await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;

        Ok(Self {
            _container: container,
            pool,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Removes every claim, history row, and account
    pub async fn reset(&self) -> TestDbResult<()> {
        sqlx::query("TRUNCATE claims, users CASCADE")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Counts the history rows stored for a claim, bypassing the store
    pub async fn history_rows(&self, claim_id: ClaimId) -> TestDbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM claim_history WHERE claim_id = $1")
            .bind(*claim_id.as_uuid())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Reads the raw `claim_status` label of a claim, bypassing the store
    pub async fn stored_status(&self, claim_id: ClaimId) -> TestDbResult<Option<String>> {
        let status = sqlx::query_scalar("SELECT status::text FROM claims WHERE claim_id = $1")
            .bind(*claim_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        Ok(status)
    }
}

/// Starts a fresh claims database for a single test
pub async fn start_claims_database() -> TestDbResult<ClaimsTestDatabase> {
    ClaimsTestDatabase::start().await
}
