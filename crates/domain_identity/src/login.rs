//! Login use case

use std::sync::Arc;

use tracing::{info, instrument, warn};
use validator::Validate;

use core_kernel::{PortError, HealthCheckResult};

use crate::error::AuthError;
use crate::password::PasswordHasher;
use crate::ports::UserStore;
use crate::user::{LoginRequest, User};

/// Checks credentials against the user store
#[derive(Clone)]
pub struct LoginService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl LoginService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    /// Returns the account matching `username` and `password`
    ///
    /// # Errors
    ///
    /// `AuthError::InvalidCredentials` for an unknown username or a wrong
    /// password, without saying which
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = match self.users.find_by_username(username).await {
            Ok(user) => user,
            Err(PortError::NotFound { .. }) => {
                warn!("Login failed: unknown user");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        let matches = self
            .hasher
            .verify_blocking(password.to_string(), user.password_hash.clone())
            .await?;
        if !matches {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(user)
    }

    /// Validates a login request, then authenticates it
    pub async fn authenticate(&self, request: &LoginRequest) -> Result<User, AuthError> {
        request.validate()?;
        self.login(&request.username, &request.password).await
    }

    /// Reports the health of the underlying user store
    pub async fn health(&self) -> HealthCheckResult {
        self.users.health_check().await
    }
}
