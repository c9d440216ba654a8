//! Password hashing
//!
//! Hashes are bcrypt so that accounts created by earlier deployments keep working.

use tokio::task;

use crate::error::AuthError;

/// bcrypt hasher with a configurable work factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self { cost: bcrypt::DEFAULT_COST }
    }

    /// Lower costs are only meant for tests
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// Checks `password` against a stored hash
    ///
    /// A malformed stored hash counts as a mismatch.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    /// Runs [`verify`](Self::verify) on the blocking pool
    pub async fn verify_blocking(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let hasher = *self;
        task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::with_cost(4);
        let hash = hasher.hash("correct horse").unwrap();

        assert!(hash.starts_with("$2"));
        assert!(hasher.verify("correct horse", &hash));
        assert!(!hasher.verify("battery staple", &hash));
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        assert!(!PasswordHasher::with_cost(4).verify("pw", "not-a-bcrypt-hash"));
    }

    #[tokio::test]
    async fn test_verify_blocking() {
        let hasher = PasswordHasher::with_cost(4);
        let hash = hasher.hash("pw").unwrap();
        assert!(hasher.verify_blocking("pw".to_string(), hash).await.unwrap());
    }
}
