//! Token issuance and verification
//!
//! Tokens are HS256 JWTs carrying the actor's id and role. The claim engine
//! trusts whatever `Actor` comes out of [`validate_token`]; role checks happen
//! there, not here.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use core_kernel::{Actor, Role, UserId};

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// User's role
    pub role: Role,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl TokenClaims {
    pub fn actor(&self) -> Actor {
        Actor::new(UserId::from_uuid(self.sub), self.role)
    }
}

/// Token errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Creates a new JWT token
///
/// # Arguments
///
/// * `actor` - Authenticated actor the token speaks for
/// * `secret` - JWT secret key
/// * `expiration_secs` - Token validity in seconds
pub fn create_token(actor: &Actor, secret: &str, expiration_secs: u64) -> Result<String, TokenError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = TokenClaims {
        sub: *actor.id.as_uuid(),
        role: actor.role,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Validates a JWT token and returns the actor it asserts
///
/// # Arguments
///
/// * `token` - The JWT token to validate
/// * `secret` - JWT secret key
pub fn validate_token(token: &str, secret: &str) -> Result<Actor, TokenError> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        _ => TokenError::InvalidToken,
    })?;

    Ok(token_data.claims.actor())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_carries_actor() {
        let actor = Actor::verifier(UserId::new());
        let token = create_token(&actor, SECRET, 60).unwrap();

        assert_eq!(validate_token(&token, SECRET).unwrap(), actor);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = create_token(&Actor::user(UserId::new()), SECRET, 60).unwrap();

        let err = validate_token(&token, "other-secret").unwrap_err();
        assert!(matches!(err, TokenError::InvalidToken));
    }

    #[test]
    fn test_expired_token_is_refused() {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: Uuid::new_v4(),
            role: Role::Approver,
            exp: now - 3_600,
            iat: now - 7_200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = validate_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, TokenError::TokenExpired));
    }

    #[test]
    fn test_unknown_role_is_invalid() {
        let now = Utc::now().timestamp();
        let body = serde_json::json!({
            "sub": Uuid::new_v4(),
            "role": "admin",
            "exp": now + 60,
            "iat": now,
        });
        let token = encode(&Header::default(), &body, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap();

        assert!(matches!(validate_token(&token, SECRET), Err(TokenError::InvalidToken)));
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert!(matches!(validate_token("not.a.jwt", SECRET), Err(TokenError::InvalidToken)));
    }
}
