//! Bearer-token mint/verify for the mobile client session.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token encoding failed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
    #[error("invalid or expired token")]
    Invalid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: Uuid,
    /// Expiry, seconds since epoch.
    pub exp: i64,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
}

/// Mint an HS256 token for `user_id`, valid for `ttl_hours`.
pub fn mint_token(secret: &str, user_id: Uuid, ttl_hours: i64) -> Result<String, JwtError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(JwtError::Encode)
}

/// Verify a bearer token and return the user id it was minted for.
pub fn verify_token(secret: &str, token: &str) -> Result<Uuid, JwtError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims.sub)
    .map_err(|_| JwtError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_and_verify_round_trip() {
        let user_id = Uuid::new_v4();
        let token = mint_token("secret", user_id, 24).unwrap();
        assert_eq!(verify_token("secret", &token).unwrap(), user_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = mint_token("secret", Uuid::new_v4(), 24).unwrap();
        assert!(matches!(
            verify_token("other", &token),
            Err(JwtError::Invalid)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = mint_token("secret", Uuid::new_v4(), -1).unwrap();
        assert!(matches!(
            verify_token("secret", &token),
            Err(JwtError::Invalid)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            verify_token("secret", "not-a-token"),
            Err(JwtError::Invalid)
        ));
    }
}
