// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local-secret JWT issuance and verification.
//!
//! Tokens are minted by the `/token` credential exchange and verified by
//! the auth gate against the process-wide `SECRET_KEY` / `ALGORITHM`
//! pair. The library's errors are always wrapped into [`AuthError`];
//! nothing from `jsonwebtoken` leaks past this module.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::error::AuthError;

/// Fallback lifetime when no configured expiry is given.
const DEFAULT_EXPIRE_MINUTES: f64 = 15.0;

/// Claim set carried by locally-issued tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalClaims {
    /// Subject: the username the token was issued to.
    pub sub: String,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
}

fn parse_algorithm(name: &str) -> Result<Algorithm, AuthError> {
    name.parse::<Algorithm>()
        .map_err(|_| AuthError::Unexpected(format!("unsupported signing algorithm: {name}")))
}

/// Mint an access token for `sub`.
///
/// `expires_minutes` comes from `ACCESS_TOKEN_EXPIRE_MINUTES`; callers
/// passing `None` get the 15-minute fallback.
pub fn create_access_token(
    sub: &str,
    secret: &str,
    algorithm: &str,
    expires_minutes: Option<f64>,
) -> Result<String, AuthError> {
    let algorithm = parse_algorithm(algorithm)?;
    let minutes = expires_minutes.unwrap_or(DEFAULT_EXPIRE_MINUTES);
    let exp = Utc::now().timestamp() + (minutes * 60.0) as i64;

    let claims = LocalClaims {
        sub: sub.to_string(),
        exp,
    };

    encode(
        &Header::new(algorithm),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| AuthError::Unexpected(format!("failed to encode token: {err}")))
}

/// Verify a locally-issued token and return its claims.
///
/// Expiry failures surface as [`AuthError::Expired`]; every other
/// verification failure collapses to [`AuthError::InvalidSignature`].
pub fn verify_access_token(
    token: &str,
    secret: &str,
    algorithm: &str,
) -> Result<LocalClaims, AuthError> {
    let algorithm = parse_algorithm(algorithm)?;
    let mut validation = Validation::new(algorithm);
    validation.validate_aud = false;

    let token_data = decode::<LocalClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|err| match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::InvalidSignature,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_jwt_secret_key_fixture";

    #[test]
    fn round_trip_preserves_subject() {
        let token = create_access_token("alice", SECRET, "HS256", Some(15.0)).unwrap();
        let claims = verify_access_token(&token, SECRET, "HS256").unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn expired_token_fails_with_expired() {
        // Minted with an expiry beyond the default 60s leeway.
        let token = create_access_token("alice", SECRET, "HS256", Some(-5.0)).unwrap();
        assert!(matches!(
            verify_access_token(&token, SECRET, "HS256"),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn wrong_secret_fails_with_invalid_signature() {
        let token = create_access_token("alice", SECRET, "HS256", Some(15.0)).unwrap();
        assert!(matches!(
            verify_access_token(&token, "other_secret", "HS256"),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn garbage_token_fails_with_invalid_signature() {
        assert!(matches!(
            verify_access_token("not.a.jwt", SECRET, "HS256"),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn unknown_algorithm_is_unexpected_error() {
        assert!(matches!(
            create_access_token("alice", SECRET, "HS1024", Some(15.0)),
            Err(AuthError::Unexpected(_))
        ));
    }
}
