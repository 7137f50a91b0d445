// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth0 JWKS verification.
//!
//! The key set is fetched from the tenant's well-known endpoint on every
//! request. Deployed clients depend on picking up key rotation
//! immediately, so there is deliberately no cross-request cache; the
//! fetch is bounded by an explicit timeout instead.

use std::time::Duration;

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use tracing::debug;

use super::error::AuthError;
use crate::config::AppConfig;

/// Upper bound on the key-set fetch.
const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote token verifier bound to one Auth0 tenant.
#[derive(Debug, Clone)]
pub struct JwksVerifier {
    http: reqwest::Client,
    jwks_url: String,
    issuer: String,
    audience: String,
    algorithms: Vec<Algorithm>,
}

impl JwksVerifier {
    /// Build a verifier from configuration.
    ///
    /// Returns `None` unless both `AUTH0_DOMAIN` and `AUTH0_API_AUDIENCE`
    /// are configured; unparsable entries in `AUTH0_ALGORITHMS` are
    /// skipped with a fallback to RS256.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        let jwks_url = config.auth0_jwks_url()?;
        let issuer = config.auth0_issuer()?;
        let audience = config.auth0_api_audience.clone()?;

        let mut algorithms: Vec<Algorithm> = config
            .auth0_algorithms
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect();
        if algorithms.is_empty() {
            algorithms.push(Algorithm::RS256);
        }

        Some(Self {
            http: reqwest::Client::builder()
                .timeout(JWKS_FETCH_TIMEOUT)
                .build()
                .expect("Failed to create JWKS HTTP client"),
            jwks_url,
            issuer,
            audience,
            algorithms,
        })
    }

    /// Verify an Auth0-issued token and return its full claim set.
    pub async fn verify(&self, token: &str) -> Result<Map<String, Value>, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::InvalidSignature)?;
        // A token without a kid cannot be matched against the key set.
        let kid = header.kid.ok_or(AuthError::KeyNotFound)?;
        debug!(kid = %kid, "verifying token against tenant JWKS");

        let key_set = self.fetch_key_set().await?;
        let decoding_key = decoding_key_for(&key_set, &kid)?;

        let mut validation = Validation::new(self.algorithms[0]);
        validation.algorithms = self.algorithms.clone();
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let token_data = decode::<Map<String, Value>>(token, &decoding_key, &validation)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidAudience
                | jsonwebtoken::errors::ErrorKind::InvalidIssuer => AuthError::InvalidClaims,
                _ => AuthError::InvalidSignature,
            })?;

        Ok(token_data.claims)
    }

    /// Fetch the tenant's key set. Request-scoped: no caching.
    async fn fetch_key_set(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|err| AuthError::KeySetUnavailable(err.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeySetUnavailable(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| AuthError::KeySetUnavailable(err.to_string()))?;

        serde_json::from_str(&body).map_err(|err| AuthError::KeySetUnparsable(err.to_string()))
    }
}

/// Linear-scan the key set for the token's `kid`.
fn decoding_key_for(key_set: &JwkSet, kid: &str) -> Result<DecodingKey, AuthError> {
    let jwk = key_set
        .keys
        .iter()
        .find(|key| key.common.key_id.as_deref() == Some(kid))
        .ok_or(AuthError::KeyNotFound)?;

    DecodingKey::from_jwk(jwk)
        .map_err(|err| AuthError::Unexpected(format!("unusable key in JWKS: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_key_set() -> JwkSet {
        // n/e are placeholders; key material is only touched after a kid match.
        serde_json::from_str(
            r#"{
                "keys": [{
                    "kty": "RSA",
                    "kid": "key-2026-01",
                    "use": "sig",
                    "alg": "RS256",
                    "n": "q2Fd0",
                    "e": "AQAB"
                }]
            }"#,
        )
        .unwrap()
    }

    fn test_config() -> AppConfig {
        AppConfig {
            auth0_domain: Some("fixture.auth0.com".to_string()),
            auth0_api_audience: Some("test_api_audience".to_string()),
            ..AppConfig::default()
        }
    }

    #[test]
    fn from_config_requires_domain_and_audience() {
        assert!(JwksVerifier::from_config(&AppConfig::default()).is_none());

        let verifier = JwksVerifier::from_config(&test_config()).unwrap();
        assert_eq!(
            verifier.jwks_url,
            "https://fixture.auth0.com/.well-known/jwks.json"
        );
        assert_eq!(verifier.issuer, "https://fixture.auth0.com/");
        assert_eq!(verifier.algorithms, vec![Algorithm::RS256]);
    }

    #[test]
    fn unknown_kid_fails_with_key_not_found() {
        let key_set = sample_key_set();
        assert!(matches!(
            decoding_key_for(&key_set, "other-kid"),
            Err(AuthError::KeyNotFound)
        ));
    }

    #[tokio::test]
    async fn token_without_kid_fails_with_key_not_found() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(br#"{"sub":"auth0|abc"}"#);
        let token = format!("{header}.{claims}.sig");

        let verifier = JwksVerifier::from_config(&test_config()).unwrap();
        assert!(matches!(
            verifier.verify(&token).await,
            Err(AuthError::KeyNotFound)
        ));
    }

    #[tokio::test]
    async fn garbage_token_fails_before_any_fetch() {
        let verifier = JwksVerifier::from_config(&test_config()).unwrap();
        assert!(matches!(
            verifier.verify("not-a-jwt").await,
            Err(AuthError::InvalidSignature)
        ));
    }
}
