// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified principal attached to authenticated requests.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::users::StoredUser;

/// Which verifier produced the principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalSource {
    /// Local-secret JWT, subject resolved through the user store.
    Local,
    /// Auth0-issued JWT, claims taken verbatim.
    Remote,
}

/// The authenticated identity injected into request extensions by the
/// auth gate. Downstream handlers read it; nothing mutates it.
///
/// `claims` always carries the full verified claim set: for the local
/// path the token claims plus the resolved user record, for the remote
/// path the Auth0 token payload as-is.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    /// Canonical subject (username for local tokens, `sub` for Auth0).
    pub subject: String,
    /// Verifier that produced this principal.
    pub source: PrincipalSource,
    /// Full verified claim set.
    pub claims: Map<String, Value>,
}

impl Principal {
    /// Principal for a locally-verified token and its resolved user.
    /// The credential hash stays in the store; only profile fields are
    /// exposed to handlers.
    pub fn local(user: &StoredUser, exp: i64) -> Self {
        let mut claims = Map::new();
        claims.insert("sub".to_string(), Value::String(user.username.clone()));
        claims.insert("exp".to_string(), Value::from(exp));
        claims.insert(
            "user".to_string(),
            serde_json::json!({
                "username": user.username,
                "email": user.email,
                "full_name": user.full_name,
                "disabled": user.disabled,
            }),
        );

        Self {
            subject: user.username.clone(),
            source: PrincipalSource::Local,
            claims,
        }
    }

    /// Principal for a remotely-verified token; the claim set is the
    /// token payload itself.
    pub fn remote(claims: Map<String, Value>) -> Self {
        let subject = claims
            .get("sub")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Self {
            subject,
            source: PrincipalSource::Remote,
            claims,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn local_principal_carries_user_record() {
        let user = StoredUser {
            username: "alice".to_string(),
            email: Some("alice@example.com".to_string()),
            full_name: None,
            disabled: false,
            hashed_password: "$2b$04$x".to_string(),
        };

        let principal = Principal::local(&user, 1_700_000_000);
        assert_eq!(principal.subject, "alice");
        assert_eq!(principal.source, PrincipalSource::Local);
        assert_eq!(principal.claims["sub"], "alice");
        assert_eq!(principal.claims["user"]["email"], "alice@example.com");
        assert!(principal.claims["user"].get("hashed_password").is_none());
    }

    #[test]
    fn remote_principal_takes_subject_from_claims() {
        let claims = json!({
            "sub": "auth0|abc123",
            "iss": "https://tenant.us.auth0.com/",
            "permissions": ["read:rates"]
        });
        let Value::Object(claims) = claims else {
            unreachable!()
        };

        let principal = Principal::remote(claims);
        assert_eq!(principal.subject, "auth0|abc123");
        assert_eq!(principal.source, PrincipalSource::Remote);
        assert_eq!(principal.claims["permissions"][0], "read:rates");
    }

    #[test]
    fn remote_principal_without_sub_gets_empty_subject() {
        let principal = Principal::remote(Map::new());
        assert_eq!(principal.subject, "");
    }
}
