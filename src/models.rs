// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures shared across the HTTP surface. All
//! types derive `Serialize`/`Deserialize` and `ToSchema` for automatic
//! JSON handling and OpenAPI documentation.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Successful `/token` credential exchange.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TokenResponse {
    /// Signed JWT access token.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Query parameters for `/pget`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PasswordHashQuery {
    /// Plaintext password to hash.
    pub p: String,
}

/// Response body for `/pget`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PasswordHashResponse {
    /// Hash in the store's credential format.
    pub password_hashed: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_constructor_sets_token_type() {
        let response = TokenResponse::bearer("abc.def.ghi".to_string());
        assert_eq!(response.token_type, "bearer");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"access_token": "abc.def.ghi", "token_type": "bearer"})
        );
    }
}
