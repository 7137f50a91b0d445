// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Every variant here is an *expected* failure: the auth gate converts it
//! into a structured `{"code", "detail"}` response tagged `[JWT_AUTH_ERROR]`.
//! Anything outside this taxonomy is a programming error and is allowed to
//! propagate.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::response::{error_msg, http_response};

/// Category tag appended to every auth failure detail for operational grep.
pub const AUTH_ERROR_TAG: &str = "JWT_AUTH_ERROR";

/// Authentication failure taxonomy.
#[derive(Debug)]
pub enum AuthError {
    /// No `Authorization` header present.
    MissingHeader,
    /// `Authorization` header present but not a valid `Bearer <token>` pair.
    /// Carries the specific description the deployed API returns.
    MalformedHeader(&'static str),
    /// Token signature did not verify (or the token is otherwise unusable).
    InvalidSignature,
    /// Token expiry claim has passed.
    Expired,
    /// Audience or issuer did not match the configured values.
    InvalidClaims,
    /// The remote key set could not be fetched.
    KeySetUnavailable(String),
    /// The remote key set body was not valid JSON.
    KeySetUnparsable(String),
    /// No key in the fetched set matches the token's `kid`.
    KeyNotFound,
    /// Token verified but its subject has no user record.
    UserNotFound,
    /// Token verified but the user record is disabled.
    InactiveUser,
    /// Verifier misconfiguration or other unexpected failure.
    Unexpected(String),
}

impl AuthError {
    /// Machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "authorization_header_missing",
            AuthError::MalformedHeader(_) => "invalid_header",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Expired => "token_expired",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::KeySetUnavailable(_) => "jwks_unavailable",
            AuthError::KeySetUnparsable(_) => "jwks_unparsable",
            AuthError::KeyNotFound => "no_matching_key",
            AuthError::UserNotFound => "user_not_found",
            AuthError::InactiveUser => "inactive_user",
            AuthError::Unexpected(_) => "unexpected_error",
        }
    }

    /// HTTP status carried by the converted response.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader
            | AuthError::MalformedHeader(_)
            | AuthError::InvalidSignature
            | AuthError::Expired
            | AuthError::InvalidClaims
            | AuthError::KeySetUnavailable(_)
            | AuthError::KeySetUnparsable(_)
            | AuthError::KeyNotFound
            | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
            AuthError::InactiveUser => StatusCode::BAD_REQUEST,
            AuthError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingHeader => write!(f, "Authorization header is expected"),
            AuthError::MalformedHeader(description) => write!(f, "{description}"),
            AuthError::InvalidSignature => write!(f, "Could not validate credentials"),
            AuthError::Expired => write!(f, "token is expired"),
            AuthError::InvalidClaims => {
                write!(f, "incorrect claims, please check the audience and issuer")
            }
            AuthError::KeySetUnavailable(msg) => write!(f, "Unable to fetch JWKS ({msg})"),
            AuthError::KeySetUnparsable(msg) => write!(f, "Unable to parse JWKS ({msg})"),
            AuthError::KeyNotFound => write!(f, "Unable to find appropriate key"),
            AuthError::UserNotFound => write!(f, "Could not validate credentials"),
            AuthError::InactiveUser => write!(f, "Inactive user"),
            AuthError::Unexpected(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        http_response(
            self.status_code(),
            json!(error_msg(&self, AUTH_ERROR_TAG)),
            None,
        )
    }
}
