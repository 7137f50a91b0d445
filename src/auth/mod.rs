// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! JWT authentication for the Mediabros APIs gateway.
//!
//! ## Auth Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. The gate ([`middleware::require_auth`]) resolves the configured
//!    [`AuthMode`](crate::config::AuthMode) and dispatches:
//!    - **Local**: verify against `SECRET_KEY`, resolve the subject in
//!      the user store
//!    - **Remote**: fetch the Auth0 tenant JWKS, match the token `kid`,
//!      verify signature/audience/issuer
//!    - **Disabled**: pass through (open access)
//! 3. On success the full claim set is attached to the request as a
//!    [`Principal`]; on failure the request short-circuits with a
//!    `{"code", "detail"}` response tagged `[JWT_AUTH_ERROR]`.
//!
//! ## Security
//!
//! - The JWKS fetch is HTTPS-only and bounded by a 10-second timeout
//! - Key sets are fetched per request, never cached across requests
//! - The local/remote priority order is fixed: `JWT_ENABLED` wins

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod middleware;
pub mod token;

pub use claims::{Principal, PrincipalSource};
pub use error::AuthError;
pub use jwks::JwksVerifier;
pub use middleware::require_auth;
