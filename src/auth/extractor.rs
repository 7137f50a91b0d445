// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer-token extraction from request headers.
//!
//! No decoding happens here; the extractor only validates the header
//! shape and hands the raw compact token to the verifier.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::error::AuthError;

/// Pull the bearer token out of the `Authorization` header.
///
/// The header must be exactly two whitespace-separated parts with a
/// case-insensitive `Bearer` scheme. The descriptions mirror the
/// deployed API's responses for each malformed shape.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader("Authorization header must start with Bearer"))?;

    let parts: Vec<&str> = auth.split_whitespace().collect();

    match parts.as_slice() {
        [scheme] if scheme.eq_ignore_ascii_case("bearer") => {
            Err(AuthError::MalformedHeader("Token not found"))
        }
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(
            AuthError::MalformedHeader("Authorization header must start with Bearer"),
        ),
        [] => Err(AuthError::MalformedHeader(
            "Authorization header must start with Bearer",
        )),
        _ => Err(AuthError::MalformedHeader(
            "Authorization header must be Bearer token",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_token_from_well_formed_header() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let headers = headers_with("bEaReR abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_distinct_error() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingHeader)
        ));
    }

    #[test]
    fn non_bearer_scheme_rejected() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MalformedHeader(
                "Authorization header must start with Bearer"
            ))
        ));
    }

    #[test]
    fn bare_scheme_rejected() {
        let headers = headers_with("Bearer");
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MalformedHeader("Token not found"))
        ));
    }

    #[test]
    fn extra_parts_rejected() {
        let headers = headers_with("Bearer abc def");
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MalformedHeader(
                "Authorization header must be Bearer token"
            ))
        ));
    }

    #[test]
    fn empty_value_rejected() {
        let headers = headers_with("");
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MalformedHeader(_))
        ));
    }
}
