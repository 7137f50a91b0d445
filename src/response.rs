// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wire-level response formatting.
//!
//! Two formatting paths, both inherited from the deployed API contract:
//!
//! - [`http_response`] builds `{"code": <status>, "detail": <detail>}`
//!   envelopes with the status carried in the transport code, so non-200
//!   outcomes never surface as transport faults.
//! - [`jsonify`] serializes an arbitrary JSON value, compact for XHR
//!   callers and 2-space pretty otherwise.

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

/// Body shape of every error/status envelope.
#[derive(Debug, Serialize)]
struct Envelope {
    code: u16,
    detail: Value,
}

/// Format an error with the fixed category tag used for operational grep:
/// `ERROR: <err> [<tag>]`.
pub fn error_msg(err: &dyn std::fmt::Display, tag: &str) -> String {
    format!("ERROR: {err} [{tag}]")
}

/// Build a JSON response with a `{"code", "detail"}` envelope.
///
/// `Content-Type: application/json` is defaulted when the caller did not
/// set one; any headers given are carried through verbatim.
pub fn http_response(
    status: StatusCode,
    detail: impl Into<Value>,
    headers: Option<HeaderMap>,
) -> Response {
    let envelope = Envelope {
        code: status.as_u16(),
        detail: detail.into(),
    };
    // Envelope serialization cannot fail for JSON values; fall back to a
    // bare object rather than panicking in the error path.
    let body = serde_json::to_string(&envelope)
        .unwrap_or_else(|_| format!(r#"{{"code":{}}}"#, status.as_u16()));

    let mut header_map = headers.unwrap_or_default();
    if !header_map.contains_key(header::CONTENT_TYPE) {
        header_map.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }

    (status, header_map, body).into_response()
}

/// True when the request headers mark an XMLHttpRequest caller.
pub fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
        .unwrap_or(false)
}

/// Serialize a JSON value as an `application/json` response.
///
/// XHR callers get compact output; everyone else gets 2-space pretty
/// printing, matching the deployed behavior browsers and bots rely on.
pub fn jsonify(value: &Value, request_headers: &HeaderMap, status: StatusCode) -> Response {
    let body = if is_xhr(request_headers) {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .unwrap_or_else(|_| "{}".to_string());

    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}
