// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LLM completion endpoints (protected).
//!
//! `/ai` accepts the question and tuning parameters via query string
//! (GET) or JSON body (POST); `/codex` is the same surface with the
//! code model forced. The auth gate runs before any of these handlers.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde_json::Value;
use tracing::debug;

use crate::{
    auth::Principal,
    providers::CompletionParams,
    state::AppState,
};

const CODEX_MODEL: &str = "code-davinci-002";

/// Flatten a JSON body into the flat string map the parameter names use.
/// Scalars are stringified; nested values are ignored.
fn params_from_json(body: &Value) -> HashMap<String, String> {
    let Some(entries) = body.as_object() else {
        return HashMap::new();
    };

    entries
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::String(text) => text.clone(),
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                _ => return None,
            };
            Some((key.clone(), text))
        })
        .collect()
}

async fn run_completion(
    state: &AppState,
    principal: Option<&Principal>,
    params: CompletionParams,
) -> Json<Value> {
    if let Some(principal) = principal {
        debug!(subject = %principal.subject, "completion requested");
    }
    Json(state.openai.completion_with_defaults(params).await)
}

/// `GET /ai` with `q`, `debug`, `p`, `m`, `t`, `mt` query parameters.
#[utoipa::path(
    get,
    path = "/ai",
    tag = "AI",
    security(("bearer" = [])),
    responses((status = 200, description = "Completion text or error envelope"))
)]
pub async fn ai_get(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    run_completion(
        &state,
        principal.as_deref(),
        CompletionParams::from_map(&params),
    )
    .await
}

/// `POST /ai` with the same parameters as a JSON body.
#[utoipa::path(
    post,
    path = "/ai",
    tag = "AI",
    security(("bearer" = [])),
    responses((status = 200, description = "Completion text or error envelope"))
)]
pub async fn ai_post(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    body: Option<Json<Value>>,
) -> Json<Value> {
    let params = body
        .map(|Json(value)| params_from_json(&value))
        .unwrap_or_default();
    run_completion(
        &state,
        principal.as_deref(),
        CompletionParams::from_map(&params),
    )
    .await
}

/// `GET /codex`: `/ai` with the code model forced.
#[utoipa::path(
    get,
    path = "/codex",
    tag = "AI",
    security(("bearer" = [])),
    responses((status = 200, description = "Completion text or error envelope"))
)]
pub async fn codex_get(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let params = CompletionParams::from_map(&params).with_model(CODEX_MODEL);
    run_completion(&state, principal.as_deref(), params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_from_json_stringifies_scalars() {
        let body = json!({"q": "hola", "debug": 1, "t": 0.5, "flag": true, "nested": {"x": 1}});
        let params = params_from_json(&body);
        assert_eq!(params.get("q").map(String::as_str), Some("hola"));
        assert_eq!(params.get("debug").map(String::as_str), Some("1"));
        assert_eq!(params.get("t").map(String::as_str), Some("0.5"));
        assert_eq!(params.get("flag").map(String::as_str), Some("true"));
        assert!(!params.contains_key("nested"));
    }

    #[test]
    fn params_from_json_tolerates_non_object_body() {
        assert!(params_from_json(&json!("just a string")).is_empty());
        assert!(params_from_json(&Value::Null).is_empty());
    }
}
