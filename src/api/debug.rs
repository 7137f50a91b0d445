// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request introspection endpoint.

use std::collections::HashMap;

use axum::{
    extract::Query,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::Response,
};
use serde_json::json;

use crate::response::jsonify;

/// `GET /query_params`: echo the request's method, path and query
/// parameters. Pretty-printed unless called via XHR.
#[utoipa::path(
    get,
    path = "/query_params",
    tag = "Debug",
    responses((status = 200, description = "Request introspection"))
)]
pub async fn query_params(
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let value = json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query_params": params,
    });
    jsonify(&value, &headers, StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use serde_json::Value;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn echoes_method_path_and_query() {
        let app = Router::new().route("/query_params", get(query_params));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/query_params?a=1&b=two")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["method"], "GET");
        assert_eq!(body["path"], "/query_params");
        assert_eq!(body["query_params"]["a"], "1");
        assert_eq!(body["query_params"]["b"], "two");
    }
}
