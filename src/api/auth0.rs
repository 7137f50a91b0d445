// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth0 management endpoints.
//!
//! Thin proxies: the provider's JSON body is returned verbatim with the
//! right content type, errors included. Only transport failures become
//! gateway errors.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::{error::ApiError, state::AppState};

fn provider_json(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// `GET /login`: client-credentials grant against the tenant.
#[utoipa::path(
    get,
    path = "/login",
    tag = "Auth0",
    responses((status = 200, description = "Raw provider token response"))
)]
pub async fn login(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = state
        .auth0
        .login()
        .await
        .map_err(|err| ApiError::bad_gateway(err.to_string()))?;
    Ok(provider_json(body))
}

/// `GET /auth0_client_grant`: create the client grant enabling the
/// client-credentials flow.
#[utoipa::path(
    get,
    path = "/auth0_client_grant",
    tag = "Auth0",
    responses((status = 200, description = "Raw provider client-grant response"))
)]
pub async fn client_grant(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = state
        .auth0
        .client_grant()
        .await
        .map_err(|err| ApiError::bad_gateway(err.to_string()))?;
    Ok(provider_json(body))
}
