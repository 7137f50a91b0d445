// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_auth,
    models::{PasswordHashResponse, TokenResponse},
    state::AppState,
};

pub mod ai;
pub mod auth0;
pub mod debug;
pub mod rates;
pub mod token;

/// Build the full route table.
///
/// Only `/ai` and `/codex` sit behind the auth gate; the gate itself is
/// applied right here so the protected surface is visible at a glance.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/ai", get(ai::ai_get).post(ai::ai_post))
        .route("/codex", get(ai::codex_get))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/login", get(auth0::login))
        .route("/auth0_client_grant", get(auth0::client_grant))
        .route("/token", post(token::login_for_access_token))
        .route("/pget", get(token::pget))
        .route("/query_params", get(debug::query_params))
        .route("/usdcop", get(rates::usdcop_plain))
        .route("/usdcop/{debug}", get(rates::usdcop))
        .route("/usdveb", get(rates::usdveb_plain))
        .route("/usdveb/{debug}", get(rates::usdveb))
        .route("/usdveb_monitor", get(rates::usdveb_monitor_plain))
        .route("/usdveb_monitor/{debug}", get(rates::usdveb_monitor))
        .route("/usdveb_full", get(rates::usdveb_full_plain))
        .route("/usdveb_full/{debug}", get(rates::usdveb_full))
        .route("/copveb", get(rates::copveb_plain))
        .route("/copveb/{debug}", get(rates::copveb))
        .route("/vebcop", get(rates::vebcop_plain))
        .route("/vebcop/{debug}", get(rates::vebcop))
        .route("/btc", get(rates::btc_plain))
        .route("/btc/{debug}", get(rates::btc))
        .route("/eth", get(rates::eth_plain))
        .route("/eth/{debug}", get(rates::eth))
        .route("/crypto/{symbol}", get(rates::crypto_plain))
        .route("/crypto/{symbol}/{debug}", get(rates::crypto))
        .route(
            "/crypto_wc/{symbol}/{currency}/{debug}",
            get(rates::crypto_wc),
        )
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth0::login,
        auth0::client_grant,
        token::login_for_access_token,
        token::pget,
        ai::ai_get,
        ai::ai_post,
        ai::codex_get,
        debug::query_params,
        rates::usdcop_plain,
        rates::usdcop,
        rates::usdveb_plain,
        rates::usdveb,
        rates::usdveb_monitor_plain,
        rates::usdveb_monitor,
        rates::usdveb_full_plain,
        rates::usdveb_full,
        rates::copveb_plain,
        rates::copveb,
        rates::vebcop_plain,
        rates::vebcop,
        rates::btc_plain,
        rates::btc,
        rates::eth_plain,
        rates::eth,
        rates::crypto_plain,
        rates::crypto,
        rates::crypto_wc
    ),
    components(schemas(TokenResponse, PasswordHashResponse)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Credential exchange"),
        (name = "Auth0", description = "Auth0 management proxies"),
        (name = "AI", description = "LLM completion proxies"),
        (name = "Rates", description = "Currency exchange rates"),
        (name = "Crypto", description = "Crypto prices"),
        (name = "Debug", description = "Request introspection")
    )
)]
struct ApiDoc;
