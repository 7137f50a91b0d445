// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware (the auth gate).
//!
//! Applied explicitly with `route_layer(middleware::from_fn_with_state(...))`
//! on the protected sub-router, so the wrapping is visible at route
//! registration. The gate resolves the verification strategy from the
//! configured [`AuthMode`](crate::config::AuthMode):
//!
//! - `Local`: verify against `SECRET_KEY`, then resolve the subject in
//!   the user store.
//! - `Remote`: verify against the tenant JWKS; the claims are the
//!   principal (no local account involved).
//! - `Disabled`: pass the request straight through, no principal.
//!
//! On success a [`Principal`] is inserted into request extensions; a
//! request reaches a protected handler with a principal if and only if
//! verification succeeded. Every [`AuthError`] becomes a structured
//! response; anything else propagates.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::claims::Principal;
use super::error::AuthError;
use super::extractor::bearer_token;
use super::token::verify_access_token;
use crate::config::AuthMode;
use crate::state::AppState;

/// Gate protected routes behind the configured verification strategy.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, request.headers()).await {
        Ok(Some(principal)) => {
            debug!(subject = %principal.subject, source = ?principal.source, "request authenticated");
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        // Open-access mode: no principal, handler runs regardless.
        Ok(None) => next.run(request).await,
        Err(err) => err.into_response(),
    }
}

async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<Principal>, AuthError> {
    match state.config.auth_mode {
        AuthMode::Disabled => Ok(None),
        AuthMode::Local => {
            let token = bearer_token(headers)?;
            let secret = state
                .config
                .secret_key
                .as_deref()
                .ok_or_else(|| AuthError::Unexpected("SECRET_KEY is not configured".to_string()))?;

            let claims = verify_access_token(token, secret, &state.config.algorithm)?;

            let store = state.users.read().await;
            let user = store
                .fetch_by_username(&claims.sub)
                .ok_or(AuthError::UserNotFound)?;
            if user.disabled {
                return Err(AuthError::InactiveUser);
            }

            Ok(Some(Principal::local(user, claims.exp)))
        }
        AuthMode::Remote => {
            let token = bearer_token(headers)?;
            let verifier = state.jwks.as_ref().ok_or_else(|| {
                AuthError::Unexpected(
                    "AUTH0_DOMAIN / AUTH0_API_AUDIENCE are not configured".to_string(),
                )
            })?;

            let claims = verifier.verify(token).await?;
            Ok(Some(Principal::remote(claims)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::create_access_token;
    use crate::config::AppConfig;
    use crate::users::{StoredUser, UserStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::routing::get;
    use axum::{middleware, Extension, Router};
    use serde_json::Value;
    use tower::util::ServiceExt;

    const SECRET: &str = "test_jwt_secret_key_fixture";

    async fn protected_handler(principal: Option<Extension<Principal>>) -> String {
        match principal {
            Some(Extension(principal)) => format!("handler ran as {}", principal.subject),
            None => "handler ran without principal".to_string(),
        }
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/protected", get(protected_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    fn local_state() -> AppState {
        let config = AppConfig {
            auth_mode: AuthMode::Local,
            secret_key: Some(SECRET.to_string()),
            ..AppConfig::default()
        };
        let mut users = UserStore::new();
        users.insert_user(StoredUser {
            username: "alice".to_string(),
            email: None,
            full_name: None,
            disabled: false,
            hashed_password: "$2b$04$x".to_string(),
        });
        users.insert_user(StoredUser {
            username: "mallory".to_string(),
            email: None,
            full_name: None,
            disabled: true,
            hashed_password: "$2b$04$y".to_string(),
        });
        AppState::new(config, users)
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn disabled_mode_runs_handler_without_principal() {
        let state = AppState::new(AppConfig::default(), UserStore::new());
        let response = app(state)
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "handler ran without principal");
    }

    #[tokio::test]
    async fn missing_header_short_circuits_with_tagged_401() {
        let response = app(local_state())
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["code"], 401);
        assert_eq!(
            body["detail"],
            "ERROR: Authorization header is expected [JWT_AUTH_ERROR]"
        );
    }

    #[tokio::test]
    async fn malformed_header_never_reaches_handler() {
        for value in ["Basic abc", "Bearer", "Bearer a b"] {
            let response = app(local_state())
                .oneshot(
                    HttpRequest::builder()
                        .uri("/protected")
                        .header("Authorization", value)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{value}");
            let body = body_text(response).await;
            assert!(!body.contains("handler ran"), "{value}: {body}");
        }
    }

    #[tokio::test]
    async fn valid_token_injects_principal() {
        let token = create_access_token("alice", SECRET, "HS256", Some(15.0)).unwrap();
        let response = app(local_state())
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "handler ran as alice");
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let token = create_access_token("alice", SECRET, "HS256", Some(-5.0)).unwrap();
        let response = app(local_state())
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_text(response).await;
        assert!(body.contains("token is expired"), "{body}");
    }

    #[tokio::test]
    async fn unknown_subject_is_rejected() {
        let token = create_access_token("bob", SECRET, "HS256", Some(15.0)).unwrap();
        let response = app(local_state())
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn disabled_user_gets_400() {
        let token = create_access_token("mallory", SECRET, "HS256", Some(15.0)).unwrap();
        let response = app(local_state())
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_text(response).await;
        assert!(body.contains("Inactive user"), "{body}");
    }
}
