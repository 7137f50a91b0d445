// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential exchange and password utility endpoints.

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use crate::{
    auth::token::create_access_token,
    error::ApiError,
    models::{PasswordHashQuery, PasswordHashResponse, TokenResponse},
    password::{get_password_hash, verify_password},
    state::AppState,
};

/// Exchange a username/password for a signed access token.
///
/// The body is `multipart/form-data` with `username` and `password`
/// fields (OAuth2 password-flow style). Unknown users and wrong
/// passwords are indistinguishable in the response.
#[utoipa::path(
    post,
    path = "/token",
    tag = "Auth",
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 401, description = "Incorrect username or password"),
    )
)]
pub async fn login_for_access_token(
    State(state): State<AppState>,
    mut form: Multipart,
) -> Result<Json<TokenResponse>, ApiError> {
    let mut username = None;
    let mut password = None;

    while let Some(field) = form
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("Invalid multipart form data: {err}")))?
    {
        let name = field.name().map(str::to_string);
        let value = field
            .text()
            .await
            .map_err(|err| ApiError::bad_request(format!("Invalid multipart form data: {err}")))?;
        match name.as_deref() {
            Some("username") => username = Some(value),
            Some("password") => password = Some(value),
            _ => {}
        }
    }

    let username = username.unwrap_or_default();
    let password = password.unwrap_or_default();

    let token = {
        let store = state.users.read().await;
        let user = store
            .fetch_by_username(&username)
            .filter(|user| verify_password(&password, &user.hashed_password));

        let Some(user) = user else {
            warn!("ERROR on login: Incorrect username or password");
            return Err(ApiError::unauthorized("Incorrect username or password"));
        };

        let secret = state.config.secret_key.as_deref().ok_or_else(|| {
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "SECRET_KEY is not configured",
            )
        })?;

        create_access_token(
            &user.username,
            secret,
            &state.config.algorithm,
            Some(state.config.access_token_expire_minutes),
        )
        .map_err(|err| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?
    };

    Ok(Json(TokenResponse::bearer(token)))
}

/// Hash a password with the store's credential format.
#[utoipa::path(
    get,
    path = "/pget",
    tag = "Auth",
    params(PasswordHashQuery),
    responses((status = 200, description = "Hashed password", body = PasswordHashResponse))
)]
pub async fn pget(
    Query(query): Query<PasswordHashQuery>,
) -> Result<Json<PasswordHashResponse>, ApiError> {
    let password_hashed = get_password_hash(&query.p)
        .map_err(|err| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;

    Ok(Json(PasswordHashResponse { password_hashed }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::verify_access_token;
    use crate::config::{AppConfig, AuthMode};
    use crate::users::{StoredUser, UserStore};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::routing::{get, post};
    use axum::Router;
    use serde_json::Value;
    use tower::util::ServiceExt;

    const SECRET: &str = "test_jwt_secret_key_fixture";
    const BOUNDARY: &str = "test-boundary-7d93a1";

    fn app() -> Router {
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
            hashed_password: bcrypt::hash("wonderland", 4).unwrap(),
        });
        let state = AppState::new(config, users);

        Router::new()
            .route("/token", post(login_for_access_token))
            .route("/pget", get(pget))
            .with_state(state)
    }

    fn multipart_body(username: &str, password: &str) -> String {
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"username\"\r\n\r\n\
             {username}\r\n\
             --{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"password\"\r\n\r\n\
             {password}\r\n\
             --{BOUNDARY}--\r\n"
        )
    }

    fn token_request(username: &str, password: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/token")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(username, password)))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_credentials_issue_verifiable_token() {
        let response = app().oneshot(token_request("alice", "wonderland")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["token_type"], "bearer");

        let claims =
            verify_access_token(body["access_token"].as_str().unwrap(), SECRET, "HS256").unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[tokio::test]
    async fn wrong_password_gets_exact_401_body() {
        let response = app().oneshot(token_request("alice", "nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(
            body,
            r#"{"code":401,"detail":"Incorrect username or password"}"#
        );
    }

    #[tokio::test]
    async fn unknown_user_gets_same_401() {
        let response = app().oneshot(token_request("bob", "wonderland")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn pget_returns_verifiable_hash() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/pget?p=s3cret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let hashed = body["password_hashed"].as_str().unwrap();
        assert!(verify_password("s3cret", hashed));
    }
}
