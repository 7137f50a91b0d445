// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and kept
//! in [`AppConfig`] inside the shared application state.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `SECRET_KEY` | JWT signing secret (local auth) | Required for JWT mode |
//! | `ALGORITHM` | JWT signing algorithm (local auth) | `HS256` |
//! | `ACCESS_TOKEN_EXPIRE_MINUTES` | Access token lifetime | `30` |
//! | `JWT_ENABLED` | Enable local-secret JWT auth (`1`/`0`) | `1` |
//! | `AUTH0_ENABLED` | Enable Auth0 JWKS auth (`1`/`0`) | `0` |
//! | `AUTH0_DOMAIN` | Auth0 tenant domain | Required for Auth0 mode |
//! | `AUTH0_ALGORITHMS` | Allowed Auth0 algorithms (comma list) | `RS256` |
//! | `AUTH0_API_AUDIENCE` | Expected JWT audience (Auth0 mode) | Required for Auth0 mode |
//! | `AUTH0_MAPI_CLIENT_ID` | Auth0 management API client ID | Optional |
//! | `AUTH0_MAPI_CLIENT_SECRET` | Auth0 management API client secret | Optional |
//! | `AUTH0_MAPI_API_TOKEN` | Auth0 management API token | Optional |
//! | `OPENAI_API_KEY` | OpenAI API key | Optional |
//! | `TELEGRAM_BOT_TOKEN` | Telegram bot token for error reports | Optional |
//! | `TELEGRAM_CHAT_ID` | Telegram chat for error reports | Optional |
//! | `VEB_EXCHANGE_URL` | BCV exchange-rate provider endpoint | Optional |
//! | `COP_EXCHANGE_URL` | COP exchange-rate provider endpoint | Optional |
//! | `MONITOR_EXCHANGE_URL` | Monitor exchange-rate provider endpoint | Optional |
//! | `USERS_FILE` | JSON file seeding the user store | Optional |
//! | `APP_NAME` | Application name in error reports | `mediabros_apis` |
//! | `SERVER_NAME` | Server name in error reports | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

/// Authentication mode, resolved once at configuration load.
///
/// The two legacy switches (`JWT_ENABLED`, `AUTH0_ENABLED`) are collapsed
/// into a single enum here. Priority order is `JWT_ENABLED` first, then
/// `AUTH0_ENABLED`; with neither set, protected routes are open-access.
/// That priority is part of the deployed contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Verify tokens against the local `SECRET_KEY`.
    Local,
    /// Verify tokens against the Auth0 tenant's JWKS.
    Remote,
    /// No verification; handlers run without a principal.
    Disabled,
}

impl AuthMode {
    /// Resolve the mode from the two legacy environment switches.
    pub fn from_flags(jwt_enabled: bool, auth0_enabled: bool) -> Self {
        if jwt_enabled {
            AuthMode::Local
        } else if auth0_enabled {
            AuthMode::Remote
        } else {
            AuthMode::Disabled
        }
    }
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMode::Local => write!(f, "local"),
            AuthMode::Remote => write!(f, "remote"),
            AuthMode::Disabled => write!(f, "disabled"),
        }
    }
}

/// Application configuration, loaded from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Resolved authentication mode.
    pub auth_mode: AuthMode,
    /// Local JWT signing secret.
    pub secret_key: Option<String>,
    /// Local JWT signing algorithm name (e.g. `HS256`).
    pub algorithm: String,
    /// Access token lifetime in minutes.
    pub access_token_expire_minutes: f64,
    /// Auth0 tenant domain (e.g. `tenant.us.auth0.com`).
    pub auth0_domain: Option<String>,
    /// Allowed algorithms for Auth0-issued tokens.
    pub auth0_algorithms: Vec<String>,
    /// Expected audience for Auth0-issued tokens.
    pub auth0_api_audience: Option<String>,
    /// Auth0 management API client ID.
    pub auth0_mapi_client_id: Option<String>,
    /// Auth0 management API client secret.
    pub auth0_mapi_client_secret: Option<String>,
    /// Auth0 management API token.
    pub auth0_mapi_api_token: Option<String>,
    /// OpenAI API key.
    pub openai_api_key: Option<String>,
    /// Telegram bot token for error reports.
    pub telegram_bot_token: Option<String>,
    /// Telegram chat ID for error reports.
    pub telegram_chat_id: Option<String>,
    /// BCV exchange-rate provider endpoint.
    pub veb_exchange_url: Option<String>,
    /// COP exchange-rate provider endpoint.
    pub cop_exchange_url: Option<String>,
    /// Monitor exchange-rate provider endpoint.
    pub monitor_exchange_url: Option<String>,
    /// Optional JSON file seeding the user store.
    pub users_file: Option<String>,
    /// Application name used in error reports.
    pub app_name: String,
    /// Server name used in error reports.
    pub server_name: Option<String>,
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_flag(name: &str, default: &str) -> bool {
    env::var(name).unwrap_or_else(|_| default.to_string()) == "1"
}

impl AppConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Self {
        let jwt_enabled = env_flag("JWT_ENABLED", "1");
        let auth0_enabled = env_flag("AUTH0_ENABLED", "0");

        let auth0_algorithms = env::var("AUTH0_ALGORITHMS")
            .unwrap_or_else(|_| "RS256".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            auth_mode: AuthMode::from_flags(jwt_enabled, auth0_enabled),
            secret_key: env_opt("SECRET_KEY"),
            algorithm: env::var("ALGORITHM").unwrap_or_else(|_| "HS256".to_string()),
            access_token_expire_minutes: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30.0),
            auth0_domain: env_opt("AUTH0_DOMAIN"),
            auth0_algorithms,
            auth0_api_audience: env_opt("AUTH0_API_AUDIENCE"),
            auth0_mapi_client_id: env_opt("AUTH0_MAPI_CLIENT_ID"),
            auth0_mapi_client_secret: env_opt("AUTH0_MAPI_CLIENT_SECRET"),
            auth0_mapi_api_token: env_opt("AUTH0_MAPI_API_TOKEN"),
            openai_api_key: env_opt("OPENAI_API_KEY"),
            telegram_bot_token: env_opt("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: env_opt("TELEGRAM_CHAT_ID"),
            veb_exchange_url: env_opt("VEB_EXCHANGE_URL"),
            cop_exchange_url: env_opt("COP_EXCHANGE_URL"),
            monitor_exchange_url: env_opt("MONITOR_EXCHANGE_URL"),
            users_file: env_opt("USERS_FILE"),
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "mediabros_apis".to_string()),
            server_name: env_opt("SERVER_NAME"),
        }
    }

    /// Expected issuer for Auth0-issued tokens (`https://<domain>/`).
    pub fn auth0_issuer(&self) -> Option<String> {
        self.auth0_domain
            .as_ref()
            .map(|domain| format!("https://{domain}/"))
    }

    /// JWKS endpoint for the configured Auth0 tenant.
    pub fn auth0_jwks_url(&self) -> Option<String> {
        self.auth0_domain
            .as_ref()
            .map(|domain| format!("https://{domain}/.well-known/jwks.json"))
    }
}

impl Default for AppConfig {
    /// Configuration with all collaborators unset and auth disabled.
    /// Tests start from this; production always goes through `from_env`.
    fn default() -> Self {
        Self {
            auth_mode: AuthMode::Disabled,
            secret_key: None,
            algorithm: "HS256".to_string(),
            access_token_expire_minutes: 30.0,
            auth0_domain: None,
            auth0_algorithms: vec!["RS256".to_string()],
            auth0_api_audience: None,
            auth0_mapi_client_id: None,
            auth0_mapi_client_secret: None,
            auth0_mapi_api_token: None,
            openai_api_key: None,
            telegram_bot_token: None,
            telegram_chat_id: None,
            veb_exchange_url: None,
            cop_exchange_url: None,
            monitor_exchange_url: None,
            users_file: None,
            app_name: "mediabros_apis".to_string(),
            server_name: None,
        }
    }
}
