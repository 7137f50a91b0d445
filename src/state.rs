// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::auth::JwksVerifier;
use crate::config::{AppConfig, AuthMode};
use crate::providers::{Auth0Client, ExchangeClient, OpenAiClient, TelegramReporter};
use crate::users::UserStore;

/// Provider call timeout.
const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Shared application state: configuration, the user store, and one
/// typed client per collaborator, all cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<RwLock<UserStore>>,
    /// Present only in remote auth mode with a fully-configured tenant.
    pub jwks: Option<Arc<JwksVerifier>>,
    pub exchange: ExchangeClient,
    pub openai: OpenAiClient,
    pub auth0: Auth0Client,
}

impl AppState {
    pub fn new(config: AppConfig, users: UserStore) -> Self {
        let config = Arc::new(config);

        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        let jwks = match config.auth_mode {
            AuthMode::Remote => JwksVerifier::from_config(&config).map(Arc::new),
            _ => None,
        };

        let reporter = TelegramReporter::new(&config, http.clone());

        Self {
            exchange: ExchangeClient::new(config.clone(), http.clone(), reporter),
            openai: OpenAiClient::new(config.clone(), http.clone()),
            auth0: Auth0Client::new(config.clone(), http),
            users: Arc::new(RwLock::new(users)),
            jwks,
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default(), UserStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwks_verifier_only_built_in_remote_mode() {
        let state = AppState::default();
        assert!(state.jwks.is_none());

        let remote = AppState::new(
            AppConfig {
                auth_mode: AuthMode::Remote,
                auth0_domain: Some("fixture.auth0.com".to_string()),
                auth0_api_audience: Some("test_api_audience".to_string()),
                ..AppConfig::default()
            },
            UserStore::new(),
        );
        assert!(remote.jwks.is_some());
    }

    #[test]
    fn remote_mode_without_tenant_config_has_no_verifier() {
        let state = AppState::new(
            AppConfig {
                auth_mode: AuthMode::Remote,
                ..AppConfig::default()
            },
            UserStore::new(),
        );
        // The gate reports this as a verifier misconfiguration at
        // request time rather than refusing to boot.
        assert!(state.jwks.is_none());
    }
}
