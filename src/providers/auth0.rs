// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth0 management API calls.
//!
//! Backs `/login` (client-credentials grant) and `/auth0_client_grant`
//! (creating the client grant that allows the credentials flow). Both
//! return the provider's response body verbatim; callers pass it
//! through to the HTTP surface.

use std::sync::Arc;

use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::config::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum Auth0Error {
    #[error("Auth0 configuration missing: {0}")]
    MissingConfig(&'static str),

    #[error("Auth0 request failed: {0}")]
    Request(String),
}

/// Client for the Auth0 management API.
#[derive(Debug, Clone)]
pub struct Auth0Client {
    http: Client,
    config: Arc<AppConfig>,
}

impl Auth0Client {
    pub fn new(config: Arc<AppConfig>, http: Client) -> Self {
        Self { http, config }
    }

    fn domain(&self) -> Result<&str, Auth0Error> {
        self.config
            .auth0_domain
            .as_deref()
            .ok_or(Auth0Error::MissingConfig("AUTH0_DOMAIN"))
    }

    fn management_audience(&self) -> Result<String, Auth0Error> {
        Ok(format!("https://{}/api/v2/", self.domain()?))
    }

    /// `POST /oauth/token` with the client-credentials grant.
    pub async fn login(&self) -> Result<String, Auth0Error> {
        let client_id = self
            .config
            .auth0_mapi_client_id
            .as_deref()
            .ok_or(Auth0Error::MissingConfig("AUTH0_MAPI_CLIENT_ID"))?;
        let client_secret = self
            .config
            .auth0_mapi_client_secret
            .as_deref()
            .ok_or(Auth0Error::MissingConfig("AUTH0_MAPI_CLIENT_SECRET"))?;

        let body = json!({
            "client_id": client_id,
            "client_secret": client_secret,
            "audience": self.management_audience()?,
            "grant_type": "client_credentials",
        });

        self.post("/oauth/token", &body, None).await
    }

    /// `POST /api/v2/client-grants` with the management API token.
    pub async fn client_grant(&self) -> Result<String, Auth0Error> {
        let client_id = self
            .config
            .auth0_mapi_client_id
            .as_deref()
            .ok_or(Auth0Error::MissingConfig("AUTH0_MAPI_CLIENT_ID"))?;
        let api_token = self
            .config
            .auth0_mapi_api_token
            .as_deref()
            .ok_or(Auth0Error::MissingConfig("AUTH0_MAPI_API_TOKEN"))?;

        let body = json!({
            "client_id": client_id,
            "audience": self.management_audience()?,
            "scope": ["create:client_grants"],
        });

        self.post("/api/v2/client-grants", &body, Some(api_token))
            .await
    }

    async fn post(
        &self,
        endpoint_suffix: &str,
        body: &serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<String, Auth0Error> {
        let url = format!("https://{}{}", self.domain()?, endpoint_suffix);
        debug!(%url, "calling Auth0 management API");

        let mut request = self.http.post(&url).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| Auth0Error::Request(err.to_string()))?;

        // The provider's body is returned verbatim, errors included;
        // only transport failures become gateway errors.
        response
            .text()
            .await
            .map_err(|err| Auth0Error::Request(err.to_string()))
    }
}
