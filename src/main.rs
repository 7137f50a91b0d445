// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mediabros_apis::api::router;
use mediabros_apis::config::AppConfig;
use mediabros_apis::state::AppState;
use mediabros_apis::users::UserStore;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let format = env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    if format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AppConfig::from_env();
    info!(auth_mode = %config.auth_mode, "Mediabros APIs starting");

    let users = match &config.users_file {
        Some(path) => match UserStore::from_file(path) {
            Ok(store) => store,
            Err(err) => {
                // Local-auth logins will fail until the file is fixed,
                // but the public rate endpoints keep working.
                warn!(error = %err, path = %path, "could not seed user store");
                UserStore::new()
            }
        },
        None => UserStore::new(),
    };

    let state = AppState::new(config, users);
    let app = router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    info!("Mediabros APIs listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install SIGINT handler");
    info!("shutdown signal received");
}
