// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Telegram error reporting.
//!
//! Provider failures are pushed to an operations chat through the bot
//! API. Reporting is best-effort: a failed report is logged and never
//! affects the request being served.

use reqwest::Client;
use serde_json::json;
use tracing::warn;
use url::Url;

use crate::config::AppConfig;

const BOT_API_BASE: &str = "https://api.telegram.org";

/// Best-effort reporter for provider failures.
#[derive(Debug, Clone)]
pub struct TelegramReporter {
    http: Client,
    bot_token: Option<String>,
    chat_id: Option<String>,
    app_name: String,
    server_name: Option<String>,
}

impl TelegramReporter {
    pub fn new(config: &AppConfig, http: Client) -> Self {
        Self {
            http,
            bot_token: config.telegram_bot_token.clone(),
            chat_id: config.telegram_chat_id.clone(),
            app_name: config.app_name.clone(),
            server_name: config.server_name.clone(),
        }
    }

    /// Send an error report to the configured chat.
    ///
    /// A no-op when the bot token or chat ID is absent.
    pub async fn report_error(&self, calling_func: &str, error_message: &str) {
        let (Some(bot_token), Some(chat_id)) = (&self.bot_token, &self.chat_id) else {
            return;
        };

        let text = json!({
            "type": "ERROR in a Mediabros API",
            "app_name": self.app_name,
            "server_name": self.server_name,
            "calling_func": calling_func,
            "error_message": error_message,
        })
        .to_string();

        let url = match Url::parse_with_params(
            &format!("{BOT_API_BASE}/bot{bot_token}/sendMessage"),
            &[("chat_id", chat_id.as_str()), ("text", text.as_str())],
        ) {
            Ok(url) => url,
            Err(err) => {
                warn!(error = %err, "failed to build Telegram report URL");
                return;
            }
        };

        if let Err(err) = self.http.get(url).send().await {
            warn!(error = %err, "failed to deliver Telegram error report");
        }
    }
}
