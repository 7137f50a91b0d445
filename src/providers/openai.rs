// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! OpenAI chat-completion collaborator.
//!
//! The `/ai` and `/codex` routes proxy to the chat completions endpoint
//! with the gateway's historical parameter names: `q` (question),
//! `debug`, `p` (prompt model), `m` (model), `t` (temperature),
//! `mt` (max tokens). Failures are returned in-band as the standard
//! `{error, error_message, data}` envelope rather than HTTP errors,
//! which is what the bot clients expect.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::AppConfig;

const API_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_TEMPERATURE: f64 = 1.0;

/// Request parameters, collected from query string or JSON body.
#[derive(Debug, Clone, Default)]
pub struct CompletionParams {
    /// The question, or a JSON messages array when it starts with `{`.
    pub q: Option<String>,
    /// Verbose mode: return the raw completion payload.
    pub debug: bool,
    /// Prompt model name (`esp_eng_translation`, `eng_fr_translation`).
    pub prompt_model: Option<String>,
    /// Completion model override.
    pub model: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<String>,
    /// Max completion tokens.
    pub max_tokens: Option<String>,
}

impl CompletionParams {
    /// Build from the flat string map used by both the query string and
    /// the JSON body (`q`, `debug`, `p`, `m`, `t`, `mt`).
    pub fn from_map(params: &HashMap<String, String>) -> Self {
        Self {
            q: params.get("q").cloned(),
            debug: params.get("debug").map(String::as_str) == Some("1"),
            prompt_model: params.get("p").cloned(),
            model: params.get("m").cloned(),
            temperature: params.get("t").cloned(),
            max_tokens: params.get("mt").cloned(),
        }
    }

    /// Force the completion model (used by `/codex`).
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }
}

/// Standard in-band envelope.
fn standard_response() -> Value {
    json!({"error": false, "error_message": "", "data": {}})
}

fn error_response(message: impl Into<String>) -> Value {
    let mut response = standard_response();
    response["error"] = Value::Bool(true);
    response["error_message"] = Value::String(message.into());
    response
}

/// Expand the question into a chat messages array.
///
/// A question starting with `{` is decoded as a ready-made messages
/// value; the two translation prompt models wrap the question in their
/// templates; everything else becomes a single user message.
fn build_messages(prompt_model: &str, question: &str) -> Result<Value, Value> {
    if question.starts_with('{') {
        return serde_json::from_str(question)
            .map_err(|err| error_response(format!("ERROR OAI-060:Cannot json decode question: {err}")));
    }

    let messages = match prompt_model {
        "esp_eng_translation" => json!([
            {"role": "system", "content": "You are a helpful assistant."},
            {"role": "user", "content": format!("Translate the following Spanish text to English: '{question}'")},
        ]),
        "eng_fr_translation" => json!([
            {"role": "system", "content": "You are a helpful assistant."},
            {"role": "user", "content": format!("Translate the following English text to French: '{question}'")},
        ]),
        _ => json!([{"role": "user", "content": question}]),
    };

    Ok(messages)
}

/// Chat-completion client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    config: Arc<AppConfig>,
}

impl OpenAiClient {
    pub fn new(config: Arc<AppConfig>, http: Client) -> Self {
        Self { http, config }
    }

    /// Run a completion with the gateway's default parameters.
    ///
    /// Returns the completion text as a JSON string on success, the raw
    /// payload envelope in debug mode, and an error envelope otherwise.
    pub async fn completion_with_defaults(&self, params: CompletionParams) -> Value {
        let question = match params.q.as_deref() {
            Some(question) if !question.is_empty() => question,
            _ => return error_response("ERROR OAI-010:No question supplied"),
        };

        let Some(api_key) = self.config.openai_api_key.as_deref() else {
            return error_response("ERROR OAI-030: OPENAI_API_KEY is not configured");
        };

        let prompt_model = params.prompt_model.as_deref().unwrap_or_default();
        let messages = match build_messages(prompt_model, question) {
            Ok(messages) => messages,
            Err(envelope) => return envelope,
        };

        let model = params.model.as_deref().unwrap_or(DEFAULT_MODEL);
        let temperature = params
            .temperature
            .as_deref()
            .and_then(|t| t.parse::<f64>().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);

        let mut body = json!({
            "model": model,
            "messages": messages,
            "temperature": temperature,
        });
        if let Some(max_tokens) = params
            .max_tokens
            .as_deref()
            .and_then(|mt| mt.parse::<i64>().ok())
        {
            body["max_tokens"] = Value::from(max_tokens);
        }
        debug!(model, temperature, "running completion");

        let response = match self
            .http
            .post(API_ENDPOINT)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                let message = format!("ERROR OAI-030: {err}");
                warn!("{message}");
                return error_response(message);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = format!("ERROR OAI-040: Status Code: {status}| Msg: {text}");
            warn!("{message}");
            return error_response(message);
        }

        let mut completion: Value = match response.json().await {
            Ok(completion) => completion,
            Err(err) => {
                let message = format!("ERROR OAI-025: {err}");
                warn!("{message}");
                return error_response(message);
            }
        };
        completion["question"] = Value::String(question.to_string());

        if params.debug {
            let mut envelope = standard_response();
            envelope["data"] = completion;
            return envelope;
        }

        match completion
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
        {
            Some(content) if !content.is_empty() => Value::String(content.to_string()),
            _ => {
                let message = "ERROR OAI-020: OpenAI response error. No choices message content";
                warn!("{message}");
                let mut envelope = error_response(message);
                envelope["data"] = completion;
                envelope
            }
        }
    }
}
