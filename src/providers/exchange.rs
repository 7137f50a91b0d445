// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Currency and crypto exchange-rate providers.
//!
//! Three families of upstreams, all consumed as opaque JSON endpoints:
//!
//! - CryptoCompare for crypto prices (`/btc`, `/eth`, `/crypto/...`)
//! - BCV / Monitor / COP rate services (vercel-style envelopes with
//!   `error` / `error_message` embedded in the payload)
//!
//! The message-building middleware lives here too: every route renders
//! either a plain human-readable summary or, in debug mode, the raw
//! payload in Python dict notation. The dict notation is part of the
//! deployed wire format (Telegram bots parse it), so it is rendered
//! explicitly rather than with JSON serialization.

use std::sync::Arc;

use chrono::NaiveDateTime;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::telegram::TelegramReporter;
use crate::config::AppConfig;

const CRYPTO_API_BASE: &str = "https://min-api.cryptocompare.com/data/price";
const BCV_PROVIDER_NAME: &str = "BCV official USD/Bs";
const MONITOR_PROVIDER_NAME: &str = "Monitor USD/Bs";
const COP_PROVIDER_NAME: &str = "Colombian Peso USD/COP";

/// Upstream provider failure.
///
/// `data` keeps the raw payload when the provider answered with an
/// in-band error; debug mode appends it to the message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
    pub data: Option<Value>,
}

impl ProviderError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    fn with_data(message: impl Into<String>, data: Value) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Cross-rate route ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossPair {
    /// `/copveb`: Colombian pesos per bolivar.
    CopPerVeb,
    /// `/vebcop`: bolivars per Colombian peso.
    VebPerCop,
}

/// Client for the exchange-rate providers.
#[derive(Debug, Clone)]
pub struct ExchangeClient {
    http: Client,
    config: Arc<AppConfig>,
    reporter: TelegramReporter,
}

impl ExchangeClient {
    pub fn new(config: Arc<AppConfig>, http: Client, reporter: TelegramReporter) -> Self {
        Self {
            http,
            config,
            reporter,
        }
    }

    // ------------------------------------------------------------------
    // Raw provider calls
    // ------------------------------------------------------------------

    /// Fetch a crypto price from CryptoCompare.
    ///
    /// A 200 response can still carry an in-band error
    /// (`{"Response": "Error", "Message": ...}`); that payload is kept
    /// for debug rendering.
    pub async fn crypto_price(&self, symbol: &str, currency: &str) -> Result<Value, ProviderError> {
        let result = self.crypto_price_inner(symbol, currency).await;
        if let Err(err) = &result {
            self.reporter.report_error("crypto_api", &err.message).await;
        }
        result
    }

    async fn crypto_price_inner(
        &self,
        symbol: &str,
        currency: &str,
    ) -> Result<Value, ProviderError> {
        let url = Url::parse_with_params(CRYPTO_API_BASE, &[("fsym", symbol), ("tsyms", currency)])
            .map_err(|err| ProviderError::new(err.to_string()))?;
        debug!(%url, "fetching crypto price");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| ProviderError::with_data(err.to_string(), Value::Object(Default::default())))?;

        if !response.status().is_success() {
            return Err(ProviderError::with_data(
                "ERROR reading the min-api.cryptocompare.com API",
                Value::Object(Default::default()),
            ));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|err| ProviderError::with_data(err.to_string(), Value::Object(Default::default())))?;

        if data.get("Response").and_then(Value::as_str) == Some("Error") {
            let message = data
                .get("Message")
                .and_then(Value::as_str)
                .unwrap_or("unknown provider error")
                .to_string();
            return Err(ProviderError::with_data(format!("ERROR: {message}"), data));
        }

        Ok(data)
    }

    /// Fetch the BCV official rates payload.
    pub async fn bcv_rates(&self) -> Result<Value, ProviderError> {
        self.envelope_rates(
            self.config.veb_exchange_url.as_deref(),
            "VEB_EXCHANGE_URL",
            BCV_PROVIDER_NAME,
            "veb_bcv_api",
        )
        .await
    }

    /// Fetch the parallel-market monitor rates payload.
    pub async fn monitor_rates(&self) -> Result<Value, ProviderError> {
        self.envelope_rates(
            self.config.monitor_exchange_url.as_deref(),
            "MONITOR_EXCHANGE_URL",
            MONITOR_PROVIDER_NAME,
            "veb_monitor_api",
        )
        .await
    }

    /// Fetch the COP rates payload.
    pub async fn cop_rates(&self) -> Result<Value, ProviderError> {
        self.envelope_rates(
            self.config.cop_exchange_url.as_deref(),
            "COP_EXCHANGE_URL",
            COP_PROVIDER_NAME,
            "cop_api",
        )
        .await
    }

    async fn envelope_rates(
        &self,
        url: Option<&str>,
        env_name: &str,
        provider_name: &str,
        calling_func: &str,
    ) -> Result<Value, ProviderError> {
        let result = match url {
            Some(url) => self.fetch_envelope(url, provider_name).await,
            None => Err(ProviderError::new(format!(
                "ERROR: {env_name} is not configured"
            ))),
        };
        if let Err(err) = &result {
            self.reporter.report_error(calling_func, &err.message).await;
        }
        result
    }

    /// Fetch a vercel-style rates payload and surface its in-band error
    /// flag as a [`ProviderError`].
    async fn fetch_envelope(&self, url: &str, name: &str) -> Result<Value, ProviderError> {
        debug!(url, provider = name, "fetching exchange rates");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| ProviderError::new(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::new(format!("ERROR reading {name} API")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| ProviderError::new(err.to_string()))?;

        envelope_result(payload, name)
    }

    // ------------------------------------------------------------------
    // Message middleware (one method per route family)
    // ------------------------------------------------------------------

    /// `/crypto/<symbol>`, `/crypto_wc/...`, `/btc`, `/eth`.
    pub async fn crypto_message(&self, symbol: &str, currency: &str, debug: bool) -> String {
        let symbol = symbol.to_uppercase();
        let currency = currency.to_uppercase();
        match self.crypto_price(&symbol, &currency).await {
            Ok(data) => format_crypto(&symbol, &currency, &data, debug),
            Err(err) => {
                let mut message = err.message.clone();
                if debug {
                    let data = err.data.unwrap_or_else(|| Value::Object(Default::default()));
                    message.push('\n');
                    message.push_str(&python_repr(&data));
                }
                message
            }
        }
    }

    /// `/usdveb`: BCV official rate.
    pub async fn usdveb_message(&self, debug: bool) -> String {
        match self.bcv_rates().await {
            Ok(payload) => format_bcv(&payload, debug),
            Err(err) => err.message,
        }
    }

    /// `/usdveb_monitor`: parallel-market monitor rates.
    pub async fn usdveb_monitor_message(&self, debug: bool) -> String {
        match self.monitor_rates().await {
            Ok(payload) => format_monitor(&payload, debug),
            Err(err) => format!("Monitor exchange rate:\n{}", err.message),
        }
    }

    /// `/usdveb_full`: BCV block plus monitor block.
    pub async fn usdveb_full_message(&self, debug: bool) -> String {
        let bcv = self.usdveb_message(debug).await;
        let monitor = self.usdveb_monitor_message(debug).await;
        format!("{bcv}\n\n{monitor}")
    }

    /// `/usdcop`: official + google COP rates.
    pub async fn usdcop_message(&self, debug: bool) -> String {
        match self.cop_rates().await {
            Ok(payload) => format_usdcop(&payload, debug),
            Err(err) => err.message,
        }
    }

    /// `/copveb` and `/vebcop`: BCV/COP cross rates.
    pub async fn cross_message(&self, pair: CrossPair, debug: bool) -> String {
        let veb = match self.bcv_rates().await {
            Ok(payload) => payload,
            Err(err) => return err.message,
        };
        let cop = match self.cop_rates().await {
            Ok(payload) => payload,
            Err(err) => return err.message,
        };
        format_cross(pair, &veb, &cop, debug)
    }
}

/// Surface a payload's in-band `error` flag as a [`ProviderError`].
///
/// `error_message` may be a string or a list of strings (the monitor
/// provider reports a list); lists are joined with newlines.
fn envelope_result(payload: Value, name: &str) -> Result<Value, ProviderError> {
    let failed = matches!(payload.get("error"), Some(Value::Bool(true)));
    if !failed {
        return Ok(payload);
    }

    let message = match payload.get("error_message") {
        Some(Value::String(message)) if !message.is_empty() => message.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("\n"),
        _ => format!("ERROR reading {name} API"),
    };

    Err(ProviderError::with_data(message, payload))
}

// ----------------------------------------------------------------------
// Formatting
// ----------------------------------------------------------------------

/// Render a JSON value in Python dict notation.
///
/// Debug-mode responses embed payloads exactly as the previous runtime
/// printed them: single-quoted strings, `True`/`False`/`None`.
pub fn python_repr(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'")),
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(python_repr).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Object(entries) => {
            let rendered: Vec<String> = entries
                .iter()
                .map(|(key, value)| {
                    format!(
                        "'{}': {}",
                        key.replace('\\', "\\\\").replace('\'', "\\'"),
                        python_repr(value)
                    )
                })
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
    }
}

/// Accept numbers or numeric strings, the way the upstreams mix them.
fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

fn format_crypto(symbol: &str, currency: &str, data: &Value, debug: bool) -> String {
    if debug {
        return format!("The {symbol} exchange rate is: {}", python_repr(data));
    }

    let exchange_rate = match data.get(currency).and_then(as_f64) {
        Some(rate) => format!("{rate:.2}"),
        None => format!("ERROR: no {currency} element in API result"),
    };
    format!("The {symbol} to {currency} exchange rate is: {exchange_rate}")
}

fn format_bcv(payload: &Value, debug: bool) -> String {
    if debug {
        return format!("BCV official exchange rates: {}", python_repr(payload));
    }

    let rate = payload
        .pointer("/data/dolar/value")
        .and_then(as_f64);
    let effective_date = payload
        .pointer("/data/effective_date")
        .and_then(Value::as_str);

    match (rate, effective_date) {
        (Some(rate), Some(date)) => format!(
            "BCV official exchange rate: {rate:.2} Bs/USD.\nEffective Date: {date}"
        ),
        _ => format!("ERROR: unexpected {BCV_PROVIDER_NAME} API response"),
    }
}

fn format_monitor(payload: &Value, debug: bool) -> String {
    if debug {
        return format!("Monitor exchange rates: {}", python_repr(payload));
    }

    let Some(data) = payload.get("data").and_then(Value::as_object) else {
        return format!(
            "Monitor exchange rate:\nERROR: unexpected {MONITOR_PROVIDER_NAME} API response"
        );
    };

    let lines: Vec<String> = data
        .values()
        .filter_map(|entry| {
            let symbol = entry.get("symbol").and_then(Value::as_str)?;
            let value = entry.get("value")?;
            Some(format!("  {symbol}: {}", python_value(value)))
        })
        .collect();

    let effective_date = data
        .get("effective_date")
        .and_then(Value::as_str)
        .unwrap_or_default();

    format!(
        "Monitor exchange rate:\n{}\nEffective Date: {effective_date}",
        lines.join("\n")
    )
}

/// Bare-value rendering (no quotes on strings), as Python interpolates
/// scalars inside f-strings.
fn python_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => python_repr(other),
    }
}

/// Reformat `%Y-%m-%dT%H:%M:%S.000` timestamps as `Month DD, YYYY`.
fn cop_date(value: &Value) -> Option<String> {
    let raw = value.as_str()?;
    let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.3f").ok()?;
    Some(parsed.format("%B %d, %Y").to_string())
}

fn format_usdcop(payload: &Value, debug: bool) -> String {
    if debug {
        let data = payload.get("data").unwrap_or(&Value::Null);
        return format!("The COP/USD exchange rate is: {}", python_repr(data));
    }

    format_usdcop_plain(payload)
        .unwrap_or_else(|| "ERROR in usdcop: unexpected API response".to_string())
}

fn format_usdcop_plain(payload: &Value) -> Option<String> {
    let official = payload.pointer("/data/official_cop/data")?;
    let official_rate = official.get("valor").and_then(as_f64)?;
    let official_bank = official.get("bank_value").and_then(as_f64)?;
    let official_bank_pct = official.get("bank_value_percent").and_then(as_f64)?;
    let from_date = cop_date(official.get("vigenciadesde")?)?;
    let to_date = cop_date(official.get("vigenciahasta")?)?;

    let google = payload.pointer("/data/google_cop/data")?;
    let google_rate = google.get("value").and_then(as_f64)?;
    let google_bank = google.get("bank_value").and_then(as_f64)?;
    let google_bank_pct = google.get("bank_value_percent").and_then(as_f64)?;
    let google_date = google.get("effective_date").and_then(Value::as_str)?;

    Some(format!(
        "COP official exchange rate: {official_rate:.2} COP/USD.\n\
         COP official exchange for bank transfers: {official_bank:.2} COP/USD \
         (+{official_bank_pct:.2}%).\n\
         From: {from_date}, to: {to_date}\n\
         \n\
         COP google exchange rate: {google_rate:.2} COP/USD.\n\
         COP google exchange for bank transfers: {google_bank:.2} COP/USD \
         (+{google_bank_pct:.2}%).\n\
         Effective date: {google_date}."
    ))
}

fn format_cross(pair: CrossPair, veb: &Value, cop: &Value, debug: bool) -> String {
    if debug {
        return format!(
            "BCV official: {}\nCOP official: {}",
            python_repr(veb),
            python_repr(cop)
        );
    }

    let veb_rate = veb.pointer("/data/dolar/value").and_then(as_f64);
    let effective_date = veb
        .pointer("/data/effective_date")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let cop_rate = cop
        .pointer("/data/official_cop/data/valor")
        .and_then(as_f64);

    let (Some(veb_rate), Some(cop_rate)) = (veb_rate, cop_rate) else {
        return "ERROR: unexpected exchange rate API response".to_string();
    };

    let (exchange_rate, suffix) = match pair {
        CrossPair::CopPerVeb => (cop_rate / veb_rate, "COP/Bs"),
        CrossPair::VebPerCop => (veb_rate / cop_rate, "Bs/COP"),
    };

    format!("Exchange rate: {exchange_rate:.4} {suffix}.\nEffective Date: {effective_date}")
}
