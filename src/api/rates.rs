// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Exchange-rate and crypto-price endpoints (public).
//!
//! Every route comes in a plain variant and a `/{debug}` variant; the
//! path segment `"1"` selects debug output, any other value is plain.
//! Responses are `text/plain` summaries either way, including provider
//! failures, which render as `ERROR: ...` bodies with status 200.

use axum::extract::{Path, State};

use crate::providers::CrossPair;
use crate::state::AppState;

fn is_debug(segment: &str) -> bool {
    segment == "1"
}

/// `GET /usdcop`
#[utoipa::path(get, path = "/usdcop", tag = "Rates",
    responses((status = 200, description = "COP/USD summary", body = String)))]
pub async fn usdcop_plain(State(state): State<AppState>) -> String {
    state.exchange.usdcop_message(false).await
}

/// `GET /usdcop/{debug}`
#[utoipa::path(get, path = "/usdcop/{debug}", tag = "Rates",
    responses((status = 200, description = "COP/USD summary or raw payload", body = String)))]
pub async fn usdcop(State(state): State<AppState>, Path(debug): Path<String>) -> String {
    state.exchange.usdcop_message(is_debug(&debug)).await
}

/// `GET /usdveb`
#[utoipa::path(get, path = "/usdveb", tag = "Rates",
    responses((status = 200, description = "BCV official rate", body = String)))]
pub async fn usdveb_plain(State(state): State<AppState>) -> String {
    state.exchange.usdveb_message(false).await
}

/// `GET /usdveb/{debug}`
#[utoipa::path(get, path = "/usdveb/{debug}", tag = "Rates",
    responses((status = 200, description = "BCV official rate or raw payload", body = String)))]
pub async fn usdveb(State(state): State<AppState>, Path(debug): Path<String>) -> String {
    state.exchange.usdveb_message(is_debug(&debug)).await
}

/// `GET /usdveb_monitor`
#[utoipa::path(get, path = "/usdveb_monitor", tag = "Rates",
    responses((status = 200, description = "Parallel-market monitor rates", body = String)))]
pub async fn usdveb_monitor_plain(State(state): State<AppState>) -> String {
    state.exchange.usdveb_monitor_message(false).await
}

/// `GET /usdveb_monitor/{debug}`
#[utoipa::path(get, path = "/usdveb_monitor/{debug}", tag = "Rates",
    responses((status = 200, description = "Monitor rates or raw payload", body = String)))]
pub async fn usdveb_monitor(State(state): State<AppState>, Path(debug): Path<String>) -> String {
    state.exchange.usdveb_monitor_message(is_debug(&debug)).await
}

/// `GET /usdveb_full`
#[utoipa::path(get, path = "/usdveb_full", tag = "Rates",
    responses((status = 200, description = "BCV and monitor blocks", body = String)))]
pub async fn usdveb_full_plain(State(state): State<AppState>) -> String {
    state.exchange.usdveb_full_message(false).await
}

/// `GET /usdveb_full/{debug}`
#[utoipa::path(get, path = "/usdveb_full/{debug}", tag = "Rates",
    responses((status = 200, description = "BCV and monitor blocks or raw payloads", body = String)))]
pub async fn usdveb_full(State(state): State<AppState>, Path(debug): Path<String>) -> String {
    state.exchange.usdveb_full_message(is_debug(&debug)).await
}

/// `GET /copveb`
#[utoipa::path(get, path = "/copveb", tag = "Rates",
    responses((status = 200, description = "COP per bolivar cross rate", body = String)))]
pub async fn copveb_plain(State(state): State<AppState>) -> String {
    state.exchange.cross_message(CrossPair::CopPerVeb, false).await
}

/// `GET /copveb/{debug}`
#[utoipa::path(get, path = "/copveb/{debug}", tag = "Rates",
    responses((status = 200, description = "Cross rate or raw payloads", body = String)))]
pub async fn copveb(State(state): State<AppState>, Path(debug): Path<String>) -> String {
    state
        .exchange
        .cross_message(CrossPair::CopPerVeb, is_debug(&debug))
        .await
}

/// `GET /vebcop`
#[utoipa::path(get, path = "/vebcop", tag = "Rates",
    responses((status = 200, description = "Bolivars per COP cross rate", body = String)))]
pub async fn vebcop_plain(State(state): State<AppState>) -> String {
    state.exchange.cross_message(CrossPair::VebPerCop, false).await
}

/// `GET /vebcop/{debug}`
#[utoipa::path(get, path = "/vebcop/{debug}", tag = "Rates",
    responses((status = 200, description = "Cross rate or raw payloads", body = String)))]
pub async fn vebcop(State(state): State<AppState>, Path(debug): Path<String>) -> String {
    state
        .exchange
        .cross_message(CrossPair::VebPerCop, is_debug(&debug))
        .await
}

/// `GET /btc`
#[utoipa::path(get, path = "/btc", tag = "Crypto",
    responses((status = 200, description = "BTC/USD rate", body = String)))]
pub async fn btc_plain(State(state): State<AppState>) -> String {
    state.exchange.crypto_message("btc", "usd", false).await
}

/// `GET /btc/{debug}`
#[utoipa::path(get, path = "/btc/{debug}", tag = "Crypto",
    responses((status = 200, description = "BTC/USD rate or raw payload", body = String)))]
pub async fn btc(State(state): State<AppState>, Path(debug): Path<String>) -> String {
    state
        .exchange
        .crypto_message("btc", "usd", is_debug(&debug))
        .await
}

/// `GET /eth`
#[utoipa::path(get, path = "/eth", tag = "Crypto",
    responses((status = 200, description = "ETH/USD rate", body = String)))]
pub async fn eth_plain(State(state): State<AppState>) -> String {
    state.exchange.crypto_message("eth", "usd", false).await
}

/// `GET /eth/{debug}`
#[utoipa::path(get, path = "/eth/{debug}", tag = "Crypto",
    responses((status = 200, description = "ETH/USD rate or raw payload", body = String)))]
pub async fn eth(State(state): State<AppState>, Path(debug): Path<String>) -> String {
    state
        .exchange
        .crypto_message("eth", "usd", is_debug(&debug))
        .await
}

/// `GET /crypto/{symbol}`
#[utoipa::path(get, path = "/crypto/{symbol}", tag = "Crypto",
    responses((status = 200, description = "Symbol/USD rate", body = String)))]
pub async fn crypto_plain(State(state): State<AppState>, Path(symbol): Path<String>) -> String {
    state.exchange.crypto_message(&symbol, "usd", false).await
}

/// `GET /crypto/{symbol}/{debug}`
#[utoipa::path(get, path = "/crypto/{symbol}/{debug}", tag = "Crypto",
    responses((status = 200, description = "Symbol/USD rate or raw payload", body = String)))]
pub async fn crypto(
    State(state): State<AppState>,
    Path((symbol, debug)): Path<(String, String)>,
) -> String {
    state
        .exchange
        .crypto_message(&symbol, "usd", is_debug(&debug))
        .await
}

/// `GET /crypto_wc/{symbol}/{currency}/{debug}`
#[utoipa::path(get, path = "/crypto_wc/{symbol}/{currency}/{debug}", tag = "Crypto",
    responses((status = 200, description = "Symbol/currency rate", body = String)))]
pub async fn crypto_wc(
    State(state): State<AppState>,
    Path((symbol, currency, debug)): Path<(String, String, String)>,
) -> String {
    state
        .exchange
        .crypto_message(&symbol, &currency, is_debug(&debug))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_literal_one_selects_debug() {
        assert!(is_debug("1"));
        assert!(!is_debug("0"));
        assert!(!is_debug("2"));
        assert!(!is_debug("true"));
        assert!(!is_debug(""));
    }
}
