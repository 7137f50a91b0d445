// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Third-party data providers.
//!
//! Every upstream the gateway aggregates is consumed as an opaque HTTP
//! endpoint behind a typed client: exchange rates and crypto prices
//! ([`exchange`]), LLM completions ([`openai`]), the Auth0 management
//! API ([`auth0`]) and the Telegram error-report channel ([`telegram`]).

pub mod auth0;
pub mod exchange;
pub mod openai;
pub mod telegram;

pub use auth0::Auth0Client;
pub use exchange::{CrossPair, ExchangeClient};
pub use openai::{CompletionParams, OpenAiClient};
pub use telegram::TelegramReporter;
