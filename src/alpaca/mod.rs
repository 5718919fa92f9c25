//! # alpaca
//!
//! Thin REST client for the two Alpaca APIs the webhook touches: the trading
//! API (account, positions, orders) and the crypto market-data API.
//!
//! The `reqwest::Client` is built once with the auth headers and the request
//! timeout baked in, then shared (cheap `Clone`, connection pooling) by every
//! handler through [`crate::state::AppState`].

pub mod account;
pub mod market;

use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::BrokerConfig;

pub const KEY_ID_HEADER: &str = "APCA-API-KEY-ID";
pub const SECRET_KEY_HEADER: &str = "APCA-API-SECRET-KEY";

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Failure talking to Alpaca. Always surfaced to the caller, never defaulted
/// to a zero balance.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{context}: request failed: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source:  reqwest::Error,
    },

    #[error("{context}: HTTP {status}: {body}")]
    Status {
        context: &'static str,
        status:  StatusCode,
        body:    String,
    },

    #[error("{context}: unexpected payload: {detail}")]
    Payload {
        context: &'static str,
        detail:  String,
    },

    #[error("price quote for {symbol} is stale ({age_secs}s old)")]
    StaleQuote { symbol: String, age_secs: i64 },
}

// ─── Client ───────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AlpacaClient {
    http:   reqwest::Client,
    config: BrokerConfig,
}

impl AlpacaClient {
    pub fn new(config: BrokerConfig, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();

        let mut key_id = HeaderValue::from_str(&config.key_id)
            .context("ALPACA_API_KEY is not a valid header value")?;
        key_id.set_sensitive(true);
        let mut secret = HeaderValue::from_str(&config.secret_key)
            .context("ALPACA_SECRET_KEY is not a valid header value")?;
        secret.set_sensitive(true);

        headers.insert(KEY_ID_HEADER, key_id);
        headers.insert(SECRET_KEY_HEADER, secret);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, config })
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn trading_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.trading_url)
    }

    pub(crate) fn data_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.data_url)
    }

    /// Send a prepared request and decode a 2xx JSON body into `T`.
    pub(crate) async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        context: &'static str,
    ) -> Result<T, UpstreamError> {
        let response = request
            .send()
            .await
            .map_err(|source| UpstreamError::Transport { context, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { context, status, body });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport { context, source })?;

        debug!(context, bytes = bytes.len(), "Alpaca response received");

        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Payload {
            context,
            detail: e.to_string(),
        })
    }
}

// ─── Test Helpers ─────────────────────────────────────────────────────────────
