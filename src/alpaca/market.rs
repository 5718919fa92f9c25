//! # alpaca::market
//!
//! Latest traded price from the crypto market-data API.

use chrono::Utc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{AlpacaClient, UpstreamError};
use crate::models::{quote::LatestTradesResponse, AssetPair, PriceQuote};

const LATEST_TRADES_PATH: &str = "/v1beta3/crypto/us/latest/trades";

impl AlpacaClient {
    /// `GET /v1beta3/crypto/us/latest/trades?symbols=BTC/USD`
    ///
    /// With `max_age` set, a trade older than the window is rejected as
    /// [`UpstreamError::StaleQuote`]. A payload without a timestamp passes.
    pub async fn latest_price(
        &self,
        pair: &AssetPair,
        max_age: Option<Duration>,
    ) -> Result<PriceQuote, UpstreamError> {
        let symbol = pair.to_string();
        let request = self
            .http()
            .get(self.data_url(LATEST_TRADES_PATH))
            .query(&[("symbols", symbol.as_str())]);

        let mut resp: LatestTradesResponse = self.fetch_json(request, "latest trade").await?;

        let trade = resp.trades.remove(&symbol).ok_or_else(|| UpstreamError::Payload {
            context: "latest trade",
            detail:  format!("no trade for {symbol} in response"),
        })?;

        let quote = PriceQuote {
            symbol,
            price:      trade.p,
            fetched_at: Utc::now(),
            traded_at:  trade.t,
        };

        if let (Some(max_age), Some(age)) = (max_age, quote.age()) {
            let too_old = age.to_std().map(|age| age > max_age).unwrap_or(false);
            if too_old {
                warn!(symbol = %quote.symbol, age_secs = age.num_seconds(), "Stale price quote");
                return Err(UpstreamError::StaleQuote {
                    symbol:   quote.symbol,
                    age_secs: age.num_seconds(),
                });
            }
        }

        debug!(symbol = %quote.symbol, price = %quote.price, "Price fetched");
        Ok(quote)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::alpaca::testing::client;
    use crate::alpaca::UpstreamError;
    use crate::models::AssetPair;

    fn btc() -> AssetPair {
        "BTCUSD".parse().unwrap()
    }

    async fn serve_trade(server: &MockServer, body: serde_json::Value, status: u16) {
        Mock::given(method("GET"))
            .and(path("/v1beta3/crypto/us/latest/trades"))
            .and(query_param("symbols", "BTC/USD"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_latest_price() {
        let server = MockServer::start().await;
        serve_trade(&server, json!({"trades": {"BTC/USD": {"p": 50000, "s": 0.1}}}), 200).await;

        let quote = client(&server.uri()).latest_price(&btc(), None).await.unwrap();
        assert_eq!(quote.symbol, "BTC/USD");
        assert_eq!(quote.price, dec!(50000));
        assert!(quote.traded_at.is_none());
    }

    #[tokio::test]
    async fn test_non_success_is_upstream_error() {
        let server = MockServer::start().await;
        serve_trade(&server, json!({"message": "internal"}), 500).await;

        let err = client(&server.uri()).latest_price(&btc(), None).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status { .. }));
    }

    #[tokio::test]
    async fn test_missing_symbol_is_payload_error() {
        let server = MockServer::start().await;
        serve_trade(&server, json!({"trades": {}}), 200).await;

        let err = client(&server.uri()).latest_price(&btc(), None).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Payload { .. }));
    }

    #[tokio::test]
    async fn test_freshness_window() {
        let server = MockServer::start().await;
        let old = (Utc::now() - chrono::Duration::minutes(10)).to_rfc3339();
        serve_trade(&server, json!({"trades": {"BTC/USD": {"p": 50000, "t": old}}}), 200).await;

        let alpaca = client(&server.uri());
        // No window configured: old quotes still pass
        assert!(alpaca.latest_price(&btc(), None).await.is_ok());

        let err = alpaca
            .latest_price(&btc(), Some(Duration::from_secs(60)))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::StaleQuote { age_secs, .. } if age_secs >= 600));

        assert!(alpaca
            .latest_price(&btc(), Some(Duration::from_secs(3600)))
            .await
            .is_ok());
    }
}
