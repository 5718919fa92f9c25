//! # alpaca::account
//!
//! Buying power and held quantity. Both are read fresh on every request.

use reqwest::StatusCode;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::{AlpacaClient, UpstreamError};
use crate::models::{
    account::{AccountResponse, PositionResponse},
    AccountSnapshot, AssetPair, Side,
};

impl AlpacaClient {
    /// `GET /v2/account` → `buying_power` in USD
    pub async fn buying_power(&self) -> Result<Decimal, UpstreamError> {
        let request = self.http().get(self.trading_url("/v2/account"));
        let account: AccountResponse = self.fetch_json(request, "account").await?;

        debug!(
            buying_power = %account.buying_power,
            currency     = account.currency.as_deref().unwrap_or("USD"),
            "Account fetched"
        );
        Ok(account.buying_power)
    }

    /// `GET /v2/positions/{BTCUSD}` → held quantity.
    ///
    /// Alpaca answers 404 when nothing is held; that is a real zero, not a
    /// failure. Short positions report a negative qty and count as zero here.
    pub async fn position(&self, pair: &AssetPair) -> Result<Decimal, UpstreamError> {
        let url = self.trading_url(&format!("/v2/positions/{}", pair.compact()));

        let response = self
            .http()
            .get(&url)
            .send()
            .await
            .map_err(|source| UpstreamError::Transport { context: "position", source })?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(symbol = %pair, "No open position");
            return Ok(Decimal::ZERO);
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { context: "position", status, body });
        }

        let position: PositionResponse = response.json().await.map_err(|e| UpstreamError::Payload {
            context: "position",
            detail:  e.to_string(),
        })?;

        debug!(
            symbol      = %position.symbol,
            qty         = %position.qty,
            asset_class = position.asset_class.as_deref().unwrap_or("unknown"),
            "Position fetched"
        );
        Ok(position.qty.max(Decimal::ZERO))
    }

    /// Only what `side` draws on: buying power for a buy, the held quantity
    /// for a sell. The other endpoint is never called.
    pub async fn account_snapshot(
        &self,
        pair: &AssetPair,
        side: Side,
    ) -> Result<AccountSnapshot, UpstreamError> {
        let snapshot = match side {
            Side::Buy => AccountSnapshot::BuyingPower(self.buying_power().await?),
            Side::Sell => AccountSnapshot::Position(self.position(pair).await?),
        };

        info!(symbol = %pair, %side, ?snapshot, "💰 Account snapshot");
        Ok(snapshot)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::alpaca::testing::{client, TEST_KEY_ID, TEST_SECRET};
    use crate::alpaca::UpstreamError;
    use crate::models::{AccountSnapshot, AssetPair, Side};

    fn btc() -> AssetPair {
        "BTC/USD".parse().unwrap()
    }

    #[tokio::test]
    async fn test_buying_power_sends_auth_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .and(header("APCA-API-KEY-ID", TEST_KEY_ID))
            .and(header("APCA-API-SECRET-KEY", TEST_SECRET))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"buying_power": "1000"})))
            .expect(1)
            .mount(&server)
            .await;

        let bp = client(&server.uri()).buying_power().await.unwrap();
        assert_eq!(bp, dec!(1000));
    }

    #[tokio::test]
    async fn test_account_failure_is_an_error_not_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = client(&server.uri()).buying_power().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status, .. } if status.as_u16() == 403));
    }

    #[tokio::test]
    async fn test_missing_position_is_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/positions/BTCUSD"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"code": 40410000, "message": "position does not exist"})),
            )
            .mount(&server)
            .await;

        let qty = client(&server.uri()).position(&btc()).await.unwrap();
        assert_eq!(qty, dec!(0));
    }

    #[tokio::test]
    async fn test_position_server_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/positions/BTCUSD"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(client(&server.uri()).position(&btc()).await.is_err());
    }

    async fn mount_account(server: &MockServer, response: ResponseTemplate, calls: u64) {
        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .respond_with(response)
            .expect(calls)
            .mount(server)
            .await;
    }

    async fn mount_position(server: &MockServer, response: ResponseTemplate, calls: u64) {
        Mock::given(method("GET"))
            .and(path("/v2/positions/BTCUSD"))
            .respond_with(response)
            .expect(calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_buy_snapshot_skips_positions() {
        let server = MockServer::start().await;
        mount_account(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"buying_power": "250.75"})),
            1,
        )
        .await;
        mount_position(&server, ResponseTemplate::new(500), 0).await;

        let snapshot = client(&server.uri()).account_snapshot(&btc(), Side::Buy).await.unwrap();
        assert_eq!(snapshot, AccountSnapshot::BuyingPower(dec!(250.75)));
    }

    #[tokio::test]
    async fn test_sell_snapshot_skips_account() {
        let server = MockServer::start().await;
        mount_account(&server, ResponseTemplate::new(500), 0).await;
        mount_position(
            &server,
            ResponseTemplate::new(200).set_body_json(
                json!({"symbol": "BTCUSD", "qty": "0.0042", "asset_class": "crypto"}),
            ),
            1,
        )
        .await;

        let snapshot = client(&server.uri()).account_snapshot(&btc(), Side::Sell).await.unwrap();
        assert_eq!(snapshot, AccountSnapshot::Position(dec!(0.0042)));
    }

    #[tokio::test]
    async fn test_slow_account_times_out() {
        let server = MockServer::start().await;
        mount_account(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!({"buying_power": "1000"}))
                .set_delay(Duration::from_secs(3)),
            1,
        )
        .await;

        // testing::client uses a 2s timeout
        let err = client(&server.uri()).buying_power().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Transport { .. }), "{err}");
    }
}
