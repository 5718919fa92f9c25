//! # engine::executor
//!
//! **Order Submitter** — ยิง Market Order ไปที่ Alpaca `POST /v2/orders`
//!
//! Whatever Alpaca answers (accepted or rejected) comes back as a
//! [`BrokerResponse`] and is forwarded to the webhook caller untouched. Only a
//! transport failure (unreachable, timeout) is an error here.
//!
//! There is no idempotency key: submitting the same order twice places two
//! orders.

use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::alpaca::{AlpacaClient, UpstreamError};
use crate::models::OrderRequest;

/// Alpaca's answer to an order submission
#[derive(Debug, Clone, PartialEq)]
pub struct BrokerResponse {
    pub status: StatusCode,
    /// Alpaca's JSON body. A non-JSON body is wrapped as `{"error": "<text>"}`.
    pub body:   Value,
}

impl BrokerResponse {
    pub fn is_accepted(&self) -> bool {
        self.status.is_success()
    }

    /// Alpaca order id, present on accepted orders
    pub fn order_id(&self) -> Option<&str> {
        self.body.get("id").and_then(Value::as_str)
    }
}

/// ส่ง Order ไปที่ Alpaca และคืน Response ตามจริง
pub async fn submit_order(
    alpaca: &AlpacaClient,
    order: &OrderRequest,
) -> Result<BrokerResponse, UpstreamError> {
    let url = alpaca.trading_url("/v2/orders");

    info!(
        symbol = %order.symbol,
        side   = %order.side,
        qty    = %order.qty,
        url    = %url,
        "🚀 [EXECUTOR] Sending market order to Alpaca"
    );

    // ── HTTP POST ─────────────────────────────────────────────────────────────
    let response = alpaca
        .http()
        .post(&url)
        .json(order)
        .send()
        .await
        .map_err(|source| {
            error!(error = %source, "Alpaca unreachable");
            UpstreamError::Transport { context: "order", source }
        })?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|source| UpstreamError::Transport { context: "order", source })?;

    let body = serde_json::from_str(&text).unwrap_or_else(|_| json!({ "error": text }));
    let broker = BrokerResponse { status, body };

    if broker.is_accepted() {
        info!(
            http_status = %status,
            order_id    = broker.order_id().unwrap_or("unknown"),
            "✅ [EXECUTOR] Alpaca accepted order"
        );
    } else {
        warn!(
            http_status = %status,
            symbol      = %order.symbol,
            side        = %order.side,
            qty         = %order.qty,
            body        = %broker.body,
            "Alpaca rejected order"
        );
    }

    Ok(broker)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::alpaca::testing::client;
    use crate::models::{AssetPair, Side};

    fn order() -> OrderRequest {
        let pair: AssetPair = "BTC/USD".parse().unwrap();
        OrderRequest::market(&pair, Side::Buy, dec!(0.01)).unwrap()
    }

    #[tokio::test]
    async fn test_posts_market_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/orders"))
            .and(body_json(json!({
                "symbol": "BTC/USD",
                "qty": "0.01",
                "side": "buy",
                "type": "market",
                "time_in_force": "gtc",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "61e69015-8549-4bfd-b9c3-01e75843f47d",
                "status": "accepted",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = submit_order(&client(&server.uri()), &order()).await.unwrap();
        assert!(resp.is_accepted());
        assert_eq!(resp.order_id(), Some("61e69015-8549-4bfd-b9c3-01e75843f47d"));
    }

    #[tokio::test]
    async fn test_rejection_is_passed_through() {
        let server = MockServer::start().await;
        let rejection = json!({"code": 40310000, "message": "insufficient balance for USD"});
        Mock::given(method("POST"))
            .and(path("/v2/orders"))
            .respond_with(ResponseTemplate::new(403).set_body_json(rejection.clone()))
            .mount(&server)
            .await;

        let resp = submit_order(&client(&server.uri()), &order()).await.unwrap();
        assert_eq!(resp.status, StatusCode::FORBIDDEN);
        assert_eq!(resp.body, rejection);
        assert_eq!(resp.order_id(), None);
    }

    #[tokio::test]
    async fn test_non_json_body_is_wrapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/orders"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let resp = submit_order(&client(&server.uri()), &order()).await.unwrap();
        assert_eq!(resp.status, StatusCode::BAD_GATEWAY);
        assert_eq!(resp.body, json!({"error": "Bad Gateway"}));
    }

    #[tokio::test]
    async fn test_unreachable_broker_is_upstream_error() {
        // Nothing listens on port 9 (discard) in the test environment
        let alpaca = client("http://127.0.0.1:9");
        let err = submit_order(&alpaca, &order()).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Transport { .. }));
    }
}
