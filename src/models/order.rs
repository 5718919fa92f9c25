//! # models::order
//!
//! [`OrderRequest`] is the exact JSON body posted to Alpaca `/v2/orders`.
//! Orders are always quantity-based market orders, good-till-cancelled.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::AssetPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    Gtc,
}

/// Payload sent to Alpaca `POST /v2/orders`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    pub symbol:        String,
    /// Serialised as a decimal string, e.g. `"0.01"`
    pub qty:           Decimal,
    pub side:          Side,
    #[serde(rename = "type")]
    pub order_type:    OrderType,
    pub time_in_force: TimeInForce,
}

impl OrderRequest {
    /// Market/GTC order for `qty` units of `pair`. Returns `None` unless `qty > 0`.
    pub fn market(pair: &AssetPair, side: Side, qty: Decimal) -> Option<Self> {
        if qty <= Decimal::ZERO {
            return None;
        }

        Some(Self {
            symbol: pair.to_string(),
            qty: qty.normalize(),
            side,
            order_type: OrderType::Market,
            time_in_force: TimeInForce::Gtc,
        })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn btc() -> AssetPair {
        "BTC/USD".parse().unwrap()
    }

    #[test]
    fn test_wire_format() {
        let order = OrderRequest::market(&btc(), Side::Buy, dec!(0.010000)).unwrap();
        let body = serde_json::to_value(&order).unwrap();
        assert_eq!(
            body,
            json!({
                "symbol":        "BTC/USD",
                "qty":           "0.01",
                "side":          "buy",
                "type":          "market",
                "time_in_force": "gtc",
            })
        );
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        assert!(OrderRequest::market(&btc(), Side::Sell, Decimal::ZERO).is_none());
        assert!(OrderRequest::market(&btc(), Side::Sell, dec!(-1)).is_none());
    }
}
