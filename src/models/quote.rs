//! # models::quote
//!
//! Latest-trade payload from the Alpaca crypto data API and the
//! [`PriceQuote`] derived from it.
//!
//! ```json
//! { "trades": { "BTC/USD": { "p": 50000.0, "s": 0.01, "t": "2024-05-01T12:00:00.123Z" } } }
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LatestTradesResponse {
    pub trades: HashMap<String, LatestTrade>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestTrade {
    /// Trade price
    pub p: Decimal,
    /// Trade timestamp
    #[serde(default)]
    pub t: Option<DateTime<Utc>>,
}

/// The price the sizer uses, stamped with when we fetched it.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub symbol:     String,
    pub price:      Decimal,
    pub fetched_at: DateTime<Utc>,
    /// Exchange timestamp of the trade, when Alpaca sends one
    pub traded_at:  Option<DateTime<Utc>>,
}

impl PriceQuote {
    /// Age of the underlying trade relative to `fetched_at`. `None` when the
    /// payload had no timestamp.
    pub fn age(&self) -> Option<chrono::Duration> {
        self.traded_at.map(|t| self.fetched_at.signed_duration_since(t))
    }
}
