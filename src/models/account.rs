//! # models::account
//!
//! Wire types for Alpaca `/v2/account` and `/v2/positions/{symbol}`, plus the
//! [`AccountSnapshot`] the sizer consumes.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Subset of `GET /v2/account`. Alpaca sends amounts as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    pub buying_power: Decimal,
    #[serde(default)]
    pub currency:     Option<String>,
}

/// Subset of `GET /v2/positions/{symbol}`
#[derive(Debug, Clone, Deserialize)]
pub struct PositionResponse {
    pub symbol:      String,
    pub qty:         Decimal,
    #[serde(default)]
    pub asset_class: Option<String>,
}

/// The part of the account a trade draws on, read fresh for a single
/// request. Never cached. A buy only needs funds, a sell only the holding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccountSnapshot {
    /// USD available for new purchases
    BuyingPower(Decimal),
    /// Units of the asset held (≥ 0)
    Position(Decimal),
}
