//! # models::signal
//!
//! The inbound alert. [`AlertPayload`] is the raw JSON exactly as the charting
//! tool sends it (every field optional so we can answer with a useful 400);
//! [`TradeSignal`] is the validated form the handler works with.
//!
//! ```json
//! { "ticker": "BTCUSD", "action": "buy", "quantity": 0.002 }
//! ```

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{symbol::TickerError, AssetPair, Side};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertPayload {
    #[serde(default)]
    pub ticker:   Option<String>,
    #[serde(default)]
    pub action:   Option<String>,
    /// Optional explicit order size in asset units; accepts `0.5` or `"0.5"`
    #[serde(default)]
    pub quantity: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid action")]
    InvalidAction(String),

    #[error(transparent)]
    Ticker(#[from] TickerError),

    #[error("Quantity must be greater than zero")]
    InvalidQuantity,
}

/// A validated trade alert.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeSignal {
    pub pair:     AssetPair,
    pub side:     Side,
    pub quantity: Option<Decimal>,
}

impl TryFrom<AlertPayload> for TradeSignal {
    type Error = SignalError;

    fn try_from(payload: AlertPayload) -> Result<Self, Self::Error> {
        let present = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        let (Some(ticker), Some(action)) = (present(payload.ticker), present(payload.action)) else {
            return Err(SignalError::MissingFields);
        };

        let side = match action.to_lowercase().as_str() {
            "buy" => Side::Buy,
            "sell" => Side::Sell,
            _ => return Err(SignalError::InvalidAction(action)),
        };

        if payload.quantity.is_some_and(|q| q <= Decimal::ZERO) {
            return Err(SignalError::InvalidQuantity);
        }

        Ok(Self {
            pair: ticker.parse()?,
            side,
            quantity: payload.quantity,
        })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
