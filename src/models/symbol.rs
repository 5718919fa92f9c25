//! # models::symbol
//!
//! [`AssetPair`] normalises whatever ticker the alerting tool sends
//! (`BTCUSD`, `BTC/USD`, `BTC-USD`, `COINBASE:BTCUSD`) into the two spellings
//! Alpaca expects: `BTC/USD` for market data and orders, `BTCUSD` for the
//! positions path.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Quote currencies we recognise, longest first so `USDT` wins over `USD`.
const QUOTE_CURRENCIES: [&str; 3] = ["USDT", "USDC", "USD"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported ticker: '{0}'")]
pub struct TickerError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetPair {
    base:  String,
    quote: String,
}

impl AssetPair {
    /// Asset being bought or sold, e.g. `BTC`
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Currency the asset is priced in, e.g. `USD`
    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// `BTCUSD` — the form used by `/v2/positions/{symbol}`
    pub fn compact(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl fmt::Display for AssetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for AssetPair {
    type Err = TickerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let err = || TickerError(raw.to_string());

        // TradingView sends `EXCHANGE:SYMBOL` when the alert uses {{ticker}} with a prefix
        let symbol = raw.rsplit(':').next().unwrap_or(raw).trim().to_uppercase();

        let (base, quote) = match symbol.split_once(['/', '-']) {
            Some((base, quote)) => (base.to_string(), quote.to_string()),
            None => {
                let quote = QUOTE_CURRENCIES
                    .iter()
                    .find(|q| symbol.len() > q.len() && symbol.ends_with(*q))
                    .ok_or_else(err)?;
                (symbol[..symbol.len() - quote.len()].to_string(), quote.to_string())
            }
        };

        let valid = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid(&base) || !QUOTE_CURRENCIES.contains(&quote.as_str()) {
            return Err(err());
        }

        Ok(Self { base, quote })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
