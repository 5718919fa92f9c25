//! # engine::sizer
//!
//! **Order Sizer** — turns an account snapshot + price into an order quantity.
//!
//! ## Policy
//! | Side | Quantity                                   | Rejected when                  |
//! |------|--------------------------------------------|--------------------------------|
//! | Buy  | `buying_power × 50% ÷ price`, 6 dp half-up | `buying_power ≤ $1`, price ≤ 0 |
//! | Sell | entire position, unrounded                 | `position < 0.0001`            |
//!
//! An explicit alert quantity replaces the computed one on either side. It is
//! rounded to 6 dp half-up first.
//!
//! Pure functions only: no I/O, no clock, same inputs → same output.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::models::{AccountSnapshot, AssetPair};

/// Share of buying power committed to a single buy
pub const BUY_FRACTION: Decimal = Decimal::from_parts(5, 0, 0, false, 1); // 0.5
/// Buys are refused at or below this much USD
pub const MIN_BUYING_POWER: Decimal = Decimal::ONE;
/// Sells are refused below this many units
pub const DUST_THRESHOLD: Decimal = Decimal::from_parts(1, 0, 0, false, 4); // 0.0001
/// Decimal places kept on computed quantities
pub const QTY_DECIMALS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizingError {
    /// Not enough quote currency to buy
    #[error("Insufficient {currency} balance")]
    InsufficientFunds { currency: String },

    /// Not enough of the asset to sell
    #[error("Insufficient {asset} balance")]
    InsufficientPosition { asset: String },

    #[error("{symbol} price unavailable")]
    PriceUnavailable { symbol: String },
}

/// Round half-up (midpoint away from zero) to [`QTY_DECIMALS`].
pub fn round_qty(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(QTY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Quantity of `pair` to buy with [`BUY_FRACTION`] of `buying_power`.
pub fn size_buy(
    pair: &AssetPair,
    buying_power: Decimal,
    price: Option<Decimal>,
) -> Result<Decimal, SizingError> {
    let insufficient = || SizingError::InsufficientFunds { currency: pair.quote().to_string() };

    if buying_power <= MIN_BUYING_POWER {
        return Err(insufficient());
    }

    let price = price
        .filter(|p| *p > Decimal::ZERO)
        .ok_or_else(|| SizingError::PriceUnavailable { symbol: pair.to_string() })?;

    let budget = buying_power * BUY_FRACTION;
    let qty = budget
        .checked_div(price)
        .map(round_qty)
        .ok_or_else(|| SizingError::PriceUnavailable { symbol: pair.to_string() })?;

    // A tiny budget against a large price can round down to nothing
    if qty <= Decimal::ZERO {
        return Err(insufficient());
    }

    Ok(qty)
}

/// Sell the whole position.
pub fn size_sell(pair: &AssetPair, position: Decimal) -> Result<Decimal, SizingError> {
    if position < DUST_THRESHOLD {
        return Err(SizingError::InsufficientPosition { asset: pair.base().to_string() });
    }

    Ok(position.normalize())
}

/// Apply the policy for the snapshot's side, then swap in an explicit
/// quantity from the alert. The explicit quantity is rounded like a computed
/// one and must be affordable (buy) or held (sell).
pub fn size_order(
    pair: &AssetPair,
    account: &AccountSnapshot,
    price: Option<Decimal>,
    requested: Option<Decimal>,
) -> Result<Decimal, SizingError> {
    match *account {
        AccountSnapshot::BuyingPower(buying_power) => {
            let computed = size_buy(pair, buying_power, price)?;
            let Some(qty) = requested.map(round_qty) else { return Ok(computed) };

            let insufficient = || SizingError::InsufficientFunds { currency: pair.quote().to_string() };

            // size_buy already proved the price is positive; overflow is unaffordable
            let cost = price.unwrap_or_default().checked_mul(qty).ok_or_else(insufficient)?;
            if qty <= Decimal::ZERO || cost > buying_power {
                return Err(insufficient());
            }
            Ok(qty)
        }
        AccountSnapshot::Position(position) => {
            let computed = size_sell(pair, position)?;
            let Some(qty) = requested.map(round_qty) else { return Ok(computed) };

            if qty <= Decimal::ZERO || qty > position {
                return Err(SizingError::InsufficientPosition { asset: pair.base().to_string() });
            }
            Ok(qty)
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
