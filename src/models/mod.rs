//! Domain models shared across the webhook service.

pub mod account;
pub mod order;
pub mod quote;
pub mod signal;
pub mod symbol;

pub use account::AccountSnapshot;
pub use order::{OrderRequest, Side};
pub use quote::PriceQuote;
pub use signal::{AlertPayload, TradeSignal};
pub use symbol::AssetPair;
