//! # state
//!
//! Shared, read-only application state: the startup config and the pooled
//! Alpaca client. Nothing in here changes between requests.

use std::sync::Arc;

use crate::alpaca::AlpacaClient;
use crate::config::Config;

/// Top-level shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub alpaca: AlpacaClient,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let alpaca = AlpacaClient::new(config.broker.clone(), config.http_timeout)?;
        Ok(Self { config: Arc::new(config), alpaca })
    }
}

/// Convenience type alias
pub type SharedState = Arc<AppState>;

pub fn build_state(config: Config) -> anyhow::Result<SharedState> {
    Ok(Arc::new(AppState::new(config)?))
}
