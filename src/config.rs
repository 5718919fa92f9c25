//! # config — อ่าน Config จาก Environment Variables
//!
//! Built once in `main` and handed to [`crate::state::AppState`]; nothing reads
//! the environment after startup.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};

pub const LIVE_TRADING_URL: &str = "https://api.alpaca.markets";
pub const PAPER_TRADING_URL: &str = "https://paper-api.alpaca.markets";
pub const DEFAULT_DATA_URL: &str = "https://data.alpaca.markets";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:10000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

// ─── Broker ───────────────────────────────────────────────────────────────────

/// Base URLs + static credentials for the Alpaca REST APIs.
#[derive(Clone)]
pub struct BrokerConfig {
    /// Trading API (account, positions, orders)
    pub trading_url: String,
    /// Market-data API (latest trades)
    pub data_url:    String,
    /// `APCA-API-KEY-ID`
    pub key_id:      String,
    /// `APCA-API-SECRET-KEY`
    pub secret_key:  String,
    pub paper:       bool,
}

impl fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerConfig")
            .field("trading_url", &self.trading_url)
            .field("data_url", &self.data_url)
            .field("key_id", &redact(&self.key_id))
            .field("secret_key", &"***")
            .field("paper", &self.paper)
            .finish()
    }
}

fn redact(value: &str) -> String {
    let shown: String = value.chars().take(4).collect();
    format!("{shown}***")
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Config ทั้งหมดที่ service ต้องการ
#[derive(Clone)]
pub struct Config {
    pub bind_addr:       SocketAddr,
    pub broker:          BrokerConfig,
    /// Timeout applied to every outbound brokerage call
    pub http_timeout:    Duration,
    /// Reject latest-trade quotes older than this. `None` = no freshness check.
    pub quote_max_age:   Option<Duration>,
    /// When set, inbound requests must send a matching `X-API-Key` header
    pub webhook_api_key: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("broker", &self.broker)
            .field("http_timeout", &self.http_timeout)
            .field("quote_max_age", &self.quote_max_age)
            .field("webhook_api_key", &self.webhook_api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key → value source (the environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty strings count as unset (common with docker `-e VAR=`)
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let key_id = get("ALPACA_API_KEY")
            .context("ALPACA_API_KEY environment variable is required")?;
        let secret_key = get("ALPACA_SECRET_KEY")
            .context("ALPACA_SECRET_KEY environment variable is required")?;

        let paper = match get("ALPACA_PAPER").map(|v| v.to_lowercase()) {
            None => false,
            Some(v) => match v.as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => bail!("ALPACA_PAPER must be true/false, got '{other}'"),
            },
        };

        let trading_url = get("ALPACA_BASE_URL").unwrap_or_else(|| {
            if paper { PAPER_TRADING_URL } else { LIVE_TRADING_URL }.to_string()
        });
        let data_url = get("ALPACA_DATA_URL").unwrap_or_else(|| DEFAULT_DATA_URL.to_string());

        let timeout_secs: u64 = match get("HTTP_TIMEOUT_SECS") {
            Some(v) => v.parse().context("HTTP_TIMEOUT_SECS must be a number")?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            bail!("HTTP_TIMEOUT_SECS must be greater than zero");
        }

        let quote_max_age = match get("QUOTE_MAX_AGE_SECS") {
            Some(v) => Some(Duration::from_secs(
                v.parse().context("QUOTE_MAX_AGE_SECS must be a number")?,
            )),
            None => None,
        };

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address, e.g. 0.0.0.0:10000")?;

        Ok(Self {
            bind_addr,
            broker: BrokerConfig {
                trading_url: trading_url.trim_end_matches('/').to_string(),
                data_url:    data_url.trim_end_matches('/').to_string(),
                key_id,
                secret_key,
                paper,
            },
            http_timeout: Duration::from_secs(timeout_secs),
            quote_max_age,
            webhook_api_key: get("WEBHOOK_API_KEY"),
        })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
