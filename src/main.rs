//! # alpaca-webhook — Alert → Alpaca Market Order
//!
//! ```text
//!  ┌──────────────┐  POST /webhook   ┌──────────────────────────────┐
//!  │  Charting /  │ ───────────────▶ │ validate alert               │
//!  │  alert tool  │                  │ ├─ GET  /v2/account    (buy) │
//!  └──────────────┘  ◀── order JSON  │ ├─ GET  /v2/positions  (sell)│──▶ Alpaca
//!                                    │ ├─ GET  latest/trades  (buy) │
//!                                    │ ├─ size (50% / full sell)    │
//!                                    │ └─ POST /v2/orders           │
//!                                    └──────────────────────────────┘
//! ```
//!
//! ## Environment Variables
//!
//! | Variable             | Default                        | Description                        |
//! |----------------------|--------------------------------|------------------------------------|
//! | `ALPACA_API_KEY`     | —                              | Key id (required)                  |
//! | `ALPACA_SECRET_KEY`  | —                              | Secret (required)                  |
//! | `ALPACA_PAPER`       | `false`                        | Trade against the paper API        |
//! | `ALPACA_BASE_URL`    | live / paper URL               | Trading API override               |
//! | `ALPACA_DATA_URL`    | `https://data.alpaca.markets`  | Market-data API override           |
//! | `HTTP_TIMEOUT_SECS`  | `10`                           | Timeout on every Alpaca call       |
//! | `QUOTE_MAX_AGE_SECS` | unset                          | Reject older latest-trade prices   |
//! | `WEBHOOK_API_KEY`    | unset                          | Require `X-API-Key` on requests    |
//! | `BIND_ADDR`          | `0.0.0.0:10000`                | Address Axum listens on            |
//! | `RUST_LOG`           | `alpaca_webhook=debug`         | Tracing filter                     |

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod alpaca;
mod auth;
mod config;
mod engine;
mod error;
mod models;
mod routes;
mod state;

use config::Config;
use state::build_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env ──────────────────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging ─────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("alpaca_webhook=debug".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    // ── 3. Config ─────────────────────────────────────────────────────────────
    let config = Config::from_env().context("Failed to load config")?;
    let addr = config.bind_addr;

    info!(
        trading_url = %config.broker.trading_url,
        data_url    = %config.broker.data_url,
        paper       = config.broker.paper,
        timeout     = ?config.http_timeout,
        "Alpaca configured"
    );
    if !config.broker.paper {
        info!("⚠️ LIVE trading API — orders use real funds");
    }

    // ── 4. Shared state ───────────────────────────────────────────────────────
    let state = build_state(config)?;

    // ── 5. Router ─────────────────────────────────────────────────────────────
    let app = routes::router(state);

    // ── 6. Bind & Serve ───────────────────────────────────────────────────────
    info!(?addr, "🚀 Webhook server starting");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
