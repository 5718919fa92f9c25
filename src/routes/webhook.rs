//! # routes::webhook
//!
//! `POST /webhook` — the alert entry point.
//!
//! ```text
//! Received ──▶ Validated ──▶ Sized ──▶ Submitted ──▶ Responded
//!     │             │          │
//!     └─────────────┴──────────┴──▶ Rejected (400 / 500)
//! ```
//!
//! ### Request body (JSON)
//! ```json
//! { "ticker": "BTCUSD", "action": "buy", "quantity": 0.002 }
//! ```
//!
//! ### Response
//! * Alpaca's order JSON with Alpaca's status when the order is accepted
//! * Alpaca's status + body verbatim when Alpaca rejects the order
//! * `{ "error": "..." }` with 400 / 500 otherwise (see [`AppError`])

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, instrument, warn};

use crate::{
    engine::{executor::submit_order, sizer::size_order},
    error::AppError,
    models::{AlertPayload, OrderRequest, Side, TradeSignal},
    state::SharedState,
};

#[instrument(name = "webhook", skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn handle_webhook(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Response, AppError> {
    info!(body = %String::from_utf8_lossy(&body), "📩 Received webhook");

    // ── 1. Received → Validated ───────────────────────────────────────────────
    // Content-Type is not enforced; alerting tools often send text/plain
    let payload: AlertPayload = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "🚨 Webhook body is not valid JSON");
        AppError::BadRequest(format!("Invalid JSON body: {e}"))
    })?;

    let signal = TradeSignal::try_from(payload).map_err(|e| {
        warn!(error = ?e, "🚨 Invalid webhook payload");
        AppError::from(e)
    })?;

    let symbol = signal.pair.to_string();
    let side = signal.side;

    // ── 2. Account + price (only what this side needs) ───────────────────────────
    let account = state.alpaca.account_snapshot(&signal.pair, side).await.map_err(|e| {
        error!(symbol = %symbol, %side, error = %e, "❌ Account lookup failed");
        AppError::from(e)
    })?;

    let price = match side {
        Side::Buy => {
            let quote = state
                .alpaca
                .latest_price(&signal.pair, state.config.quote_max_age)
                .await
                .map_err(|e| {
                    error!(symbol = %symbol, %side, error = %e, "❌ Price lookup failed");
                    AppError::from(e)
                })?;
            Some(quote.price)
        }
        Side::Sell => None,
    };

    // ── 3. Validated → Sized ──────────────────────────────────────────────────
    let qty = size_order(&signal.pair, &account, price, signal.quantity).map_err(|e| {
        warn!(
            symbol = %symbol,
            %side,
            account      = ?account,
            price        = ?price,
            requested    = ?signal.quantity,
            reason       = %e,
            "🚨 Order sizing rejected"
        );
        AppError::from(e)
    })?;

    info!(
        symbol = %symbol,
        %side,
        %qty,
        account      = ?account,
        price        = ?price,
        "⚡ Order sized"
    );

    let order = OrderRequest::market(&signal.pair, side, qty)
        .ok_or_else(|| AppError::BadRequest(format!("Computed quantity {qty} is not positive")))?;

    // ── 4. Sized → Submitted ──────────────────────────────────────────────────
    let broker = submit_order(&state.alpaca, &order).await.map_err(|e| {
        error!(symbol = %symbol, %side, %qty, error = %e, "❌ Order submission failed");
        AppError::from(e)
    })?;

    // ── 5. Submitted → Responded ──────────────────────────────────────────────
    if broker.is_accepted() {
        Ok((broker.status, Json(broker.body)).into_response())
    } else {
        Err(AppError::OrderRejected {
            status: broker.status,
            body:   broker.body,
        })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
