//! HTTP surface: router assembly + handlers.

pub mod health;
pub mod webhook;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{auth::require_api_key, state::SharedState};

/// Build the Axum router. Shared by `main` and the handler tests.
pub fn router(state: SharedState) -> Router {
    Router::new()
        // ── Alerts ────────────────────────────────────────────────────────────
        .route("/webhook", post(webhook::handle_webhook))
        // ── Ops ───────────────────────────────────────────────────────────────
        .route("/health",  get(health::health_check))
        // ── Middleware ────────────────────────────────────────────────────────
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
