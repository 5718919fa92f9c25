//! # routes::health

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::state::SharedState;

/// `GET /health` — liveness plus which Alpaca environment we trade against.
/// Does not call Alpaca.
pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    let broker = &state.config.broker;

    Json(json!({
        "ok":          true,
        "paper":       broker.paper,
        "trading_url": broker.trading_url,
    }))
}
