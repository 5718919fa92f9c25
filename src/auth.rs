//! # auth — API Key Middleware
//!
//! Optional static key on inbound requests.
//!
//! - `WEBHOOK_API_KEY` not set → **Allow All**
//! - `WEBHOOK_API_KEY` set → every request must send `X-API-Key: <key>`
//!
//! `/health` is always open.

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::state::SharedState;

pub const API_KEY_HEADER: &str = "X-API-Key";

pub async fn require_api_key(
    State(state): State<SharedState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.config.webhook_api_key.as_deref() else {
        return next.run(request).await;
    };

    let path = request.uri().path();
    if path == "/health" {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if provided == expected {
        next.run(request).await
    } else {
        warn!(path, "❌ Unauthorized request — invalid or missing X-API-Key");
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": "Unauthorized: invalid or missing X-API-Key header",
            })),
        )
            .into_response()
    }
}
