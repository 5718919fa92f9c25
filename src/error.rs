//! # error
//!
//! Centralised application error type.
//!
//! Every handler returns `Result<_, AppError>`. Axum's `IntoResponse` impl
//! turns each variant into `{"error": "..."}` with the right status, except
//! [`AppError::OrderRejected`] which forwards Alpaca's status and body as-is.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::alpaca::UpstreamError;
use crate::engine::sizer::SizingError;
use crate::models::signal::SignalError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed alert fields.
    #[error("{0}")]
    BadRequest(String),

    /// Funds or position below the sizing threshold.
    #[error("{0}")]
    InsufficientResource(String),

    /// Account, position, price or order call failed before Alpaca answered.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Alpaca answered the order with a non-2xx status.
    #[error("Order rejected by broker (HTTP {status})")]
    OrderRejected { status: StatusCode, body: Value },

    /// Catch-all for unexpected failures.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SignalError> for AppError {
    fn from(err: SignalError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        AppError::UpstreamUnavailable(err.to_string())
    }
}

impl From<SizingError> for AppError {
    fn from(err: SizingError) -> Self {
        match err {
            SizingError::InsufficientFunds { .. } | SizingError::InsufficientPosition { .. } => {
                AppError::InsufficientResource(err.to_string())
            }
            SizingError::PriceUnavailable { .. } => AppError::UpstreamUnavailable(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InsufficientResource(msg) => (StatusCode::BAD_REQUEST, msg),
            err @ AppError::UpstreamUnavailable(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            AppError::OrderRejected { status, body } => return (status, Json(body)).into_response(),
            err @ AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let (status, body) = render(SignalError::MissingFields.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing required fields"}));

        let sizing = SizingError::InsufficientPosition { asset: "BTC".into() };
        let (status, body) = render(sizing.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Insufficient BTC balance"}));

        let sizing = SizingError::PriceUnavailable { symbol: "BTC/USD".into() };
        let (status, body) = render(sizing.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Upstream unavailable: BTC/USD price unavailable"}));
    }

    #[tokio::test]
    async fn test_order_rejection_is_verbatim() {
        let broker_body = json!({"code": 42210000, "message": "qty must be > 0"});
        let (status, body) = render(AppError::OrderRejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body:   broker_body.clone(),
        })
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, broker_body);
    }
}
