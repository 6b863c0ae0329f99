use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::analysis::extract::ExtractError;
use crate::normalize::NormalizationError;
use crate::webhook_client::WebhookError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),

    #[error("PDF parsing library unavailable: {0}")]
    Dependency(String),

    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    /// Non-success answer from the scoring webhook, relayed as-is.
    #[error("Webhook responded with status {status}")]
    Downstream { status: u16, body: Value },

    #[error("Normalization error: {0}")]
    Normalization(#[from] NormalizationError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<WebhookError> for AppError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::NotConfigured => {
                AppError::Configuration(WebhookError::NotConfigured.to_string())
            }
            WebhookError::Status { status, body } => AppError::Downstream { status, body },
            WebhookError::Http(e) => AppError::Internal(e.into()),
        }
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Unavailable(details) => AppError::Dependency(details),
            ExtractError::Parse(details) => AppError::Parse(details),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
            AppError::Dependency(details) => {
                tracing::error!("Failed to load pdf parsing library: {details}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Failed to load pdf parsing library",
                        "details": details
                    }),
                )
            }
            AppError::Parse(details) => {
                tracing::error!("Error parsing PDF: {details}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to parse PDF", "details": details }),
                )
            }
            AppError::Downstream { status, body } => {
                // Statuses outside 100..=999 cannot be relayed faithfully.
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, body)
            }
            AppError::Normalization(e) => {
                tracing::warn!("Normalization error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({
                        "error": "Failed to normalize analysis result",
                        "details": e.to_string()
                    }),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error", "details": e.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
