//! Axum route handlers for the Analyze API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::analysis::document::read_document;
use crate::analysis::proxy::forward_document;
use crate::errors::AppError;
use crate::models::analysis::{AnalysisResult, ScoreReport};
use crate::normalize::normalize;
use crate::state::AppState;

/// POST /api/analyze
///
/// Relays the webhook's answer untouched, status code included.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let span = info_span!("analyze", request_id = %Uuid::new_v4());
    async move {
        let document = read_document(multipart, state.config.max_upload_bytes).await?;
        let response = forward_document(&state, document).await?;
        let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
        Ok::<_, AppError>((status, Json(response.body)).into_response())
    }
    .instrument(span)
    .await
}

/// POST /api/analyze/result
///
/// Same proxy, then normalizes the webhook's answer into a `ScoreReport`.
/// Webhook errors are still relayed as-is; only a successful but unusable
/// answer turns into a normalization error.
pub async fn handle_analyze_result(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ScoreReport>, AppError> {
    let span = info_span!("analyze_result", request_id = %Uuid::new_v4());
    async move {
        let document = read_document(multipart, state.config.max_upload_bytes).await?;
        let response = forward_document(&state, document).await?;

        let normalized = normalize(&response.body)?;
        let result = AnalysisResult::from_normalized(normalized)?;

        Ok::<_, AppError>(Json(ScoreReport::from(result)))
    }
    .instrument(span)
    .await
}
