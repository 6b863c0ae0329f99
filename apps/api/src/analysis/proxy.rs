//! Proxy Handler — ships one uploaded résumé to the scoring webhook.
//!
//! Flow for a single request (nothing carries over between requests):
//!
//! ```text
//! DocumentReceived ─┬─ text mode ──▶ TextExtracted ──┐
//!                   └─ base64 mode ▶ PayloadEncoded ─┴─▶ Forwarded ─▶ Success
//!                                                                  ├▶ DownstreamError
//!                                                                  └▶ InternalError
//! ```

use tracing::info;

use crate::analysis::document::UploadedDocument;
use crate::analysis::payload::{ForwardMode, ForwardPayload};
use crate::errors::AppError;
use crate::state::AppState;
use crate::webhook_client::WebhookResponse;

/// Runs one document through the webhook.
///
/// `None` is the missing-upload case. The webhook URL is checked before any
/// extraction work so an unconfigured deployment fails fast.
pub async fn forward_document(
    state: &AppState,
    document: Option<UploadedDocument>,
) -> Result<WebhookResponse, AppError> {
    let document = document.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    info!(
        file_name = %document.file_name,
        media_type = %document.media_type,
        size = document.size(),
        "File received"
    );

    state.webhook.endpoint()?;

    let payload = build_payload(state, &document).await?;

    info!("Forwarding document to scoring webhook");
    let response = state.webhook.post(&payload).await?;
    info!(status = response.status, "Webhook responded");

    Ok(response)
}

async fn build_payload(
    state: &AppState,
    document: &UploadedDocument,
) -> Result<ForwardPayload, AppError> {
    match state.config.forward_mode {
        ForwardMode::Text => {
            let text = state
                .extractor
                .extract_text(document.content.clone())
                .await?;
            info!(chars = text.chars().count(), "CV text extracted");
            Ok(ForwardPayload::resume_text(text))
        }
        ForwardMode::Base64 => {
            let payload = ForwardPayload::encoded_file(document);
            info!("CV encoded as base64");
            Ok(payload)
        }
    }
}
