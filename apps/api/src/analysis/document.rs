use axum::extract::{multipart::MultipartRejection, Multipart};
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Multipart field that carries the résumé.
pub const FILE_FIELD: &str = "file";

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// A résumé file as received from the upload form. Lives for one request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub media_type: String,
    pub content: Bytes,
}

impl UploadedDocument {
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Pulls the `file` part out of the form, draining everything else.
///
/// Browsers submit an empty part (no file name, no bytes) when the picker was
/// left blank; that is treated the same as a missing part. A body that is not
/// `multipart/form-data` at all carries no file either.
pub async fn read_document(
    multipart: Result<Multipart, MultipartRejection>,
    max_bytes: usize,
) -> Result<Option<UploadedDocument>, AppError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!("Request is not a multipart upload: {}", rejection.body_text());
            return Ok(None);
        }
    };
    let mut document = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart form: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != FILE_FIELD || document.is_some() {
            debug!("Skipping multipart field '{name}'");
            field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid multipart form: {e}")))?;
            continue;
        }

        let file_name = field.file_name().unwrap_or("").to_string();
        let media_type = field
            .content_type()
            .unwrap_or(FALLBACK_MEDIA_TYPE)
            .to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;

        if file_name.is_empty() && content.is_empty() {
            continue;
        }

        if content.len() > max_bytes {
            return Err(AppError::Validation(format!(
                "File too large. Maximum size is {} bytes",
                max_bytes
            )));
        }

        document = Some(UploadedDocument {
            file_name,
            media_type,
            content,
        });
    }

    Ok(document)
}
