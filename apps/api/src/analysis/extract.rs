//! Text extraction capability: `bytes → text`.
//!
//! `AppState` holds an `Arc<dyn TextExtractor>`. The default backend is
//! `PdfTextExtractor` (pdf-extract, behind the `pdf-text` feature); builds
//! without that feature get `UnavailableExtractor`, which reports the parser
//! as missing so text-mode requests fail with a dependency error.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The parsing backend is missing or crashed.
    #[error("{0}")]
    Unavailable(String),

    /// The backend ran but could not read the document.
    #[error("{0}")]
    Parse(String),
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, content: Bytes) -> Result<String, ExtractError>;
}

#[cfg(feature = "pdf-text")]
pub use pdf::PdfTextExtractor;

#[cfg(feature = "pdf-text")]
mod pdf {
    use super::*;

    /// pdf-extract backend. Parsing is CPU-bound, so it runs on the blocking pool.
    pub struct PdfTextExtractor;

    #[async_trait]
    impl TextExtractor for PdfTextExtractor {
        async fn extract_text(&self, content: Bytes) -> Result<String, ExtractError> {
            run_blocking(move || pdf_extract::extract_text_from_mem(&content)).await
        }
    }
}

/// Runs a parser on the blocking pool. An error from the parser is a parse
/// failure; a panic (pdf-extract panics on some malformed inputs) means the
/// backend itself is unusable.
#[cfg_attr(not(feature = "pdf-text"), allow(dead_code))]
async fn run_blocking<F, E>(parse: F) -> Result<String, ExtractError>
where
    F: FnOnce() -> Result<String, E> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    tokio::task::spawn_blocking(parse)
        .await
        .map_err(|e| ExtractError::Unavailable(format!("pdf parser aborted: {e}")))?
        .map_err(|e| ExtractError::Parse(e.to_string()))
}

/// Stand-in used when the binary was built without a PDF backend.
#[cfg_attr(feature = "pdf-text", allow(dead_code))]
pub struct UnavailableExtractor;

#[async_trait]
impl TextExtractor for UnavailableExtractor {
    async fn extract_text(&self, _content: Bytes) -> Result<String, ExtractError> {
        Err(ExtractError::Unavailable(
            "binary built without the 'pdf-text' feature".to_string(),
        ))
    }
}

/// Backend selected at compile time.
pub fn default_extractor() -> std::sync::Arc<dyn TextExtractor> {
    #[cfg(feature = "pdf-text")]
    {
        std::sync::Arc::new(PdfTextExtractor)
    }
    #[cfg(not(feature = "pdf-text"))]
    {
        std::sync::Arc::new(UnavailableExtractor)
    }
}
