use std::sync::Arc;

use crate::analysis::extract::TextExtractor;
use crate::config::Config;
use crate::webhook_client::WebhookClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub webhook: WebhookClient,
    /// Pluggable `bytes → text` backend. Default: pdf-extract.
    pub extractor: Arc<dyn TextExtractor>,
}
