mod analysis;
mod config;
mod errors;
mod models;
mod normalize;
mod routes;
mod state;
mod webhook_client;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::extract::default_extractor;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::webhook_client::WebhookClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Scorer API v{}", env!("CARGO_PKG_VERSION"));

    match &config.webhook_url {
        Some(url) => info!("Scoring webhook: {url}"),
        None => warn!("N8N_WEBHOOK_URL is not set; analyze requests will fail until it is"),
    }
    info!(
        "Forward mode: {:?}, upload limit: {} bytes",
        config.forward_mode, config.max_upload_bytes
    );

    let webhook = WebhookClient::new(
        config.webhook_url.clone(),
        Duration::from_secs(config.webhook_timeout_secs),
    )?;

    let state = AppState {
        webhook,
        extractor: default_extractor(),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
