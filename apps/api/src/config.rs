use anyhow::{Context, Result};

use crate::analysis::payload::ForwardMode;

/// 10 MB, the upload cap the scorer front-end has always advertised.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
///
/// `N8N_WEBHOOK_URL` is optional at startup. An unset webhook surfaces per
/// request as a configuration error.
#[derive(Debug, Clone)]
pub struct Config {
    pub webhook_url: Option<String>,
    pub forward_mode: ForwardMode,
    pub max_upload_bytes: usize,
    pub webhook_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            webhook_url: optional_env("N8N_WEBHOOK_URL"),
            forward_mode: optional_env("FORWARD_MODE")
                .map(|v| v.parse::<ForwardMode>())
                .transpose()
                .context("FORWARD_MODE must be 'text' or 'base64'")?
                .unwrap_or_default(),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            webhook_timeout_secs: parse_env("WEBHOOK_TIMEOUT_SECS", 120)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            webhook_url: None,
            forward_mode: ForwardMode::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            webhook_timeout_secs: 120,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

/// Blank values count as unset, so `N8N_WEBHOOK_URL=` in a `.env` file behaves
/// the same as leaving it out.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
