/// Webhook Client — the single point of entry for calls to the N8N scoring workflow.
///
/// No other module posts to the webhook directly. One request per analysis,
/// no retries: a failed call surfaces straight to the caller.
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("N8N_WEBHOOK_URL not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The workflow answered with a non-success status; body kept for relaying.
    #[error("Webhook returned status {status}")]
    Status { status: u16, body: Value },
}

/// A successful webhook answer.
#[derive(Debug, Clone)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: Value,
}

#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    endpoint: Option<String>,
}

impl WebhookClient {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> Result<Self, WebhookError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
        })
    }

    /// The configured webhook URL.
    pub fn endpoint(&self) -> Result<&str, WebhookError> {
        self.endpoint.as_deref().ok_or(WebhookError::NotConfigured)
    }

    /// POSTs `payload` as JSON and hands back the status and body.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<WebhookResponse, WebhookError> {
        let endpoint = self.endpoint()?;

        let response = self.client.post(endpoint).json(payload).send().await?;

        let status = response.status();
        let text = response.text().await?;
        let body = parse_body(text);

        if !status.is_success() {
            warn!("Webhook returned {status}");
            return Err(WebhookError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Webhook call succeeded with {status}");
        Ok(WebhookResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Workflows normally answer JSON; anything else is relayed as a JSON string.
fn parse_body(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/webhook")
    }

    fn client(endpoint: Option<String>) -> WebhookClient {
        WebhookClient::new(endpoint, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_parse_body_json() {
        assert_eq!(parse_body("{\"a\":1}".to_string()), json!({ "a": 1 }));
    }

    #[test]
    fn test_parse_body_plain_text() {
        assert_eq!(
            parse_body("Workflow was started".to_string()),
            json!("Workflow was started")
        );
    }

    #[tokio::test]
    async fn test_post_without_endpoint_is_not_configured() {
        let err = client(None).post(&json!({})).await.unwrap_err();
        assert!(matches!(err, WebhookError::NotConfigured));
        assert_eq!(err.to_string(), "N8N_WEBHOOK_URL not configured");
    }

    #[tokio::test]
    async fn test_post_echoes_success_body() {
        let url = serve(Router::new().route(
            "/webhook",
            post(|Json(body): Json<Value>| async move {
                Json(json!([{ "json": { "echo": body["resume_text"] } }]))
            }),
        ))
        .await;

        let response = client(Some(url))
            .post(&json!({ "resume_text": "hello" }))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!([{ "json": { "echo": "hello" } }]));
    }

    #[tokio::test]
    async fn test_post_keeps_error_status_and_body() {
        let url = serve(Router::new().route(
            "/webhook",
            post(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "error": "rate limited" })),
                )
            }),
        ))
        .await;

        match client(Some(url)).post(&json!({})).await {
            Err(WebhookError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, json!({ "error": "rate limited" }));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
