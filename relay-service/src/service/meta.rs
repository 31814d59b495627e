//! Meta Conversion API client.
//!
//! `EventSink` is the seam the handlers talk to; the production
//! implementation posts to the Graph API events endpoint. Upstream
//! rejections come back as `RelayError::MetaApiError` with Meta's own
//! message so the storefront can see why an event bounced.

use async_trait::async_trait;
use log::{debug, error, info};
use relay_core::domain::conversion::ConversionEvent;
use relay_core::RelayError;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Destination for built conversion events.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn send_event(&self, event: ConversionEvent) -> Result<serde_json::Value, RelayError>;
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    error: Option<GraphError>,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: Option<String>,
}

pub struct MetaConversionClient {
    http: Client,
    events_url: String,
    access_token: String,
    /// Only attached outside production.
    test_event_code: Option<String>,
}

impl MetaConversionClient {
    pub fn new(http: Client, events_url: String, access_token: String, test_event_code: Option<String>) -> Self {
        Self { http, events_url, access_token, test_event_code }
    }
}

#[async_trait]
impl EventSink for MetaConversionClient {
    async fn send_event(&self, event: ConversionEvent) -> Result<serde_json::Value, RelayError> {
        let event_name = event.event_name;
        let mut payload = json!({
            "data": [event],
            "access_token": self.access_token,
        });
        if let Some(code) = self.test_event_code.as_deref() {
            payload["test_event_code"] = json!(code);
        }

        debug!("forwarding conversion event event={} url={}", event_name, self.events_url);
        let response = self
            .http
            .post(&self.events_url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| RelayError::HttpError(err.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|err| RelayError::HttpError(err.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GraphErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("http_status={} body={}", status, body));
            error!("conversion event rejected event={} status={} message={}", event_name, status, message);
            return Err(RelayError::MetaApiError(message));
        }

        let data: serde_json::Value = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
        info!("conversion event accepted event={}", event_name);
        Ok(data)
    }
}
