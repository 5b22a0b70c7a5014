//! HTTP status endpoint client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::StatusCheckConfig;

use super::types::{StatusCheckClient, StatusCheckError, StatusReport};

/// Fetches `{ "status": ... }` documents from status endpoints.
///
/// Also understands the status-page shape `{ "status": { "indicator": ... } }`.
pub struct HttpStatusChecker {
    client: Client,
    base_url: Option<String>,
}

impl HttpStatusChecker {
    pub fn new(config: StatusCheckConfig) -> Result<Self, StatusCheckError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| StatusCheckError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    /// Absolute URL for `endpoint`.
    fn resolve(&self, endpoint: &str) -> Result<String, StatusCheckError> {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return Ok(endpoint.to_string());
        }
        match &self.base_url {
            Some(base) => Ok(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                endpoint.trim_start_matches('/')
            )),
            None => Err(StatusCheckError::InvalidEndpoint(format!(
                "relative endpoint {} without base_url",
                endpoint
            ))),
        }
    }
}

/// Status string from a response body.
fn parse_status(body: &Value) -> Result<StatusReport, StatusCheckError> {
    let status = match body.get("status") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Object(obj)) => obj
            .get("indicator")
            .or_else(|| obj.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };
    status
        .map(|status| StatusReport { status })
        .ok_or_else(|| StatusCheckError::InvalidResponse("missing status field".to_string()))
}

#[async_trait]
impl StatusCheckClient for HttpStatusChecker {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_status(&self, endpoint: &str) -> Result<StatusReport, StatusCheckError> {
        let url = self.resolve(endpoint)?;
        debug!(url = %url, "Fetching status");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                StatusCheckError::Timeout
            } else {
                StatusCheckError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatusCheckError::HttpStatus(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StatusCheckError::InvalidResponse(e.to_string()))?;
        parse_status(&body)
    }
}
