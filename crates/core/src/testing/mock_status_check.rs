//! Mock status-check collaborator for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::resolver::{StatusCheckClient, StatusCheckError, StatusReport};

/// Mock implementation of the StatusCheckClient trait.
///
/// Endpoints without a configured status answer with HTTP 404.
#[derive(Debug, Clone, Default)]
pub struct MockStatusCheck {
    statuses: Arc<RwLock<HashMap<String, String>>>,
    endpoints: Arc<RwLock<Vec<String>>>,
    next_error: Arc<RwLock<Option<StatusCheckError>>>,
}

impl MockStatusCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_status(&self, endpoint: impl Into<String>, status: impl Into<String>) {
        self.statuses
            .write()
            .await
            .insert(endpoint.into(), status.into());
    }

    /// Fail the next request only.
    pub async fn set_next_error(&self, error: StatusCheckError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn recorded_endpoints(&self) -> Vec<String> {
        self.endpoints.read().await.clone()
    }
}

#[async_trait]
impl StatusCheckClient for MockStatusCheck {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_status(&self, endpoint: &str) -> Result<StatusReport, StatusCheckError> {
        self.endpoints.write().await.push(endpoint.to_string());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        self.statuses
            .read()
            .await
            .get(endpoint)
            .map(|status| StatusReport {
                status: status.clone(),
            })
            .ok_or(StatusCheckError::HttpStatus(404))
    }
}
