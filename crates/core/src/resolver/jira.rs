//! Jira ticket query client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::JiraConfig;

use super::types::{TicketQuery, TicketQueryClient, TicketQueryError};

/// Query used when a check carries no query of its own.
const DEFAULT_JQL: &str = "ORDER BY updated DESC";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<Value>,
}

/// Runs JQL searches against the Jira REST API.
pub struct JiraClient {
    client: Client,
    config: JiraConfig,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self, TicketQueryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| TicketQueryError::ConnectionFailed(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn search_url(&self) -> String {
        format!("{}/rest/api/2/search", self.config.url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TicketQueryClient for JiraClient {
    fn name(&self) -> &str {
        "jira"
    }

    async fn query_tickets(&self, query: &TicketQuery) -> Result<Vec<Value>, TicketQueryError> {
        let jql = query
            .query
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .unwrap_or(DEFAULT_JQL);
        debug!(jql = jql, "Querying Jira");

        let mut request = self.client.get(self.search_url()).query(&[
            ("jql", jql.to_string()),
            ("maxResults", self.config.max_results.to_string()),
            ("fields", "status,summary".to_string()),
        ]);
        if !self.config.email.is_empty() || !self.config.api_token.is_empty() {
            request = request.basic_auth(&self.config.email, Some(&self.config.api_token));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TicketQueryError::Timeout
            } else {
                TicketQueryError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TicketQueryError::HttpStatus(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| TicketQueryError::InvalidResponse(e.to_string()))?;
        Ok(body.issues)
    }
}
