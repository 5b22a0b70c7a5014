//! Collaborator contracts used by automated checks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Query descriptor handed to the ticket system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TicketQuery {
    /// Query string (JQL). `None` asks for the most recently updated tickets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl TicketQuery {
    pub fn new(query: Option<String>) -> Self {
        Self { query }
    }
}

/// Errors from the ticket system.
#[derive(Debug, Clone, Error)]
pub enum TicketQueryError {
    #[error("Ticket system not configured")]
    NotConfigured,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Ticket system returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Ticket system collaborator.
///
/// Returned tickets are raw JSON objects exposing at least a status, either
/// flat (`"status": "Done"`) or nested (`"fields": {"status": {"name": "Done"}}`).
#[async_trait]
pub trait TicketQueryClient: Send + Sync {
    /// Name of this backend (for logging).
    fn name(&self) -> &str;

    async fn query_tickets(&self, query: &TicketQuery) -> Result<Vec<Value>, TicketQueryError>;
}

/// Status reported by a status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusReport {
    pub status: String,
}

/// Errors from a status endpoint.
#[derive(Debug, Clone, Error)]
pub enum StatusCheckError {
    #[error("Status checker not configured")]
    NotConfigured,

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Endpoint returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Generic status-check collaborator.
#[async_trait]
pub trait StatusCheckClient: Send + Sync {
    /// Name of this backend (for logging).
    fn name(&self) -> &str;

    async fn fetch_status(&self, endpoint: &str) -> Result<StatusReport, StatusCheckError>;
}

/// Outcome of an automated check. Failures are folded into `complete = false`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckVerdict {
    pub complete: bool,
}

impl CheckVerdict {
    pub fn complete() -> Self {
        Self { complete: true }
    }

    pub fn incomplete() -> Self {
        Self { complete: false }
    }
}
