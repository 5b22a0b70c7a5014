//! Mock ticket query collaborator for testing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::resolver::{TicketQuery, TicketQueryClient, TicketQueryError};

/// Mock implementation of the TicketQueryClient trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable tickets
/// - Record queries for assertions
/// - Simulate failures and latency
///
/// # Example
///
/// ```rust,ignore
/// use shipready_core::testing::MockTicketQuery;
///
/// let tickets = MockTicketQuery::new();
/// tickets.set_tickets(vec![json!({"status": "Done"})]).await;
/// tickets.set_next_error(TicketQueryError::Timeout).await;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTicketQuery {
    tickets: Arc<RwLock<Vec<Value>>>,
    queries: Arc<RwLock<Vec<TicketQuery>>>,
    next_error: Arc<RwLock<Option<TicketQueryError>>>,
    fail_always: Arc<RwLock<Option<TicketQueryError>>>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockTicketQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tickets returned by every query.
    pub async fn set_tickets(&self, tickets: Vec<Value>) {
        *self.tickets.write().await = tickets;
    }

    /// Fail the next query only.
    pub async fn set_next_error(&self, error: TicketQueryError) {
        *self.next_error.write().await = Some(error);
    }

    /// Fail every query until cleared with `None`.
    pub async fn set_fail_always(&self, error: Option<TicketQueryError>) {
        *self.fail_always.write().await = error;
    }

    /// Delay every response.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write().await = delay;
    }

    pub async fn recorded_queries(&self) -> Vec<TicketQuery> {
        self.queries.read().await.clone()
    }
}

#[async_trait]
impl TicketQueryClient for MockTicketQuery {
    fn name(&self) -> &str {
        "mock"
    }

    async fn query_tickets(&self, query: &TicketQuery) -> Result<Vec<Value>, TicketQueryError> {
        self.queries.write().await.push(query.clone());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        if let Some(error) = self.fail_always.read().await.clone() {
            return Err(error);
        }
        Ok(self.tickets.read().await.clone())
    }
}
