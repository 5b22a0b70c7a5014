//! Resolver engine: interprets automated check descriptors.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::metrics;
use crate::prep::{AutomatedCheck, CheckKind, PrepItem};
use crate::tickets::extract;

use super::types::{
    CheckVerdict, StatusCheckClient, StatusCheckError, TicketQuery, TicketQueryClient,
    TicketQueryError,
};

/// Statuses that satisfy a `jira_ticket` check.
const JIRA_DONE_STATUSES: [&str; 2] = ["done", "closed"];

/// Runs the automated check of a prep item against the collaborators.
///
/// `check` never fails: anything that prevents a positive verdict (missing
/// collaborator, missing configuration, transport or parse errors) resolves
/// to `complete = false`, which sends the caller down the manual
/// confirmation path.
#[derive(Clone, Default)]
pub struct ResolverEngine {
    ticket_query: Option<Arc<dyn TicketQueryClient>>,
    status_check: Option<Arc<dyn StatusCheckClient>>,
}

impl std::fmt::Debug for ResolverEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverEngine")
            .field("ticket_query", &self.ticket_query.as_ref().map(|c| c.name()))
            .field("status_check", &self.status_check.as_ref().map(|c| c.name()))
            .finish()
    }
}

impl ResolverEngine {
    /// Engine with no collaborators: every automated check is incomplete.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticket_query(mut self, client: Arc<dyn TicketQueryClient>) -> Self {
        self.ticket_query = Some(client);
        self
    }

    pub fn with_status_check(mut self, client: Arc<dyn StatusCheckClient>) -> Self {
        self.status_check = Some(client);
        self
    }

    /// Verdict for `item`. Manual items are never complete automatically.
    pub async fn check(&self, item: &PrepItem) -> CheckVerdict {
        match item.resolver.automated_check() {
            Some(check) => {
                let verdict = self.evaluate(check).await;
                debug!(item_id = %item.id, complete = verdict.complete, "Automated check finished");
                verdict
            }
            None => CheckVerdict::incomplete(),
        }
    }

    /// Verdict for a bare check descriptor.
    pub async fn evaluate(&self, check: &AutomatedCheck) -> CheckVerdict {
        let result = match check.kind {
            CheckKind::JiraTicket => self.check_tickets(check).await,
            CheckKind::ApiCheck => self.check_status(check).await,
        };

        let (verdict, label) = match result {
            Ok(true) => (CheckVerdict::complete(), "complete"),
            Ok(false) => (CheckVerdict::incomplete(), "incomplete"),
            Err(reason) => {
                warn!(
                    kind = check.kind.as_str(),
                    reason = %reason,
                    "Automated check could not be evaluated"
                );
                (CheckVerdict::incomplete(), "error")
            }
        };
        metrics::RESOLVER_CHECKS
            .with_label_values(&[check.kind.as_str(), label])
            .inc();
        verdict
    }

    async fn check_tickets(&self, check: &AutomatedCheck) -> Result<bool, String> {
        let client = self
            .ticket_query
            .as_ref()
            .ok_or_else(|| TicketQueryError::NotConfigured.to_string())?;

        let query = TicketQuery::new(check.config.query.clone());
        let tickets = client
            .query_tickets(&query)
            .await
            .map_err(|e| format!("{}: {}", client.name(), e))?;

        Ok(tickets.iter().any(|ticket| {
            extract::ticket_status(ticket)
                .map(|s| JIRA_DONE_STATUSES.contains(&s.to_lowercase().as_str()))
                .unwrap_or(false)
        }))
    }

    async fn check_status(&self, check: &AutomatedCheck) -> Result<bool, String> {
        let client = self
            .status_check
            .as_ref()
            .ok_or_else(|| StatusCheckError::NotConfigured.to_string())?;
        let endpoint = check
            .config
            .endpoint
            .as_deref()
            .ok_or_else(|| "api_check has no endpoint".to_string())?;
        let expected = check
            .config
            .expected_status
            .as_deref()
            .ok_or_else(|| "api_check has no expected status".to_string())?;

        let report = client
            .fetch_status(endpoint)
            .await
            .map_err(|e| format!("{}: {}", client.name(), e))?;
        Ok(report.status == expected)
    }
}
