//! Testing utilities and mock collaborators.
//!
//! Mocks stand in for the ticket system and status endpoints so the prep
//! store and resolver can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use shipready_core::testing::{ManualClock, MockStatusCheck, MockTicketQuery};
//!
//! let tickets = MockTicketQuery::new();
//! let status = MockStatusCheck::new();
//! status.set_status("/api/v2/status.json", "none").await;
//!
//! let clock = ManualClock::fixed();
//! clock.advance(chrono::Duration::hours(2));
//! ```

mod manual_clock;
mod mock_status_check;
mod mock_ticket_query;

pub use manual_clock::ManualClock;
pub use mock_status_check::MockStatusCheck;
pub use mock_ticket_query::MockTicketQuery;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::{json, Value};

    use crate::prep::{AutomatedCheck, PrepCatalog, PrepItemDefinition, Resolver};
    use crate::tickets::{ExternalTicket, Severity};

    /// Fixed instant shared by time-sensitive tests.
    pub fn reference_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// Ticket whose payload carries only a key.
    pub fn ticket(key: &str) -> ExternalTicket {
        ticket_with_payload(key, json!({}))
    }

    /// Ticket with a flat `status` in its payload.
    pub fn ticket_with_status(key: &str, status: &str) -> ExternalTicket {
        ticket_with_payload(key, json!({ "status": status }))
    }

    /// Ticket with the given payload. `key` is inserted unless already present.
    pub fn ticket_with_payload(key: &str, payload: Value) -> ExternalTicket {
        let mut payload = match payload {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        payload
            .entry("key")
            .or_insert_with(|| Value::String(key.to_string()));

        ExternalTicket {
            id: format!("evt-{}", key.to_lowercase()),
            timestamp: Utc::now(),
            source: "jira".to_string(),
            event_type: "ticket".to_string(),
            severity: Severity::Info,
            resolved: false,
            payload: Value::Object(payload),
            service_tags: Vec::new(),
        }
    }

    /// Manual prep item definition.
    pub fn manual_definition(id: &str) -> PrepItemDefinition {
        PrepItemDefinition {
            id: id.to_string(),
            label: format!("Prep {}", id),
            description: String::new(),
            resolver: Resolver::Manual,
            deadline: None,
        }
    }

    /// Prep item definition backed by a ticket query.
    pub fn jira_definition(id: &str, query: &str) -> PrepItemDefinition {
        PrepItemDefinition {
            resolver: Resolver::Automated {
                automated_check: AutomatedCheck::jira_ticket(query),
            },
            ..manual_definition(id)
        }
    }

    /// Prep item definition backed by a status endpoint.
    pub fn api_definition(id: &str, endpoint: &str, expected_status: &str) -> PrepItemDefinition {
        PrepItemDefinition {
            resolver: Resolver::Automated {
                automated_check: AutomatedCheck::api_check(endpoint, expected_status),
            },
            ..manual_definition(id)
        }
    }

    /// Catalog with one item per resolver flavor: `manual`, `jira`, `api`.
    pub fn mixed_catalog() -> PrepCatalog {
        PrepCatalog::new(vec![
            manual_definition("manual"),
            jira_definition("jira", "labels = release-blocker"),
            api_definition("api", "/status", "green"),
        ])
    }
}
