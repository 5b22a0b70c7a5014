//! External ticket events consumed from the activity event store.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::extract;

/// Status substrings that mark a ticket as done.
pub const DONE_STATUS_MARKERS: [&str; 4] = ["done", "closed", "resolved", "completed"];

/// Tickets older than this many days are stale.
pub const STALE_AFTER_DAYS: i64 = 7;

/// Ticket severity as reported by the event source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case", from = "Value")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    #[default]
    Info,
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "critical" | "highest" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" | "lowest" => Severity::Low,
            _ => Severity::Info,
        }
    }
}

/// Anything other than a string (null, numbers, objects) reads as `Info`.
impl From<Value> for Severity {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Severity::from(s),
            _ => Severity::Info,
        }
    }
}

/// A ticket-like event from an external system (Jira, incident tracker, ...).
///
/// Read-only: nothing in this crate mutates events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalTicket {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub source: String,
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub resolved: bool,
    /// Source-specific fields; extraction tolerates any shape.
    #[serde(default)]
    pub payload: Value,
    #[serde(default, alias = "serviceTags")]
    pub service_tags: Vec<String>,
}

impl ExternalTicket {
    /// Ticket key (`payload.key`), falling back to the event id.
    pub fn key(&self) -> &str {
        self.payload
            .get("key")
            .and_then(Value::as_str)
            .filter(|k| !k.trim().is_empty())
            .unwrap_or(&self.id)
    }

    /// Status name from the payload, flat or nested.
    pub fn status(&self) -> Option<String> {
        extract::ticket_status(&self.payload)
    }

    /// Done when the status contains a done marker; without a status, the
    /// event's `resolved` flag decides.
    pub fn is_done(&self) -> bool {
        match self.status() {
            Some(status) => status_is_done(&status),
            None => self.resolved,
        }
    }

    /// Severity, upgraded from the payload priority when the event carries none.
    pub fn effective_severity(&self) -> Severity {
        if self.severity != Severity::Info {
            return self.severity;
        }
        match self.priority() {
            Some(priority) => Severity::from(priority),
            None => Severity::Info,
        }
    }

    /// Priority name from the payload.
    pub fn priority(&self) -> Option<String> {
        extract::field(&self.payload, "priority")
            .and_then(|p| extract::named(p, &["name", "value"]))
    }

    pub fn is_blocker(&self) -> bool {
        self.priority()
            .map(|p| p.eq_ignore_ascii_case("blocker"))
            .unwrap_or(false)
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now - self.timestamp > Duration::days(STALE_AFTER_DAYS)
    }
}

/// Case-insensitive match against [`DONE_STATUS_MARKERS`].
pub fn status_is_done(status: &str) -> bool {
    let status = status.to_lowercase();
    DONE_STATUS_MARKERS.iter().any(|m| status.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ticket(payload: Value) -> ExternalTicket {
        ExternalTicket {
            id: "evt-1".to_string(),
            timestamp: Utc::now(),
            source: "jira".to_string(),
            event_type: "issue".to_string(),
            severity: Severity::Info,
            resolved: false,
            payload,
            service_tags: vec![],
        }
    }

    #[test]
    fn test_status_is_done_markers() {
        assert!(status_is_done("Done"));
        assert!(status_is_done("CLOSED"));
        assert!(status_is_done("Resolved - Fixed"));
        assert!(status_is_done("completed"));
        assert!(!status_is_done("In Progress"));
        assert!(!status_is_done("Open"));
    }

    #[test]
    fn test_flat_and_nested_status() {
        assert!(ticket(json!({"status": "Done"})).is_done());
        assert!(ticket(json!({"status": {"name": "Closed"}})).is_done());
        assert!(ticket(json!({"fields": {"status": {"name": "Resolved"}}})).is_done());
        assert!(!ticket(json!({"fields": {"status": {"name": "In Review"}}})).is_done());
    }

    #[test]
    fn test_missing_status_uses_resolved_flag() {
        let mut t = ticket(Value::Null);
        assert!(!t.is_done());
        t.resolved = true;
        assert!(t.is_done());
    }

    #[test]
    fn test_key_falls_back_to_id() {
        assert_eq!(ticket(json!({"key": "REL-7"})).key(), "REL-7");
        assert_eq!(ticket(json!({})).key(), "evt-1");
    }

    #[test]
    fn test_severity_from_priority() {
        let t = ticket(json!({"fields": {"priority": {"name": "Highest"}}}));
        assert_eq!(t.effective_severity(), Severity::Critical);

        let mut t = ticket(json!({"priority": "Low"}));
        t.severity = Severity::High;
        assert_eq!(t.effective_severity(), Severity::High);
    }

    #[test]
    fn test_blocker_priority() {
        assert!(ticket(json!({"priority": "Blocker"})).is_blocker());
        assert!(ticket(json!({"fields": {"priority": {"name": "blocker"}}})).is_blocker());
        assert!(!ticket(json!({"priority": "High"})).is_blocker());
    }

    #[test]
    fn test_deserialize_event_shape() {
        let t: ExternalTicket = serde_json::from_value(json!({
            "id": "evt-9",
            "timestamp": "2026-10-01T10:00:00Z",
            "source": "jira",
            "type": "issue_updated",
            "severity": "CRITICAL",
            "resolved": false,
            "payload": {"key": "REL-9"},
            "serviceTags": ["payments"]
        }))
        .unwrap();
        assert_eq!(t.severity, Severity::Critical);
        assert_eq!(t.event_type, "issue_updated");
        assert_eq!(t.service_tags, vec!["payments".to_string()]);
    }

    #[test]
    fn test_malformed_severity_reads_as_info() {
        for severity in [json!(null), json!(3), json!({"level": "high"}), json!("urgent")] {
            let t: ExternalTicket = serde_json::from_value(json!({
                "id": "evt-10",
                "timestamp": "2026-10-01T10:00:00Z",
                "severity": severity,
            }))
            .unwrap();
            assert_eq!(t.severity, Severity::Info);
        }
    }

    #[test]
    fn test_staleness() {
        let now = Utc::now();
        let mut t = ticket(Value::Null);
        t.timestamp = now - Duration::days(8);
        assert!(t.is_stale(now));
        t.timestamp = now - Duration::days(6);
        assert!(!t.is_stale(now));
    }
}
