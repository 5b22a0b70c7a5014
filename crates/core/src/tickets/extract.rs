//! Attribute extraction with ordered fallbacks.
//!
//! Ticket payloads come from several systems and rarely agree on shape, so
//! every lookup checks the top level first and then the Jira-style `fields`
//! object. No step fails: a missing value falls through to the next step and
//! ultimately to a named default.

use std::collections::HashMap;

use serde_json::Value;

use crate::config::GroupingConfig;

use super::types::ExternalTicket;

/// Service name used when no step yields a value.
pub const OTHER_SERVICE: &str = "Other";

/// Epic key used when no step yields a value.
pub const NO_EPIC: &str = "No Epic";

/// Non-null value of `name` at the top level or under `fields`.
pub fn field<'a>(payload: &'a Value, name: &str) -> Option<&'a Value> {
    payload
        .get(name)
        .filter(|v| !v.is_null())
        .or_else(|| {
            payload
                .get("fields")
                .and_then(|f| f.get(name))
                .filter(|v| !v.is_null())
        })
}

/// A non-empty string, or the first non-empty string among `keys` of an object.
pub fn named(value: &Value, keys: &[&str]) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Object(map) => keys
            .iter()
            .filter_map(|k| map.get(*k))
            .find_map(|v| v.as_str().and_then(non_empty)),
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Status name, either a flat string or a status object.
pub fn ticket_status(payload: &Value) -> Option<String> {
    field(payload, "status").and_then(|s| named(s, &["name", "value"]))
}

/// Epic key: `epic` → `parent.key` → custom epic field → "No Epic".
pub fn epic_key(ticket: &ExternalTicket, config: &GroupingConfig) -> String {
    let payload = &ticket.payload;
    field(payload, "epic")
        .and_then(|e| named(e, &["key"]))
        .or_else(|| field(payload, "parent").and_then(|p| named(p, &["key"])))
        .or_else(|| field(payload, &config.epic_field).and_then(|e| named(e, &["key", "value"])))
        .unwrap_or_else(|| NO_EPIC.to_string())
}

/// Service: first service tag → first component → custom service field →
/// project key → "Other".
pub fn service_name(ticket: &ExternalTicket, config: &GroupingConfig) -> String {
    let payload = &ticket.payload;
    ticket
        .service_tags
        .first()
        .and_then(|t| non_empty(t))
        .or_else(|| {
            field(payload, "components")
                .and_then(Value::as_array)
                .and_then(|c| c.first())
                .and_then(|c| named(c, &["name"]))
        })
        .or_else(|| {
            field(payload, &config.service_field).and_then(|s| named(s, &["value", "name"]))
        })
        .or_else(|| field(payload, "project").and_then(|p| named(p, &["key"])))
        .unwrap_or_else(|| OTHER_SERVICE.to_string())
}

/// Team: own team field → epic's team field → epic's assignee → service.
///
/// The epic is looked up by key in `index`.
pub fn team_name(
    ticket: &ExternalTicket,
    index: &TicketIndex<'_>,
    config: &GroupingConfig,
) -> String {
    if let Some(team) = own_team(ticket, config) {
        return team;
    }

    let epic_key = epic_key(ticket, config);
    if epic_key != NO_EPIC {
        if let Some(epic) = index.get(epic_key.as_str()) {
            if let Some(team) = own_team(epic, config) {
                return team;
            }
            if let Some(assignee) =
                field(&epic.payload, "assignee").and_then(|a| named(a, &["displayName", "name"]))
            {
                return assignee;
            }
        }
    }

    service_name(ticket, config)
}

fn own_team(ticket: &ExternalTicket, config: &GroupingConfig) -> Option<String> {
    field(&ticket.payload, "team")
        .or_else(|| field(&ticket.payload, &config.team_field))
        .and_then(|t| named(t, &["name", "value"]))
}

/// Tickets by [`ExternalTicket::key`].
pub type TicketIndex<'a> = HashMap<&'a str, &'a ExternalTicket>;

/// Index `all` by key; the first ticket wins on duplicate keys.
pub fn index_by_key(all: &[ExternalTicket]) -> TicketIndex<'_> {
    let mut index = HashMap::with_capacity(all.len());
    for ticket in all {
        index.entry(ticket.key()).or_insert(ticket);
    }
    index
}
