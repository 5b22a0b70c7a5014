//! Persisted prep item record.
//!
//! The record is a JSON array holding only the mutable overrides of each
//! item: `[{"id", "completed", "manualAtRisk", "deadline"?}]`. Everything
//! else is re-derived from the catalog on load.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::catalog::PrepCatalog;
use super::types::PrepItem;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedItem<'a> {
    id: &'a str,
    completed: bool,
    manual_at_risk: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    deadline: Option<String>,
}

/// Serialize the whole item list into the persisted record.
pub fn encode_record(items: &[PrepItem]) -> Result<String, serde_json::Error> {
    let persisted: Vec<PersistedItem<'_>> = items
        .iter()
        .map(|item| PersistedItem {
            id: &item.id,
            completed: item.completed,
            manual_at_risk: item.manual_at_risk,
            deadline: item.deadline.map(|d| d.to_rfc3339()),
        })
        .collect();
    serde_json::to_string(&persisted)
}

/// Merge a persisted record onto the catalog defaults and derive `at_risk`.
///
/// Unknown ids and malformed fields are skipped individually; a record that
/// is not a JSON array yields pure catalog defaults.
pub fn merge_record(
    catalog: &PrepCatalog,
    record: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<PrepItem> {
    let mut items = catalog.default_items();

    if let Some(raw) = record {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(entries)) => {
                for entry in &entries {
                    apply_entry(&mut items, entry);
                }
            }
            Ok(_) => warn!("Persisted prep record is not an array, using catalog defaults"),
            Err(e) => warn!(
                error = %e,
                "Persisted prep record is unparsable, using catalog defaults"
            ),
        }
    }

    for item in &mut items {
        item.refresh_at_risk(now);
    }
    items
}

fn apply_entry(items: &mut [PrepItem], entry: &Value) {
    let Some(id) = entry.get("id").and_then(Value::as_str) else {
        debug!("Skipping persisted prep entry without id");
        return;
    };
    let Some(item) = items.iter_mut().find(|i| i.id == id) else {
        debug!(item_id = id, "Skipping persisted prep entry not in catalog");
        return;
    };

    if let Some(completed) = entry.get("completed").and_then(Value::as_bool) {
        item.completed = completed;
    }
    if let Some(manual) = entry.get("manualAtRisk").and_then(Value::as_bool) {
        item.manual_at_risk = manual;
    }
    if let Some(raw) = entry.get("deadline").and_then(Value::as_str) {
        match DateTime::parse_from_rfc3339(raw) {
            Ok(deadline) => item.deadline = Some(deadline.with_timezone(&Utc)),
            Err(e) => debug!(item_id = id, error = %e, "Ignoring malformed persisted deadline"),
        }
    }
}
