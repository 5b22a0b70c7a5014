//! Ticket grouping by epic, team, or service.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GroupingConfig;
use crate::readiness::{group_progress, group_risk_score};

use super::extract::{self, TicketIndex, NO_EPIC};
use super::types::ExternalTicket;

/// Dimension tickets are bucketed by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GroupMode {
    Epic,
    Team,
    Service,
}

/// A bucket of tickets sharing one grouping value, with its scores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketGroup {
    /// Extracted grouping value (epic key, team name, or service name).
    pub key: String,
    /// Display name: the epic summary when known, otherwise the key.
    pub name: String,
    pub tickets: Vec<ExternalTicket>,
    /// Percentage of done tickets (0-100).
    pub progress: u8,
    /// Composite risk (0-100).
    pub risk_score: u8,
    /// Epic release date, used to order epic groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<DateTime<Utc>>,
}

/// Classifies tickets into groups. Stateless apart from field configuration.
#[derive(Debug, Clone, Default)]
pub struct TicketGrouper {
    config: GroupingConfig,
}

impl TicketGrouper {
    pub fn new(config: GroupingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    /// Grouping value of `ticket` for `mode`; epics are looked up in `index`.
    pub fn classify(
        &self,
        ticket: &ExternalTicket,
        index: &TicketIndex<'_>,
        mode: GroupMode,
    ) -> String {
        match mode {
            GroupMode::Epic => extract::epic_key(ticket, &self.config),
            GroupMode::Team => extract::team_name(ticket, index, &self.config),
            GroupMode::Service => extract::service_name(ticket, &self.config),
        }
    }

    /// Bucket `tickets` by `mode`, score each bucket, and sort the result.
    pub fn group(
        &self,
        tickets: &[ExternalTicket],
        mode: GroupMode,
        now: DateTime<Utc>,
    ) -> Vec<TicketGroup> {
        let index = extract::index_by_key(tickets);
        let mut buckets: BTreeMap<String, Vec<ExternalTicket>> = BTreeMap::new();
        for ticket in tickets {
            let key = self.classify(ticket, &index, mode);
            buckets.entry(key).or_default().push(ticket.clone());
        }

        let mut groups: Vec<TicketGroup> = buckets
            .into_iter()
            .map(|(key, members)| {
                let epic = match mode {
                    GroupMode::Epic if key != NO_EPIC => index.get(key.as_str()).copied(),
                    _ => None,
                };
                let name = epic
                    .and_then(|e| extract::field(&e.payload, "summary"))
                    .and_then(|s| extract::named(s, &[]))
                    .unwrap_or_else(|| key.clone());
                let release_date = epic.and_then(epic_release_date);

                TicketGroup {
                    progress: group_progress(&members),
                    risk_score: group_risk_score(&members, now),
                    key,
                    name,
                    tickets: members,
                    release_date,
                }
            })
            .collect();

        sort_groups(&mut groups, mode);
        groups
    }
}

/// Highest risk first. Ties: name ascending for teams and services; release
/// date ascending (undated last) for epics, then name.
pub fn sort_groups(groups: &mut [TicketGroup], mode: GroupMode) {
    groups.sort_by(|a, b| {
        b.risk_score.cmp(&a.risk_score).then_with(|| match mode {
            GroupMode::Epic => compare_release_dates(a.release_date, b.release_date)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.key.cmp(&b.key)),
            GroupMode::Team | GroupMode::Service => {
                a.name.cmp(&b.name).then_with(|| a.key.cmp(&b.key))
            }
        })
    });
}

fn compare_release_dates(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// `releaseDate` → `duedate` → first fix version's `releaseDate`.
fn epic_release_date(epic: &ExternalTicket) -> Option<DateTime<Utc>> {
    let payload = &epic.payload;
    extract::field(payload, "releaseDate")
        .or_else(|| extract::field(payload, "duedate"))
        .or_else(|| {
            extract::field(payload, "fixVersions")
                .and_then(Value::as_array)
                .and_then(|v| v.first())
                .and_then(|v| v.get("releaseDate"))
        })
        .and_then(Value::as_str)
        .and_then(parse_date)
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use serde_json::json;

    fn group(name: &str, risk: u8) -> TicketGroup {
        TicketGroup {
            key: name.to_string(),
            name: name.to_string(),
            tickets: vec![],
            progress: 0,
            risk_score: risk,
            release_date: None,
        }
    }

    #[test]
    fn test_sort_by_risk_then_name() {
        let mut groups = vec![group("zeta", 40), group("alpha", 40), group("mid", 90)];
        sort_groups(&mut groups, GroupMode::Team);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["mid", "alpha", "zeta"]);
    }

    #[test]
    fn test_epic_sort_by_release_date() {
        let mut late = group("EPIC-A", 50);
        late.release_date = parse_date("2026-12-01");
        let mut early = group("EPIC-B", 50);
        early.release_date = parse_date("2026-11-01");
        let undated = group("EPIC-0", 50);

        let mut groups = vec![undated, late, early];
        sort_groups(&mut groups, GroupMode::Epic);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["EPIC-B", "EPIC-A", "EPIC-0"]);
    }

    #[test]
    fn test_group_by_epic_uses_parent_key() {
        let tickets = vec![
            fixtures::ticket_with_payload(
                "S-1",
                json!({"fields": {"parent": {"key": "EPIC-9"}, "status": {"name": "Open"}}}),
            ),
            fixtures::ticket_with_payload("S-2", json!({"epic": "EPIC-9", "status": "Done"})),
            fixtures::ticket_with_payload("S-3", json!({"status": "Open"})),
        ];

        let groups = TicketGrouper::default().group(&tickets, GroupMode::Epic, Utc::now());
        assert_eq!(groups.len(), 2);

        let epic = groups.iter().find(|g| g.key == "EPIC-9").unwrap();
        assert_eq!(epic.tickets.len(), 2);
        assert_eq!(epic.progress, 50);
        assert_eq!(epic.risk_score, 20);

        let none = groups.iter().find(|g| g.key == NO_EPIC).unwrap();
        assert_eq!(none.tickets.len(), 1);
        assert_eq!(none.risk_score, 40);
        assert_eq!(groups[0].key, NO_EPIC);
    }

    #[test]
    fn test_epic_group_name_and_release_date_from_epic_ticket() {
        let tickets = vec![
            fixtures::ticket_with_payload(
                "E-1",
                json!({
                    "key": "EPIC-1",
                    "status": "Done",
                    "fields": {"summary": "New checkout", "duedate": "2026-11-15"}
                }),
            ),
            fixtures::ticket_with_payload(
                "S-1",
                json!({"epic": {"key": "EPIC-1"}, "status": "Done"}),
            ),
        ];

        let groups = TicketGrouper::default().group(&tickets, GroupMode::Epic, Utc::now());
        let epic = groups.iter().find(|g| g.key == "EPIC-1").unwrap();
        assert_eq!(epic.name, "New checkout");
        assert_eq!(epic.release_date, parse_date("2026-11-15"));
    }

    #[test]
    fn test_group_by_service_defaults_to_other() {
        let mut tagged = fixtures::ticket_with_status("S-1", "Open");
        tagged.service_tags = vec!["payments".to_string()];
        let untagged = fixtures::ticket_with_status("S-2", "Open");

        let groups = TicketGrouper::default().group(
            &[tagged, untagged],
            GroupMode::Service,
            Utc::now(),
        );
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Other", "payments"]);
    }

    #[test]
    fn test_group_by_team_with_epic_fallback() {
        let tickets = vec![
            fixtures::ticket_with_payload(
                "E-1",
                json!({"key": "EPIC-1", "team": "Core", "status": "Open"}),
            ),
            fixtures::ticket_with_payload("S-1", json!({"epic": "EPIC-1", "status": "Open"})),
            fixtures::ticket_with_payload(
                "S-2",
                json!({"team": {"value": "Growth"}, "status": "Done"}),
            ),
        ];

        let groups = TicketGrouper::default().group(&tickets, GroupMode::Team, Utc::now());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Core");
        assert_eq!(groups[0].tickets.len(), 2);
        assert_eq!(groups[1].name, "Growth");
        assert_eq!(groups[1].risk_score, 0);
        assert_eq!(groups[1].progress, 100);
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        let groups = TicketGrouper::default().group(&[], GroupMode::Service, Utc::now());
        assert!(groups.is_empty());
    }
}
