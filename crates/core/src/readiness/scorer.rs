//! Scoring formulas for ticket groups and release readiness.

use chrono::{DateTime, Utc};

use crate::tickets::{ExternalTicket, Severity};

/// Open external tickets at which the ticket pressure score bottoms out.
pub const OPEN_TICKET_CEILING: f64 = 10.0;

/// Weight of checklist completion in the combined score.
pub const PREP_WEIGHT: f64 = 0.6;

/// Weight of open-ticket pressure in the combined score.
pub const TICKET_WEIGHT: f64 = 0.4;

/// Percentage of done tickets; an empty group is complete.
pub fn group_progress(tickets: &[ExternalTicket]) -> u8 {
    if tickets.is_empty() {
        return 100;
    }
    let done = tickets.iter().filter(|t| t.is_done()).count();
    (100.0 * done as f64 / tickets.len() as f64).round() as u8
}

/// Composite 0-100 risk from the open subset of a group.
///
/// ```text
/// open      40 * open / total
/// severity  min(30, 15 * critical + 5 * high)
/// blockers  min(20, 10 * blockers)
/// stale     min(10, 2 * stale)
/// ```
pub fn group_risk_score(tickets: &[ExternalTicket], now: DateTime<Utc>) -> u8 {
    if tickets.is_empty() {
        return 0;
    }

    let open: Vec<&ExternalTicket> = tickets.iter().filter(|t| !t.is_done()).collect();
    let critical = open
        .iter()
        .filter(|t| t.effective_severity() == Severity::Critical)
        .count() as f64;
    let high = open
        .iter()
        .filter(|t| t.effective_severity() == Severity::High)
        .count() as f64;
    let blockers = open.iter().filter(|t| t.is_blocker()).count() as f64;
    let stale = open.iter().filter(|t| t.is_stale(now)).count() as f64;

    let open_component = 40.0 * (open.len() as f64 / tickets.len() as f64);
    let severity_component = (15.0 * critical + 5.0 * high).min(30.0);
    let blocker_component = (10.0 * blockers).min(20.0);
    let stale_component = (2.0 * stale).min(10.0);

    (open_component + severity_component + blocker_component + stale_component)
        .min(100.0)
        .round() as u8
}

/// Score for open external tickets: 5 points per ticket, floored at 0.
pub fn open_ticket_score(open_external: usize) -> f64 {
    (100.0 - 50.0 * open_external as f64 / OPEN_TICKET_CEILING).max(0.0)
}

/// Checklist completion percentage; no items counts as complete.
pub fn prep_score(prep_completed: usize, prep_total: usize) -> f64 {
    if prep_total == 0 {
        return 100.0;
    }
    100.0 * prep_completed as f64 / prep_total as f64
}

/// 60% checklist, 40% open-ticket pressure.
pub fn combined_readiness_score(
    open_external: usize,
    prep_completed: usize,
    prep_total: usize,
) -> u8 {
    let combined = PREP_WEIGHT * prep_score(prep_completed, prep_total)
        + TICKET_WEIGHT * open_ticket_score(open_external);
    combined.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use chrono::Duration;

    #[test]
    fn test_combined_score_examples() {
        assert_eq!(combined_readiness_score(0, 10, 10), 100);
        assert_eq!(combined_readiness_score(0, 5, 10), 70);
        assert_eq!(combined_readiness_score(5, 10, 10), 90);
        assert_eq!(combined_readiness_score(3, 1, 2), 64);
    }

    #[test]
    fn test_open_ticket_score_floors_at_zero() {
        assert_eq!(open_ticket_score(20), 0.0);
        assert_eq!(open_ticket_score(50), 0.0);
        assert_eq!(combined_readiness_score(50, 0, 10), 0);
    }

    #[test]
    fn test_empty_checklist_counts_as_complete() {
        assert_eq!(prep_score(0, 0), 100.0);
        assert_eq!(combined_readiness_score(0, 0, 0), 100);
    }

    #[test]
    fn test_group_progress() {
        assert_eq!(group_progress(&[]), 100);

        let tickets = vec![
            fixtures::ticket_with_status("A-1", "Done"),
            fixtures::ticket_with_status("A-2", "In Progress"),
            fixtures::ticket_with_status("A-3", "Open"),
        ];
        assert_eq!(group_progress(&tickets), 33);
    }

    #[test]
    fn test_risk_zero_when_empty_or_all_done() {
        let now = Utc::now();
        assert_eq!(group_risk_score(&[], now), 0);

        let mut done = fixtures::ticket_with_status("A-1", "Closed");
        done.severity = Severity::Critical;
        done.timestamp = now - Duration::days(30);
        let tickets = vec![done, fixtures::ticket_with_status("A-2", "Resolved")];
        assert_eq!(group_risk_score(&tickets, now), 0);
    }

    #[test]
    fn test_risk_components() {
        let now = Utc::now();
        let mut critical = fixtures::ticket_with_status("A-1", "Open");
        critical.severity = Severity::Critical;
        let mut high = fixtures::ticket_with_status("A-2", "Open");
        high.severity = Severity::High;
        let done = fixtures::ticket_with_status("A-3", "Done");
        let blocker = fixtures::ticket_with_payload(
            "A-4",
            serde_json::json!({"status": "Open", "priority": "Blocker"}),
        );

        // open 40*3/4=30, severity 15+5=20, blocker 10, stale 0
        let tickets = vec![critical, high, done, blocker];
        assert_eq!(group_risk_score(&tickets, now), 60);
    }

    #[test]
    fn test_risk_components_are_capped() {
        let now = Utc::now();
        let tickets: Vec<ExternalTicket> = (0..10)
            .map(|i| {
                let mut t = fixtures::ticket_with_payload(
                    &format!("A-{}", i),
                    serde_json::json!({"status": "Open", "priority": "Blocker"}),
                );
                t.severity = Severity::Critical;
                t.timestamp = now - Duration::days(10);
                t
            })
            .collect();
        // 40 + 30 + 20 + 10
        assert_eq!(group_risk_score(&tickets, now), 100);
    }

    #[test]
    fn test_stale_component() {
        let now = Utc::now();
        let mut stale = fixtures::ticket_with_status("A-1", "Open");
        stale.timestamp = now - Duration::days(8);
        let done = fixtures::ticket_with_status("A-2", "Done");
        // open 20, stale 2
        assert_eq!(group_risk_score(&[stale, done], now), 22);
    }
}
