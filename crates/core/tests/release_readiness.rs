//! Release readiness integration tests.
//!
//! Tickets arrive as activity-event JSON and are scored together with the
//! prep checklist through a release view.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use shipready_core::{
    testing::ManualClock, ExternalTicket, GroupMode, InMemoryPrepRepository, PrepCatalog,
    PrepItemStore, ReadinessBand, ReleaseView, ResolverEngine, StatusTone, TicketGrouper,
};

fn events() -> Vec<ExternalTicket> {
    serde_json::from_value(json!([
        {
            "id": "evt-1",
            "timestamp": "2026-10-18T09:00:00Z",
            "source": "jira",
            "type": "issue_updated",
            "serviceTags": ["payments"],
            "payload": {"key": "PAY-1", "status": "Done"}
        },
        {
            "id": "evt-2",
            "timestamp": "2026-10-18T10:00:00Z",
            "source": "jira",
            "type": "issue_updated",
            "severity": "critical",
            "serviceTags": ["payments"],
            "payload": {"key": "PAY-2", "fields": {"status": {"name": "In Progress"}}}
        },
        {
            "id": "evt-3",
            "timestamp": "2026-10-18T11:00:00Z",
            "source": "jira",
            "type": "issue_created",
            "payload": {"key": "SRCH-1", "status": "Open", "components": [{"name": "search"}]}
        },
        {
            "id": "evt-4",
            "timestamp": "2026-10-18T12:00:00Z",
            "source": "pagerduty",
            "type": "incident",
            "resolved": true,
            "payload": {"key": "INC-7"}
        }
    ]))
    .expect("events should deserialize")
}

async fn open_view() -> ReleaseView {
    let store = PrepItemStore::open(
        PrepCatalog::builtin(),
        Arc::new(InMemoryPrepRepository::new()),
        ResolverEngine::new(),
        Arc::new(ManualClock::fixed()),
    )
    .await;
    ReleaseView::open(
        Arc::new(store),
        TicketGrouper::default(),
        Duration::from_secs(60),
    )
}

#[tokio::test]
async fn test_readiness_combines_checklist_and_tickets() {
    let view = open_view().await;
    for id in ["release-notes", "qa-signoff", "rollback-plan"] {
        view.store().confirm_manual(id).await.unwrap();
    }

    let readiness = view.readiness(&events()).await;

    // 0.6 * 50 + 0.4 * (100 - 5 * 2)
    assert_eq!(readiness.prep_completed, 3);
    assert_eq!(readiness.prep_total, 6);
    assert_eq!(readiness.open_external, 2);
    assert_eq!(readiness.score, 66);
    assert_eq!(readiness.band, ReadinessBand::NeedsWork);
    assert_eq!(readiness.label, "Needs Work");
    assert_eq!(readiness.tone, StatusTone::Degraded);

    view.close().await;
}

#[tokio::test]
async fn test_fully_prepared_release_is_ready() {
    let view = open_view().await;
    let ids: Vec<String> = view
        .store()
        .items()
        .await
        .into_iter()
        .map(|i| i.id)
        .collect();
    for id in &ids {
        view.store().confirm_manual(id).await.unwrap();
    }

    let readiness = view.readiness(&[]).await;

    assert_eq!(readiness.score, 100);
    assert_eq!(readiness.band, ReadinessBand::Ready);
    assert_eq!(readiness.color, StatusTone::Healthy.color());

    view.close().await;
}

#[tokio::test]
async fn test_service_groups_sorted_by_risk() {
    let view = open_view().await;

    let groups = view.groups(&events(), GroupMode::Service);
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();

    // search: 40 open. payments: 20 open + 15 critical. Other: done only.
    assert_eq!(keys, vec!["search", "payments", "Other"]);
    assert_eq!(groups[0].risk_score, 40);
    assert_eq!(groups[0].progress, 0);
    assert_eq!(groups[1].risk_score, 35);
    assert_eq!(groups[1].progress, 50);
    assert_eq!(groups[2].risk_score, 0);
    assert_eq!(groups[2].progress, 100);

    view.close().await;
}
