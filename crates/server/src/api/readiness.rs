//! Readiness and grouping API handlers.
//!
//! Tickets are supplied by the caller; the server keeps no ticket state.

use axum::{extract::State, Json};
use serde::Deserialize;
use shipready_core::{ExternalTicket, GroupMode, ReleaseReadiness, TicketGroup};
use std::sync::Arc;

use crate::state::AppState;

/// Request body for scoring a release
#[derive(Debug, Deserialize)]
pub struct ReadinessBody {
    #[serde(default)]
    pub tickets: Vec<ExternalTicket>,
}

/// Request body for grouping tickets
#[derive(Debug, Deserialize)]
pub struct GroupsBody {
    pub mode: GroupMode,
    #[serde(default)]
    pub tickets: Vec<ExternalTicket>,
}

/// Combined readiness of the current checklist and the given tickets
pub async fn evaluate_readiness(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ReadinessBody>,
) -> Json<ReleaseReadiness> {
    let prep = state.store().summary().await;
    Json(ReleaseReadiness::evaluate(prep, &body.tickets))
}

/// Group tickets by epic, team, or service, riskiest first
pub async fn group_tickets(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GroupsBody>,
) -> Json<Vec<TicketGroup>> {
    Json(
        state
            .grouper()
            .group(&body.tickets, body.mode, state.store().now()),
    )
}
