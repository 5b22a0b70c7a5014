//! Prep item API handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shipready_core::{PrepError, PrepItem, PrepSummary, ToggleOutcome};
use std::sync::Arc;
use tracing::debug;

use super::ErrorResponse;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for listing prep items
#[derive(Debug, Serialize)]
pub struct ListPrepItemsResponse {
    pub items: Vec<PrepItem>,
    pub summary: PrepSummary,
    /// Ids waiting for manual confirmation
    pub pending_confirmations: Vec<String>,
}

/// Response for a completion toggle
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub outcome: ToggleOutcome,
    pub item: PrepItem,
}

/// Request body for setting a deadline
#[derive(Debug, Deserialize)]
pub struct SetDeadlineBody {
    /// `null` clears the deadline
    pub deadline: Option<DateTime<Utc>>,
}

/// Response for an at-risk review
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub changed: bool,
}

impl From<PrepError> for ErrorResponse {
    fn from(e: PrepError) -> Self {
        match e {
            PrepError::NotFound(id) => {
                ErrorResponse::not_found(format!("Prep item not found: {}", id))
            }
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// List prep items with their summary
pub async fn list_prep_items(State(state): State<Arc<AppState>>) -> Json<ListPrepItemsResponse> {
    let store = state.store();
    let items = store.items().await;
    Json(ListPrepItemsResponse {
        summary: PrepSummary::from_items(&items),
        items,
        pending_confirmations: store.pending_confirmations().await,
    })
}

/// Get a prep item by ID
pub async fn get_prep_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PrepItem>, ErrorResponse> {
    state
        .store()
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ErrorResponse::from(PrepError::NotFound(id)))
}

/// Toggle completion; automated items run their check first
pub async fn toggle_complete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ToggleResponse>, ErrorResponse> {
    let outcome = state.store().toggle_complete(&id).await?;
    debug!(item_id = %id, outcome = ?outcome, "Toggled prep item");
    let item = current(&state, &id).await?;
    Ok(Json(ToggleResponse { outcome, item }))
}

/// Confirm completion of an item
pub async fn confirm_manual(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PrepItem>, ErrorResponse> {
    Ok(Json(state.store().confirm_manual(&id).await?))
}

/// Flip the user-set risk flag
pub async fn toggle_at_risk(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PrepItem>, ErrorResponse> {
    Ok(Json(state.store().toggle_at_risk(&id).await?))
}

/// Set or clear a deadline
pub async fn set_deadline(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SetDeadlineBody>,
) -> Result<Json<PrepItem>, ErrorResponse> {
    Ok(Json(state.store().set_deadline(&id, body.deadline).await?))
}

/// Run the at-risk review now
pub async fn review_at_risk(State(state): State<Arc<AppState>>) -> Json<ReviewResponse> {
    Json(ReviewResponse {
        changed: state.store().review_at_risk().await,
    })
}

async fn current(state: &AppState, id: &str) -> Result<PrepItem, ErrorResponse> {
    state
        .store()
        .get(id)
        .await
        .ok_or_else(|| ErrorResponse::from(PrepError::NotFound(id.to_string())))
}
