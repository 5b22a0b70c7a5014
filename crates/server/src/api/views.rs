//! Release view API handlers.
//!
//! A view keeps the at-risk review ticker running while it is open.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::ErrorResponse;
use crate::state::AppState;

/// Response for opening a view
#[derive(Debug, Serialize)]
pub struct OpenViewResponse {
    pub id: String,
    pub review_interval_secs: u64,
}

/// Open a release view
pub async fn open_view(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<OpenViewResponse>) {
    let id = state.open_view().await;
    (
        StatusCode::CREATED,
        Json(OpenViewResponse {
            id,
            review_interval_secs: state.review_interval().as_secs(),
        }),
    )
}

/// Close a release view
pub async fn close_view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ErrorResponse> {
    if state.close_view(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ErrorResponse::not_found(format!("View not found: {}", id)))
    }
}
