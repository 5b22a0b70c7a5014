use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, middleware::metrics_middleware, prep_items, readiness, views};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Prep checklist
        .route("/prep-items", get(prep_items::list_prep_items))
        .route("/prep-items/review", post(prep_items::review_at_risk))
        .route("/prep-items/{id}", get(prep_items::get_prep_item))
        .route("/prep-items/{id}/toggle", post(prep_items::toggle_complete))
        .route("/prep-items/{id}/confirm", post(prep_items::confirm_manual))
        .route("/prep-items/{id}/at-risk", post(prep_items::toggle_at_risk))
        .route("/prep-items/{id}/deadline", put(prep_items::set_deadline))
        // Scoring
        .route("/readiness", post(readiness::evaluate_readiness))
        .route("/groups", post(readiness::group_tickets))
        // Views
        .route("/views", post(views::open_view))
        .route("/views/{id}", delete(views::close_view))
        .with_state(Arc::clone(&state));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::get_metrics))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
