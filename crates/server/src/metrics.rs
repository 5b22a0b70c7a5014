//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the server:
//! - HTTP request metrics (latency, counts)
//! - Prep checklist and view gauges (collected dynamically)
//! - Core resolver and store counters, see `shipready_core::metrics`

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use tracing::error;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "shipready_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shipready_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "shipready_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Prep Checklist Metrics (collected dynamically)
// =============================================================================

pub static PREP_ITEMS_TOTAL: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("shipready_prep_items", "Number of prep items in the catalog").unwrap()
});

pub static PREP_ITEMS_COMPLETED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("shipready_prep_items_completed", "Number of completed prep items").unwrap()
});

pub static PREP_ITEMS_AT_RISK: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("shipready_prep_items_at_risk", "Number of at-risk prep items").unwrap()
});

/// Open release views.
pub static VIEWS_OPEN: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("shipready_views_open", "Number of open release views").unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Prep checklist
    registry.register(Box::new(PREP_ITEMS_TOTAL.clone())).unwrap();
    registry
        .register(Box::new(PREP_ITEMS_COMPLETED.clone()))
        .unwrap();
    registry
        .register(Box::new(PREP_ITEMS_AT_RISK.clone()))
        .unwrap();
    registry.register(Box::new(VIEWS_OPEN.clone())).unwrap();

    // Core metrics (resolver, prep store, reviews)
    if let Err(e) = shipready_core::metrics::register_all(registry) {
        error!("Failed to register core metrics: {}", e);
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so gauges reflect the current checklist.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let summary = state.store().summary().await;
    PREP_ITEMS_TOTAL.set(summary.total as i64);
    PREP_ITEMS_COMPLETED.set(summary.completed as i64);
    PREP_ITEMS_AT_RISK.set(summary.at_risk as i64);
    VIEWS_OPEN.set(state.open_view_count().await as i64);
}

/// Normalize a path for metrics labels (replace ids with placeholders).
///
/// Used for requests that did not match a route; matched requests are
/// labelled with their route template.
pub fn normalize_path(path: &str) -> String {
    let uuid_regex = regex_lite::Regex::new(
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
    )
    .unwrap();
    let numeric_regex = regex_lite::Regex::new(r"/\d+(/|$)").unwrap();

    let result = uuid_regex.replace_all(path, "{id}");
    let result = numeric_regex.replace_all(&result, "/{id}$1");
    result.to_string()
}
