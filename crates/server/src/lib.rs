//! HTTP surface of the release readiness engine.

pub mod api;
pub mod metrics;
pub mod state;
