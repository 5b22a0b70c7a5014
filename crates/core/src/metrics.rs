//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Resolver checks (by kind and result)
//! - Prep item transitions and persistence failures
//! - Periodic at-risk reviews

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

/// Automated checks by kind and result.
pub static RESOLVER_CHECKS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shipready_resolver_checks_total",
            "Total automated prep item checks",
        ),
        &["kind", "result"], // "complete", "incomplete", "error"
    )
    .unwrap()
});

/// Prep item transitions.
pub static PREP_TRANSITIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shipready_prep_transitions_total",
            "Total prep item state transitions",
        ),
        &["transition"],
    )
    .unwrap()
});

/// Failed writes of the prep item record.
pub static PREP_PERSIST_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "shipready_prep_persist_failures_total",
        "Total failed prep record saves",
    )
    .unwrap()
});

/// At-risk review runs, by whether anything changed.
pub static REVIEW_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shipready_review_runs_total", "Total at-risk review runs"),
        &["changed"],
    )
    .unwrap()
});

/// Register all core metrics with the given registry.
pub fn register_all(registry: &Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(RESOLVER_CHECKS.clone()))?;
    registry.register(Box::new(PREP_TRANSITIONS.clone()))?;
    registry.register(Box::new(PREP_PERSIST_FAILURES.clone()))?;
    registry.register(Box::new(REVIEW_RUNS.clone()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all() {
        let registry = Registry::new();
        register_all(&registry).unwrap();
        RESOLVER_CHECKS.with_label_values(&["api_check", "error"]).inc();
        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "shipready_resolver_checks_total"));
    }

    #[test]
    fn test_double_registration_fails() {
        let registry = Registry::new();
        register_all(&registry).unwrap();
        assert!(register_all(&registry).is_err());
    }
}
