//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Workspaces (live count, reclaimed count)
//! - Per-file conversions (outcome counts, engine duration)
//! - Archives built
//! - Requests by final state

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Workspace Metrics
// =============================================================================

/// Workspaces currently on disk.
pub static WORKSPACES_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "ppt2pdf_workspaces_active",
        "Number of request workspaces currently on disk",
    )
    .unwrap()
});

/// Workspaces removed by the deferred reclaimer.
pub static WORKSPACES_RECLAIMED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "ppt2pdf_workspaces_reclaimed_total",
        "Total workspaces removed after their grace delay",
    )
    .unwrap()
});

// =============================================================================
// Conversion Metrics
// =============================================================================

/// Per-file outcomes.
pub static CONVERSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("ppt2pdf_conversions_total", "Total uploaded files by outcome"),
        &["outcome"], // "converted", "skipped", "failed"
    )
    .unwrap()
});

/// Engine time per file.
pub static CONVERSION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "ppt2pdf_conversion_duration_seconds",
            "Duration of a single document conversion",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

// =============================================================================
// Archive / Request Metrics
// =============================================================================

/// Archives built.
pub static ARCHIVES_BUILT: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("ppt2pdf_archives_built_total", "Total archives built").unwrap()
});

/// Requests by terminal state.
pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "ppt2pdf_batch_requests_total",
            "Total batch requests by result",
        ),
        &["result"], // "served", "input_error", "capability_error", "conversion_error", "resource_error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(WORKSPACES_ACTIVE.clone()),
        Box::new(WORKSPACES_RECLAIMED.clone()),
        Box::new(CONVERSIONS_TOTAL.clone()),
        Box::new(CONVERSION_DURATION.clone()),
        Box::new(ARCHIVES_BUILT.clone()),
        Box::new(REQUESTS_TOTAL.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn test_all_metrics_register() {
        let registry = Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }

        CONVERSIONS_TOTAL.with_label_values(&["converted"]).inc();
        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "ppt2pdf_conversions_total"));
    }
}
