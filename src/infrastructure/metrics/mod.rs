//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - KYB submission counts by outcome
//! - Verification transition counts by action and outcome
//! - Registry lookup latency histograms

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// KYB submission counter - tracks submissions by outcome (accepted, rejected)
pub static KYB_SUBMISSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("kyb_submissions_total", "Total number of KYB submissions")
            .namespace("company_service"),
        &["outcome"],
    )
    .expect("Failed to create KYB_SUBMISSIONS_TOTAL metric")
});

/// Verification transition counter - tracks reviews by action and outcome
pub static VERIFICATION_TRANSITIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "verification_transitions_total",
            "Total number of verification transitions",
        )
        .namespace("company_service"),
        &["action", "outcome"],
    )
    .expect("Failed to create VERIFICATION_TRANSITIONS_TOTAL metric")
});

/// Registry lookup latency histogram by result (hit, miss, error)
pub static REGISTRY_LOOKUP_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "registry_lookup_duration_seconds",
            "Business registry lookup latency in seconds",
        )
        .namespace("company_service")
        .buckets(buckets),
        &["result"],
    )
    .expect("Failed to create REGISTRY_LOOKUP_DURATION_SECONDS metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(KYB_SUBMISSIONS_TOTAL.clone()))
        .expect("Failed to register KYB_SUBMISSIONS_TOTAL");
    registry
        .register(Box::new(VERIFICATION_TRANSITIONS_TOTAL.clone()))
        .expect("Failed to register VERIFICATION_TRANSITIONS_TOTAL");
    registry
        .register(Box::new(REGISTRY_LOOKUP_DURATION_SECONDS.clone()))
        .expect("Failed to register REGISTRY_LOOKUP_DURATION_SECONDS");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Metrics should be valid UTF-8")
}

/// Helper to record a KYB submission outcome
pub fn record_submission(outcome: &str) {
    KYB_SUBMISSIONS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Helper to record a verification transition
pub fn record_transition(action: &str, outcome: &str) {
    VERIFICATION_TRANSITIONS_TOTAL
        .with_label_values(&[action, outcome])
        .inc();
}

/// Helper to record a registry lookup
pub fn record_registry_lookup(result: &str, duration_secs: f64) {
    REGISTRY_LOOKUP_DURATION_SECONDS
        .with_label_values(&[result])
        .observe(duration_secs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Force lazy initialization
        let _ = &*REGISTRY;
        let _ = &*KYB_SUBMISSIONS_TOTAL;
        let _ = &*VERIFICATION_TRANSITIONS_TOTAL;
        let _ = &*REGISTRY_LOOKUP_DURATION_SECONDS;
    }

    #[test]
    fn test_gather_metrics() {
        let metrics = gather_metrics();
        assert!(!metrics.is_empty());
    }

    #[test]
    fn test_record_submission() {
        record_submission("accepted");
        let metrics = gather_metrics();
        assert!(metrics.contains("kyb_submissions_total"));
    }
}
