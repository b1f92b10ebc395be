//! Prometheus metrics for the dockyard server.
//!
//! # Security Note
//!
//! The `/metrics` endpoint is unauthenticated to allow Prometheus scraping.
//! Metrics carry no repository names or image ids, only aggregate counts.
//! The endpoint should still be network-restricted to authorized scrapers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{self, Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static REPOSITORIES_REGISTERED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "dockyard_repositories_registered_total",
        "Total number of repository registrations",
    )
    .expect("metric creation failed")
});

pub static TAGS_WRITTEN: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("dockyard_tags_written_total", "Total number of tag writes")
        .expect("metric creation failed")
});

pub static COMPLETION_CHECKS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "dockyard_completion_checks_total",
            "Upload completion checks by outcome",
        ),
        &["outcome"],
    )
    .expect("metric creation failed")
});

pub static PULL_MANIFESTS_SERVED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "dockyard_pull_manifests_served_total",
        "Total number of pull manifests served",
    )
    .expect("metric creation failed")
});

pub static AUTH_FAILURES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "dockyard_auth_failures_total",
            "Rejected authentication attempts by reason",
        ),
        &["reason"],
    )
    .expect("metric creation failed")
});

static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry. Safe to call more than once.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(REPOSITORIES_REGISTERED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(TAGS_WRITTEN.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(COMPLETION_CHECKS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(PULL_MANIFESTS_SERVED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(AUTH_FAILURES.clone()))
            .expect("metric registration failed");
    });
}

/// GET /metrics
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}

/// Record the outcome of a completion check.
pub fn record_completion(outcome: &str) {
    COMPLETION_CHECKS.with_label_values(&[outcome]).inc();
}

/// Record a rejected authentication attempt.
pub fn record_auth_failure(reason: &str) {
    AUTH_FAILURES.with_label_values(&[reason]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        register_metrics();
        register_metrics();

        record_completion("committed");
        assert!(COMPLETION_CHECKS.with_label_values(&["committed"]).get() >= 1);

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&REGISTRY.gather(), &mut buffer)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("dockyard_completion_checks_total"));
    }
}
