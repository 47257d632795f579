//! Observability utilities for the cost-estimation platform.
//!
//! This crate provides:
//! - Prometheus metrics recording and export
//! - Custom metrics for estimation and rate-resolution operations
//! - Axum middleware for automatic request metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, EstimationMetrics};
//!
//! // Initialize metrics recorder
//! init_metrics();
//!
//! // Record estimation operations
//! EstimationMetrics::record_resource_estimate("aws", "compute_instance", 12);
//!
//! // Add metrics endpoint to router
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

pub mod estimation;
pub mod middleware;

pub use estimation::{EstimationMetrics, EstimationTimer};

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// Call once at application startup. Returns the PrometheusHandle for
/// rendering metrics.
pub fn init_metrics() -> &'static PrometheusHandle {
    METRICS_HANDLE.get_or_init(|| {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("Failed to install Prometheus recorder");

        info!("Prometheus metrics recorder initialized");

        register_metric_descriptions();

        handle
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

/// Register metric descriptions for documentation
fn register_metric_descriptions() {
    use metrics::describe_counter;
    use metrics::describe_gauge;
    use metrics::describe_histogram;

    // HTTP metrics
    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    // Estimation metrics
    describe_counter!(
        "estimation_operations_total",
        "Total estimation operations by kind and provider"
    );
    describe_histogram!(
        "estimation_operation_duration_seconds",
        "Estimation operation duration in seconds"
    );
    describe_counter!(
        "estimation_failures_total",
        "Estimation failures by provider and error kind"
    );
    describe_histogram!(
        "estimation_architecture_resources",
        "Resources per architecture estimate"
    );
    describe_counter!(
        "estimation_resources_skipped_total",
        "Resources skipped during architecture aggregation"
    );

    // Rate resolution metrics
    describe_counter!(
        "rate_resolution_total",
        "Rate card resolutions by source tier"
    );
    describe_counter!(
        "rate_resolution_fallback_total",
        "Rate lookups that resolved to a zero-rate fallback"
    );

    // Hidden dependency metrics
    describe_histogram!(
        "hidden_dependencies_resolved",
        "Hidden dependencies resolved per parent resource"
    );
}
