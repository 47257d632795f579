//! Estimation-specific metrics for the cost engine.

use metrics::{counter, histogram};
use std::time::Instant;

/// Estimation metrics recorder
pub struct EstimationMetrics;

impl EstimationMetrics {
    // =========================================================================
    // Operation Metrics
    // =========================================================================

    /// Record a single-resource estimate
    pub fn record_resource_estimate(provider: &str, resource_type: &str, duration_ms: u64) {
        counter!(
            "estimation_operations_total",
            "operation" => "resource",
            "provider" => provider.to_string(),
            "resource_type" => resource_type.to_string()
        )
        .increment(1);
        histogram!(
            "estimation_operation_duration_seconds",
            "operation" => "resource",
            "provider" => provider.to_string()
        )
        .record(duration_ms as f64 / 1000.0);

        tracing::debug!(
            provider = provider,
            resource_type = resource_type,
            duration_ms = duration_ms,
            "Estimated resource cost"
        );
    }

    /// Record an architecture-level estimate
    pub fn record_architecture_estimate(
        resource_count: usize,
        skipped: usize,
        duration_ms: u64,
    ) {
        counter!("estimation_operations_total", "operation" => "architecture").increment(1);
        histogram!("estimation_architecture_resources").record(resource_count as f64);
        histogram!(
            "estimation_operation_duration_seconds",
            "operation" => "architecture"
        )
        .record(duration_ms as f64 / 1000.0);

        if skipped > 0 {
            counter!("estimation_resources_skipped_total").increment(skipped as u64);
        }

        tracing::debug!(
            resources = resource_count,
            skipped = skipped,
            duration_ms = duration_ms,
            "Estimated architecture cost"
        );
    }

    /// Record an estimation failure
    pub fn record_estimate_failed(provider: &str, error_kind: &str) {
        counter!(
            "estimation_failures_total",
            "provider" => provider.to_string(),
            "error" => error_kind.to_string()
        )
        .increment(1);
    }

    // =========================================================================
    // Rate Resolution Metrics
    // =========================================================================

    /// Record which resolver tier produced a rate card
    pub fn record_rate_resolution(source: &str, resource_type: &str) {
        counter!(
            "rate_resolution_total",
            "source" => source.to_string(),
            "resource_type" => resource_type.to_string()
        )
        .increment(1);
    }

    /// Record a lookup that resolved to the zero-rate fallback
    pub fn record_rate_fallback(resource_type: &str, variant: &str) {
        counter!(
            "rate_resolution_fallback_total",
            "resource_type" => resource_type.to_string(),
            "variant" => variant.to_string()
        )
        .increment(1);

        tracing::debug!(
            resource_type = resource_type,
            variant = variant,
            "Rate lookup fell back to zero rate"
        );
    }

    // =========================================================================
    // Hidden Dependency Metrics
    // =========================================================================

    /// Record how many hidden dependencies a parent resource expanded into
    pub fn record_hidden_dependencies(parent_type: &str, count: usize) {
        histogram!(
            "hidden_dependencies_resolved",
            "parent_type" => parent_type.to_string()
        )
        .record(count as f64);
    }
}

/// Timer guard for automatic duration recording.
///
/// Records the duration when `stop()` is called or when dropped.
pub struct EstimationTimer {
    start: Instant,
    operation: String,
    provider: String,
    stopped: bool,
}

impl EstimationTimer {
    /// Start a new timer for an operation
    pub fn new(operation: &str, provider: &str) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.to_string(),
            provider: provider.to_string(),
            stopped: false,
        }
    }

    /// Stop the timer and record the duration. Returns duration in milliseconds.
    pub fn stop(&mut self) -> u64 {
        if self.stopped {
            return 0;
        }
        self.stopped = true;

        let duration = self.start.elapsed();
        let duration_ms = duration.as_millis() as u64;

        histogram!(
            "estimation_operation_duration_seconds",
            "operation" => self.operation.clone(),
            "provider" => self.provider.clone()
        )
        .record(duration.as_secs_f64());

        duration_ms
    }
}

impl Drop for EstimationTimer {
    fn drop(&mut self) {
        // Record on drop if not explicitly stopped
        if !self.stopped {
            self.stop();
        }
    }
}
