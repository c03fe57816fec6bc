//! Prometheus metrics for request latency and registry activity.
//!
//! This module provides metrics for:
//! - HTTP request latency per route
//! - Item creation and validation failures
//! - Database probe latency and failures

use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Database probe latency metric name.
pub const METRIC_DB_PROBE_LATENCY: &str = "db_probe_latency_ms";
/// Items created counter metric name.
pub const METRIC_ITEMS_CREATED: &str = "items_created_total";
/// Item validation failures counter metric name.
pub const METRIC_ITEM_VALIDATION_FAILURES: &str = "item_validation_failures_total";
/// Database probe failures counter metric name.
pub const METRIC_DB_PROBE_FAILURES: &str = "db_probe_failures_total";
/// Items currently stored gauge metric name.
pub const METRIC_ITEMS_STORED: &str = "items_stored";

/// Initialize all metric descriptions.
/// Call this once at startup, after the recorder is installed.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_DB_PROBE_LATENCY,
        "Database probe round-trip latency in milliseconds"
    );

    describe_counter!(METRIC_ITEMS_CREATED, "Total number of items created");
    describe_counter!(
        METRIC_ITEM_VALIDATION_FAILURES,
        "Total number of item creations rejected by validation"
    );
    describe_counter!(
        METRIC_DB_PROBE_FAILURES,
        "Total number of failed database probes"
    );

    describe_gauge!(METRIC_ITEMS_STORED, "Number of items held in memory");

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
}

/// Increment items created counter and the stored gauge.
/// Items are never removed, so the gauge only grows.
pub fn inc_items_created() {
    counter!(METRIC_ITEMS_CREATED).increment(1);
    gauge!(METRIC_ITEMS_STORED).increment(1.0);
}

/// Increment item validation failures counter.
pub fn inc_item_validation_failures() {
    counter!(METRIC_ITEM_VALIDATION_FAILURES).increment(1);
}

/// Increment database probe failures counter.
pub fn inc_db_probe_failures(category: &'static str) {
    counter!(METRIC_DB_PROBE_FAILURES, "category" => category).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(self.metric_name).record(latency_ms);
    }
}

/// Create a latency timer for a database probe.
pub fn timer_db_probe() -> LatencyTimer {
    LatencyTimer::new(METRIC_DB_PROBE_LATENCY)
}
