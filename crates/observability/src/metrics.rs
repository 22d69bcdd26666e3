//! Prometheus metrics infrastructure
//!
//! This module installs the Prometheus exporter and provides the metric sets
//! used by the HTTP server and the inventory service.

use metrics::{counter, gauge, histogram, Gauge, Histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Initialize the Prometheus metrics exporter
///
/// This starts an HTTP listener on the specified port that exposes metrics
/// at the `/metrics` endpoint.
///
/// # Example
///
/// ```ignore
/// observability::metrics::init_metrics(9090)?;
/// // Metrics available at http://localhost:9090/metrics
/// ```
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// HTTP request metrics
///
/// # Metrics
///
/// * `server_requests_total{server, method, status}` - Requests processed
/// * `server_request_duration_seconds{server}` - Request duration histogram
/// * `server_requests_in_flight{server}` - Requests currently being handled
#[derive(Clone)]
pub struct ServerMetrics {
    request_duration: Histogram,
    in_flight: Gauge,
    server_name: String,
}

impl ServerMetrics {
    /// Create metrics for a named server (e.g. "http").
    pub fn new(server_name: &str) -> Self {
        let name = server_name.to_string();

        Self {
            request_duration: histogram!("server_request_duration_seconds", "server" => name.clone()),
            in_flight: gauge!("server_requests_in_flight", "server" => name.clone()),
            server_name: name,
        }
    }

    /// Record a completed request
    pub fn record_request(&self, method: &str, duration: Duration, status_code: u16) {
        counter!(
            "server_requests_total",
            "server" => self.server_name.clone(),
            "method" => method.to_string(),
            "status" => status_code.to_string()
        )
        .increment(1);
        self.request_duration.record(duration.as_secs_f64());
    }

    /// Start tracking a request; the returned guard records it on drop.
    pub fn start_request(&self, method: &str) -> RequestMetricsGuard<'_> {
        RequestMetricsGuard::new(self, method)
    }

    /// Get the server name
    pub fn server_name(&self) -> &str {
        &self.server_name
    }
}

/// Request metrics guard that records duration and status on drop
///
/// # Example
///
/// ```ignore
/// let metrics = ServerMetrics::new("http");
/// {
///     let mut guard = metrics.start_request("GET");
///     // ... handle request ...
///     guard.set_status(404);
/// } // Recorded when guard is dropped
/// ```
pub struct RequestMetricsGuard<'a> {
    metrics: &'a ServerMetrics,
    method: String,
    start: Instant,
    status_code: u16,
}

impl<'a> RequestMetricsGuard<'a> {
    /// Create a new metrics guard
    pub fn new(metrics: &'a ServerMetrics, method: &str) -> Self {
        metrics.in_flight.increment(1.0);
        Self {
            metrics,
            method: method.to_string(),
            start: Instant::now(),
            status_code: 200,
        }
    }

    /// Set the status code (call before drop)
    pub fn set_status(&mut self, code: u16) {
        self.status_code = code;
    }
}

impl Drop for RequestMetricsGuard<'_> {
    fn drop(&mut self) {
        self.metrics.in_flight.decrement(1.0);
        self.metrics
            .record_request(&self.method, self.start.elapsed(), self.status_code);
    }
}

/// Outcome label for inventory mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Rejected,
    Failed,
}

impl MutationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationOutcome::Applied => "applied",
            MutationOutcome::Rejected => "rejected",
            MutationOutcome::Failed => "failed",
        }
    }
}

/// Inventory mutation counters
///
/// * `inventory_mutations_total{operation, outcome}`
/// * `inventory_rejections_total{operation, reason}`
#[derive(Clone, Debug, Default)]
pub struct InventoryMetrics;

impl InventoryMetrics {
    pub fn new() -> Self {
        Self
    }

    /// Count one create/increment/decrement/delete attempt.
    pub fn record_mutation(&self, operation: &'static str, outcome: MutationOutcome) {
        counter!(
            "inventory_mutations_total",
            "operation" => operation,
            "outcome" => outcome.as_str()
        )
        .increment(1);
    }

    /// Count a rule rejection with its error code.
    pub fn record_rejection(&self, operation: &'static str, reason: &'static str) {
        self.record_mutation(operation, MutationOutcome::Rejected);
        counter!(
            "inventory_rejections_total",
            "operation" => operation,
            "reason" => reason
        )
        .increment(1);
    }
}
