//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define console metrics (probe outcomes, probe latency, API calls)
//! - Expose Prometheus-compatible metrics endpoint when enabled
//!
//! # Metrics
//! - `rag_health_probes_total` (counter): probes by outcome
//! - `rag_health_probe_duration_seconds` (histogram): probe latency
//! - `rag_api_healthy` (gauge): 1=healthy, 0=down
//! - `rag_api_requests_total` (counter): API calls by endpoint, status
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(healthy: bool, elapsed: Duration) {
    let outcome = if healthy { "healthy" } else { "down" };
    metrics::counter!("rag_health_probes_total", "outcome" => outcome).increment(1);
    metrics::histogram!("rag_health_probe_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn set_api_health(healthy: bool) {
    metrics::gauge!("rag_api_healthy").set(if healthy { 1.0 } else { 0.0 });
}

/// `status` is 0 when the request never got a response.
pub fn record_api_request(endpoint: &'static str, status: u16) {
    metrics::counter!(
        "rag_api_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
}
