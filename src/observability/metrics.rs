//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mock_requests_total` (counter): dispatched requests by method, status, outcome
//! - `mock_request_duration_seconds` (histogram): dispatch latency, delays included
//! - `mock_route_reloads_total` (counter): route table replacements by result
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "mock_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    metrics::histogram!("mock_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_route_reload(result: &'static str) {
    metrics::counter!("mock_route_reloads_total", "result" => result).increment(1);
}
