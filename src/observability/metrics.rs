//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by outcome
//! - `gateway_redirects_total` (counter): redirects by status code
//! - `gateway_request_duration_seconds` (histogram): handler latency
//! - `gateway_code_submissions_total` (counter): code posts by result
//! - `gateway_config_reloads_total` (counter): reloads by result
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of a fallback (redirect lookup) request.
pub fn record_request(outcome: &'static str, status: u16, start: Instant) {
    counter!("gateway_requests_total", "outcome" => outcome).increment(1);
    if outcome == "redirect" {
        counter!("gateway_redirects_total", "status" => status.to_string()).increment(1);
    }
    histogram!("gateway_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_code_submission(accepted: bool) {
    let result = if accepted { "accepted" } else { "rejected" };
    counter!("gateway_code_submissions_total", "result" => result).increment(1);
}

pub fn record_reload(success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!("gateway_config_reloads_total", "result" => result).increment(1);
}
