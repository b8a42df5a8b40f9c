//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_in_flight_calls` (gauge): logical calls awaiting a terminal state
//! - `relay_attempts_total` (counter): attempts by outcome class
//! - `relay_retries_total` (counter): retries scheduled
//! - `relay_calls_total` (counter): logical calls by result
//! - `relay_call_duration_seconds` (histogram): end-to-end latency, retries included
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_in_flight(count: usize) {
    gauge!("relay_in_flight_calls").set(count as f64);
}

pub fn record_attempt(class: &'static str) {
    counter!("relay_attempts_total", "class" => class).increment(1);
}

pub fn record_retry() {
    counter!("relay_retries_total").increment(1);
}

pub fn record_call(result: &'static str, start_time: Instant) {
    counter!("relay_calls_total", "result" => result).increment(1);
    histogram!("relay_call_duration_seconds", "result" => result)
        .record(start_time.elapsed().as_secs_f64());
}
