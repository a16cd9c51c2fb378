//! Metrics collection and exposition.
//!
//! # Metrics
//! - `beacon_requests_total` (counter): requests by route and status
//! - `beacon_request_duration_seconds` (histogram): handler latency
//! - `beacon_active_connections` (gauge): current connection count
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter only runs when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one handled request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!("beacon_requests_total", "route" => route, "status" => status.clone())
        .increment(1);
    metrics::histogram!("beacon_request_duration_seconds", "route" => route, "status" => status)
        .record(start.elapsed().as_secs_f64());
}

/// Update the active connection gauge.
pub fn set_active_connections(count: u64) {
    metrics::gauge!("beacon_active_connections").set(count as f64);
}
