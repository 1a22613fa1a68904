//! Metrics collection and exposition.
//!
//! # Metrics
//! - `receive_forward_requests_total` (counter): handled requests by outcome
//! - `receive_forward_duration_seconds` (histogram): handler latency by outcome
//!
//! Outcomes: `forwarded`, `method_not_allowed`, `missing_tenant`,
//! `construction_failed`, `upstream_unreachable`, `upstream_rejected`.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "receive_forward_requests_total";
pub const REQUEST_DURATION: &str = "receive_forward_duration_seconds";

/// Start the Prometheus scrape endpoint. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled request.
pub fn record_forward(outcome: &'static str, start: Instant) {
    metrics::counter!(REQUESTS_TOTAL, "outcome" => outcome).increment(1);
    metrics::histogram!(REQUEST_DURATION, "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
