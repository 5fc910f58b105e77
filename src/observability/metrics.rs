//! Metrics collection and exposition.
//!
//! # Metrics
//! - `servicehost_requests_total` (counter): requests by route, verb, status
//! - `servicehost_request_duration_seconds` (histogram): end-to-end latency
//! - `servicehost_lifecycle_faults_total` (counter): faults by lifecycle phase
//!
//! # Design Decisions
//! - Recording is cheap and a no-op without an installed recorder
//! - The Prometheus endpoint is opt-in

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::error::Phase;
use crate::routing::HttpVerb;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed request.
pub fn record_request(route: &str, verb: HttpVerb, status: u16, start: Instant) {
    metrics::counter!(
        "servicehost_requests_total",
        "route" => route.to_string(),
        "verb" => verb.as_str(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "servicehost_request_duration_seconds",
        "route" => route.to_string(),
        "verb" => verb.as_str()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_lifecycle_fault(phase: Phase) {
    metrics::counter!("servicehost_lifecycle_faults_total", "phase" => phase.as_str()).increment(1);
}
