//! Metrics collection and exposition.
//!
//! # Metrics
//! - `balancer_requests_total` (counter): requests by method, status, backend
//! - `balancer_request_duration_seconds` (histogram): latency distribution
//! - `balancer_rejections_total` (counter): validator rejections by kind
//! - `balancer_backend_health` (gauge): 1=healthy, 0=unhealthy
//! - `balancer_failover_gave_up_total` (counter): requests that exhausted
//!   the wait-for-recovery deadline

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(err) => tracing::error!(error = %err, "Failed to install metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, backend: &str, start_time: Instant) {
    counter!(
        "balancer_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "backend" => backend.to_string()
    )
    .increment(1);
    histogram!(
        "balancer_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start_time.elapsed().as_secs_f64());
}

/// Record a validator rejection.
pub fn record_rejection(kind: &'static str) {
    counter!("balancer_rejections_total", "kind" => kind).increment(1);
}

/// Record the health of one backend after a probe.
pub fn record_backend_health(backend: &str, healthy: bool) {
    gauge!("balancer_backend_health", "backend" => backend.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

/// Record a request that ran out its failover deadline.
pub fn record_gave_up() {
    counter!("balancer_failover_gave_up_total").increment(1);
}
