//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gridmap_requests_total` (counter): requests by method, status
//! - `gridmap_request_duration_seconds` (histogram): latency distribution
//! - `gridmap_cache_events_total` (counter): response cache hit/miss/invalidate
//! - `gridmap_maps` (gauge): number of stored maps

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    ::metrics::counter!(
        "gridmap_requests_total",
        "method" => method.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    ::metrics::histogram!(
        "gridmap_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

/// `event` is one of "hit", "miss", "invalidate".
pub fn record_cache_event(event: &'static str) {
    ::metrics::counter!("gridmap_cache_events_total", "event" => event).increment(1);
}

pub fn record_map_count(count: usize) {
    ::metrics::gauge!("gridmap_maps").set(count as f64);
}

/// Middleware recording request count and latency.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    record_request(&method, response.status().as_u16(), start);
    response
}
