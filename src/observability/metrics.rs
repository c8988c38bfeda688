//! Metrics collection and exposition.
//!
//! # Metrics
//! - `region_latency_http_requests_total` (counter): requests by method, path, status
//! - `region_latency_http_request_duration_seconds` (histogram): latency distribution
//! - `region_latency_queries_total` (counter): eligibility queries by outcome
//! - `region_latency_eligible_regions` (histogram): result sizes
//! - `region_latency_catalog_regions` (gauge): regions in the matrix header
//! - `region_latency_source_regions` (gauge): rows in the matrix

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    counter!(
        "region_latency_http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "region_latency_http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of an eligibility query.
pub fn record_query(outcome: &'static str, eligible: usize) {
    counter!("region_latency_queries_total", "outcome" => outcome).increment(1);
    if outcome == "ok" {
        histogram!("region_latency_eligible_regions").record(eligible as f64);
    }
}

/// Record the size of the loaded dataset.
pub fn record_dataset(catalog_regions: usize, source_regions: usize) {
    gauge!("region_latency_catalog_regions").set(catalog_regions as f64);
    gauge!("region_latency_source_regions").set(source_regions as f64);
}
