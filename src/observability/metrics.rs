//! Prometheus metrics.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        tracing::error!(error = %e, "Failed to install metrics exporter");
    } else {
        tracing::info!(address = %addr, "Metrics exporter listening");
    }
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    counter!(
        "edge_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route.to_string()
    )
    .increment(1);
    histogram!(
        "edge_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a page cache lookup outcome ("hit", "miss", "expired").
pub fn record_cache_lookup(outcome: &'static str) {
    counter!("edge_page_cache_lookups_total", "outcome" => outcome).increment(1);
}

/// Record the current number of cached page documents.
pub fn record_cache_size(size: usize) {
    gauge!("edge_page_cache_entries").set(size as f64);
}

/// Record one cache invalidation ("path" or "template").
pub fn record_invalidation(kind: &'static str) {
    counter!("edge_invalidations_total", "kind" => kind).increment(1);
}

/// Record one CMS fetch outcome ("ok" or "error").
pub fn record_cms_fetch(collection: &str, outcome: &'static str) {
    counter!(
        "edge_cms_fetches_total",
        "collection" => collection.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
