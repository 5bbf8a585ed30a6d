//! Metrics collection and exposition.
//!
//! # Metrics
//! - `sdk_requests_total` (counter): calls by method and outcome code
//! - `sdk_request_duration_seconds` (histogram): latency by method
//! - `sdk_backend_swaps_total` (counter): `use_*` calls by backend kind
//!
//! # Design Decisions
//! - Exporter is optional; recording without it costs next to nothing
//! - Outcome label is the RPC code (`ok` on success)

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, code: &str, elapsed: Duration) {
    counter!(
        "sdk_requests_total",
        "method" => method.to_string(),
        "code" => code.to_string()
    )
    .increment(1);
    histogram!("sdk_request_duration_seconds", "method" => method.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_backend_swap(backend: &'static str) {
    counter!("sdk_backend_swaps_total", "backend" => backend).increment(1);
}
