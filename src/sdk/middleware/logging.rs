//! Per-call request logging.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::RpcStatus;
use crate::observability::metrics;
use crate::sdk::registrar;

/// Metric label for paths outside the method table.
pub const UNKNOWN_METHOD: &str = "unknown";

/// Logs `Start`, then `Successful` or `Failed: <status>` with the duration.
/// The response passes through untouched.
pub async fn logging(req: Request, next: Next) -> Response {
    let method = req.uri().path().to_string();
    let label = metric_label(&method);
    let reqid = Uuid::new_v4();
    let span = tracing::info_span!("rpc", method = %method, reqid = %reqid);

    async move {
        tracing::info!("Start");
        let started = Instant::now();

        let response = next.run(req).await;

        let duration = started.elapsed();
        match response.extensions().get::<RpcStatus>() {
            Some(status) => {
                tracing::info!(?duration, "Failed: {status}");
                metrics::record_request(label, status.code.as_str(), duration);
            }
            None if !response.status().is_success() => {
                tracing::info!(?duration, "Failed: {}", response.status());
                metrics::record_request(label, "http_error", duration);
            }
            None => {
                tracing::info!(?duration, "Successful");
                metrics::record_request(label, "ok", duration);
            }
        }
        response
    }
    .instrument(span)
    .await
}

/// Registered method paths label themselves; anything else shares one label
/// so arbitrary paths cannot mint new series.
fn metric_label(path: &str) -> &str {
    if registrar::is_registered(path) {
        path
    } else {
        UNKNOWN_METHOD
    }
}
