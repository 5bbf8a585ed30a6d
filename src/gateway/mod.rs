//! HTTP/JSON gateway in front of the unix-domain listener.
//!
//! # Data Flow
//! ```text
//! GET|POST /v1/<resource>/<action>
//!     → routes::resolve → /openstorage.api.OpenStorage<Service>/<Method>
//!     → SdkClient over the unix socket (body and authorization relayed)
//!     → listener response returned unchanged
//! ```
//!
//! # Design Decisions
//! - No authorization here; the listener behind the socket enforces it
//! - A `GET` without a query sends `{}`; query parameters become a flat
//!   JSON object of strings

pub mod routes;

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::{RpcStatus, STATUS_HEADER};
use crate::client::{ClientError, SdkClient};
use crate::error::ServerError;
use crate::lifecycle::shutdown::Shutdown;

/// Per-request deadline, relay included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

const NAME: &str = "SDK-gateway";

#[derive(Clone)]
struct GatewayState {
    client: SdkClient,
}

struct Running {
    address: String,
    shutdown: Shutdown,
    task: JoinHandle<io::Result<()>>,
}

/// REST front end relaying to the listener on `socket`.
pub struct Gateway {
    port: u16,
    socket: PathBuf,
    running: Mutex<Option<Running>>,
}

impl Gateway {
    /// `port` 0 binds an ephemeral port.
    pub fn new(port: u16, socket: impl Into<PathBuf>) -> Self {
        Self {
            port,
            socket: socket.into(),
            running: Mutex::new(None),
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.relay_client())
    }

    /// Client for the listener behind the socket, with the gateway's deadline.
    fn relay_client(&self) -> SdkClient {
        SdkClient::unix(&self.socket).with_timeout(REQUEST_TIMEOUT)
    }

    pub async fn start(&self) -> Result<(), ServerError> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return Err(ServerError::AlreadyRunning(NAME.to_string()));
        }

        let bind = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&bind)
            .await
            .map_err(|e| ServerError::transport(NAME, format!("failed to bind {bind}: {e}")))?;
        let address = listener
            .local_addr()
            .map_err(|e| ServerError::transport(NAME, e))?
            .to_string();

        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        let app = self.router();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(signal.recv())
                .await
        });

        tracing::info!(
            name = NAME,
            address = %address,
            socket = %self.socket.display(),
            "Gateway listening"
        );
        *running = Some(Running {
            address,
            shutdown,
            task,
        });
        Ok(())
    }

    /// Signal the gateway to stop and wait for it. No-op when not running.
    pub async fn stop(&self) {
        let Some(running) = self.running.lock().await.take() else {
            return;
        };
        running.shutdown.trigger();
        let mut task = running.task;
        match tokio::time::timeout(REQUEST_TIMEOUT, &mut task).await {
            Ok(Ok(Ok(()))) => tracing::info!(name = NAME, "Gateway stopped"),
            Ok(Ok(Err(e))) => tracing::warn!(name = NAME, error = %e, "Gateway exited with error"),
            Ok(Err(e)) => tracing::warn!(name = NAME, error = %e, "Gateway task failed"),
            Err(_) => task.abort(),
        }
    }

    /// Bound `host:port` while running.
    pub async fn address(&self) -> Option<String> {
        self.running.lock().await.as_ref().map(|r| r.address.clone())
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("port", &self.port)
            .field("socket", &self.socket)
            .finish()
    }
}

#[allow(deprecated)]
fn build_router(client: SdkClient) -> Router {
    Router::new()
        .route("/v1/{resource}/{action}", get(relay_get).post(relay_post))
        .with_state(GatewayState { client })
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
}

async fn relay_get(
    State(state): State<GatewayState>,
    Path((resource, action)): Path<(String, String)>,
    query: Result<Query<BTreeMap<String, String>>, QueryRejection>,
    headers: HeaderMap,
) -> Response {
    let params = match query {
        Ok(Query(params)) => params,
        Err(e) => return RpcStatus::invalid_argument(e.body_text()).into_response(),
    };
    let body = match serde_json::to_vec(&params) {
        Ok(json) => Bytes::from(json),
        Err(e) => return RpcStatus::invalid_argument(e.to_string()).into_response(),
    };
    relay(&state.client, &resource, &action, &headers, body).await
}

async fn relay_post(
    State(state): State<GatewayState>,
    Path((resource, action)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    relay(&state.client, &resource, &action, &headers, body).await
}

async fn relay(
    client: &SdkClient,
    resource: &str,
    action: &str,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    let Some(path) = routes::resolve(resource, action) else {
        return RpcStatus::not_found(format!("Unknown resource /v1/{resource}/{action}")).into_response();
    };

    let authorization = headers.get(AUTHORIZATION).cloned();
    match client.call_raw(&path, body, authorization).await {
        Ok(upstream) => {
            let (parts, bytes) = upstream.into_parts();
            let mut response = Response::new(Body::from(bytes));
            *response.status_mut() = parts.status;
            for name in ["content-type", STATUS_HEADER] {
                if let Some(value) = parts.headers.get(name) {
                    response.headers_mut().insert(name, value.clone());
                }
            }
            response
        }
        Err(err) => {
            tracing::warn!(name = NAME, method = %path, error = %err, "Relay failed");
            relay_failure(err).into_response()
        }
    }
}

fn relay_failure(err: ClientError) -> RpcStatus {
    match err {
        ClientError::Status(status) => status,
        other => RpcStatus::unavailable(other.to_string()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RpcCode;
    use axum::body::to_bytes;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn status_of(response: Response) -> RpcStatus {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unknown_resource_is_not_found() {
        let gateway = Gateway::new(0, "/nonexistent/osd.sock");
        let response = gateway
            .router()
            .oneshot(Request::get("/v1/pools/enumerate").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(status_of(response).await.code, RpcCode::NotFound);
    }

    #[tokio::test]
    async fn unreachable_listener_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Gateway::new(0, dir.path().join("absent.sock"));
        let response = gateway
            .router()
            .oneshot(
                Request::post("/v1/volumes/enumerate")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[STATUS_HEADER], "unavailable");
    }

    #[test]
    fn relay_deadline_matches_gateway_deadline() {
        let gateway = Gateway::new(0, "/nonexistent/osd.sock");
        let client = gateway.relay_client();
        assert_eq!(client.timeout(), REQUEST_TIMEOUT);
        assert_eq!(
            client.endpoint(),
            &crate::client::Endpoint::Unix("/nonexistent/osd.sock".into())
        );
    }

    #[tokio::test]
    async fn stop_before_start_is_a_no_op() {
        let gateway = Gateway::new(0, "/nonexistent/osd.sock");
        gateway.stop().await;
        assert!(gateway.address().await.is_none());

        gateway.start().await.unwrap();
        assert!(gateway.address().await.is_some());
        gateway.stop().await;
        assert!(gateway.address().await.is_none());
    }
}
