//! RPC client for SDK listeners.
//!
//! # Data Flow
//! ```text
//! call(service, method, &req)
//!     → JSON body + optional bearer token
//!     → HTTP/1 POST over TcpStream or UnixStream
//!     → 2xx: decoded response
//!     → otherwise: RpcStatus from body, or from the HTTP status
//! ```
//!
//! One connection per call. The gateway relays through [`SdkClient::call_raw`].

use std::path::PathBuf;
use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::client::conn::http1;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use hyper::http::HeaderValue;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, UnixStream};

use crate::api::{RpcCode, RpcStatus};
use crate::sdk::registrar::method_path;

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to connect to {endpoint}: {reason}")]
    Connect { endpoint: String, reason: String },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("{0}")]
    Status(RpcStatus),
}

impl ClientError {
    /// RPC code of a status error.
    pub fn code(&self) -> Option<RpcCode> {
        match self {
            Self::Status(status) => Some(status.code),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<&RpcStatus> {
        match self {
            Self::Status(status) => Some(status),
            _ => None,
        }
    }
}

/// Where the listener lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `host:port`
    Tcp(String),
    Unix(PathBuf),
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tcp(address) => f.write_str(address),
            Self::Unix(path) => write!(f, "unix:{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SdkClient {
    endpoint: Endpoint,
    token: Option<String>,
    timeout: Duration,
}

impl SdkClient {
    pub fn tcp(address: impl Into<String>) -> Self {
        Self::new(Endpoint::Tcp(address.into()))
    }

    pub fn unix(path: impl Into<PathBuf>) -> Self {
        Self::new(Endpoint::Unix(path.into()))
    }

    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Send `token` as a bearer credential on every call.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Invoke `service`.`method` and decode the response.
    pub async fn call<Req, Resp>(&self, service: &str, method: &str, request: &Req) -> Result<Resp, ClientError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_vec(request).map_err(ClientError::Encode)?;
        let authorization = self
            .token
            .as_deref()
            .and_then(|token| HeaderValue::from_str(&format!("Bearer {token}")).ok());

        let response = self
            .call_raw(&method_path(service, method), Bytes::from(body), authorization)
            .await?;

        let status = response.status();
        let body = response.into_body();
        if status.is_success() {
            return serde_json::from_slice(&body).map_err(ClientError::Decode);
        }
        Err(ClientError::Status(status_from_body(status, &body)))
    }

    /// POST `body` to `path` and return the response as received.
    pub async fn call_raw(
        &self,
        path: &str,
        body: Bytes,
        authorization: Option<HeaderValue>,
    ) -> Result<Response<Bytes>, ClientError> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(HOST, "localhost")
            .header(CONTENT_TYPE, "application/json");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        let request = builder
            .body(Full::new(body))
            .map_err(|e| ClientError::Request(e.to_string()))?;

        tokio::time::timeout(self.timeout, self.send(request))
            .await
            .map_err(|_| ClientError::Timeout)?
    }

    async fn send(&self, request: Request<Full<Bytes>>) -> Result<Response<Bytes>, ClientError> {
        match &self.endpoint {
            Endpoint::Tcp(address) => {
                let stream = TcpStream::connect(address)
                    .await
                    .map_err(|e| self.connect_error(e))?;
                exchange(stream, request).await
            }
            Endpoint::Unix(path) => {
                let stream = UnixStream::connect(path)
                    .await
                    .map_err(|e| self.connect_error(e))?;
                exchange(stream, request).await
            }
        }
    }

    fn connect_error(&self, err: std::io::Error) -> ClientError {
        ClientError::Connect {
            endpoint: self.endpoint.to_string(),
            reason: err.to_string(),
        }
    }
}

async fn exchange<S>(stream: S, request: Request<Full<Bytes>>) -> Result<Response<Bytes>, ClientError>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    let (mut sender, conn) = http1::handshake(TokioIo::new(stream))
        .await
        .map_err(|e| ClientError::Request(format!("Handshake failed: {e}")))?;

    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::debug!(error = %e, "SDK client connection closed");
        }
    });

    let response = sender
        .send_request(request)
        .await
        .map_err(|e| ClientError::Request(e.to_string()))?;

    let (parts, body) = response.into_parts();
    let bytes = body
        .collect()
        .await
        .map_err(|e| ClientError::Request(e.to_string()))?
        .to_bytes();
    Ok(Response::from_parts(parts, bytes))
}

/// Status carried by an error response, or one derived from the HTTP status
/// when the body is not a JSON status.
pub fn status_from_body(status: hyper::StatusCode, body: &[u8]) -> RpcStatus {
    serde_json::from_slice(body).unwrap_or_else(|_| {
        RpcStatus::new(
            RpcCode::from_http_status(status),
            String::from_utf8_lossy(body).trim().to_string(),
        )
    })
}
