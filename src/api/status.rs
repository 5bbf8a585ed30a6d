//! RPC status codes and the wire error type.
//!
//! Every failed call carries a machine-checkable [`RpcCode`] plus a
//! human-readable message. On the wire the error is a JSON body
//! `{"code": "...", "message": "..."}` with a matching HTTP status and the
//! `x-sdk-status` header.

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Header carrying the RPC code of a failed call.
pub const STATUS_HEADER: &str = "x-sdk-status";

/// Stable error kinds surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpcCode {
    /// Malformed request shape (missing identifier, bad JSON).
    InvalidArgument,
    /// Unknown method path.
    NotFound,
    /// Authentication or authorization failure.
    PermissionDenied,
    /// No backend installed for the requested operation group.
    Unavailable,
    /// Backend-reported failure or broken server invariant.
    Internal,
}

impl RpcCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::PermissionDenied => "permission_denied",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal",
        }
    }

    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Best-effort mapping used when a peer answered without a JSON status.
    pub fn from_http_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::InvalidArgument,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::PermissionDenied,
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => Self::Unavailable,
            _ => Self::Internal,
        }
    }
}

impl std::fmt::Display for RpcCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed RPC: code plus message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct RpcStatus {
    pub code: RpcCode,
    pub message: String,
}

impl RpcStatus {
    pub fn new(code: RpcCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(RpcCode::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RpcCode::NotFound, message)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(RpcCode::PermissionDenied, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(RpcCode::Unavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(RpcCode::Internal, message)
    }
}

impl IntoResponse for RpcStatus {
    fn into_response(self) -> Response {
        let mut response = (self.code.http_status(), Json(&self)).into_response();
        response
            .headers_mut()
            .insert(STATUS_HEADER, HeaderValue::from_static(self.code.as_str()));
        // The logging stage reads the outcome back from here.
        response.extensions_mut().insert(self);
        response
    }
}
