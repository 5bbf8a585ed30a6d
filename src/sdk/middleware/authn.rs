//! Bearer-token authentication stage.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::RpcStatus;
use crate::auth::{AuthError, Authenticator};

/// Extract the token from `authorization: bearer <token>`. The scheme is
/// matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let (scheme, token) = value.trim().split_once(' ').ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

pub async fn authn(
    State(authenticator): State<Arc<dyn Authenticator>>,
    mut req: Request,
    next: Next,
) -> Response {
    // 1. Validate the token
    let claims = match bearer_token(req.headers())
        .and_then(|token| authenticator.authenticate_token(token))
    {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(method = %req.uri().path(), error = %e, "Authentication failed");
            return RpcStatus::permission_denied(e.to_string()).into_response();
        }
    };

    // 2. Attach claims for the authorization stage
    req.extensions_mut().insert(claims);
    next.run(req).await
}
