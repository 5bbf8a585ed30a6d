//! Rule-based authorization stage.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::RpcStatus;
use crate::auth::rules::{authorize_method, resolve_rules};
use crate::auth::Claims;

/// Checks the caller's rules against the request path. Every decision is
/// written to the audit log.
pub async fn authz(req: Request, next: Next) -> Response {
    let method = req.uri().path().to_string();

    let decision = {
        let Some(claims) = req.extensions().get::<Claims>() else {
            return RpcStatus::internal("Authorization called without token").into_response();
        };

        let claims_json = serde_json::to_string(claims).unwrap_or_default();
        let span = tracing::info_span!(
            "audit",
            name = %claims.name,
            email = %claims.email,
            role = %claims.role,
            claims = %claims_json,
            method = %method,
        );
        let _entered = span.enter();

        match resolve_rules(claims) {
            Ok(rules) if authorize_method(&rules, &method) => {
                tracing::info!("Authorized");
                Ok(())
            }
            Ok(_) => {
                tracing::info!("Access denied");
                Err(RpcStatus::permission_denied(format!("Access to {method} denied")))
            }
            Err(e) => {
                tracing::info!(reason = %e, "Access denied");
                Err(RpcStatus::permission_denied(e.to_string()))
            }
        }
    };

    match decision {
        Ok(()) => next.run(req).await,
        Err(status) => status.into_response(),
    }
}
