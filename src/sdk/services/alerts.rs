//! Alerts service.

use axum::routing::post;
use axum::{Extension, Json, Router};

use super::{backend_failure, RpcResult};
use crate::api::alerts::{
    SdkAlertsDeleteRequest, SdkAlertsDeleteResponse, SdkAlertsEnumerateRequest,
    SdkAlertsEnumerateResponse,
};
use crate::api::RpcStatus;
use crate::sdk::extract::Rpc;
use crate::sdk::registrar::{method_path, ServiceDescriptor};
use crate::sdk::Backends;

pub const SERVICE: &str = "Alerts";

pub const DESCRIPTOR: ServiceDescriptor = ServiceDescriptor {
    name: SERVICE,
    methods: &["Enumerate", "Delete"],
};

pub fn routes() -> Router {
    Router::new()
        .route(&method_path(SERVICE, "Enumerate"), post(enumerate))
        .route(&method_path(SERVICE, "Delete"), post(delete))
}

async fn enumerate(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkAlertsEnumerateRequest>,
) -> RpcResult<SdkAlertsEnumerateResponse> {
    let alerts = backends
        .alert()?
        .enumerate(&req.filters)
        .await
        .map_err(backend_failure("Failed to enumerate alerts"))?;
    Ok(Json(SdkAlertsEnumerateResponse { alerts }))
}

async fn delete(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkAlertsDeleteRequest>,
) -> RpcResult<SdkAlertsDeleteResponse> {
    // An empty filter list would match every alert.
    if req.filters.is_empty() {
        return Err(RpcStatus::invalid_argument("Must supply at least one filter"));
    }
    backends
        .alert()?
        .delete(&req.filters)
        .await
        .map_err(backend_failure("Failed to delete alerts"))?;
    Ok(Json(SdkAlertsDeleteResponse {}))
}
