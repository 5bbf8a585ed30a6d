//! Object store service.

use axum::routing::post;
use axum::{Extension, Json, Router};

use super::{backend_failure, require, RpcResult};
use crate::api::cluster::{
    SdkObjectstoreCreateRequest, SdkObjectstoreCreateResponse, SdkObjectstoreDeleteRequest,
    SdkObjectstoreDeleteResponse, SdkObjectstoreInspectRequest, SdkObjectstoreInspectResponse,
    SdkObjectstoreUpdateRequest, SdkObjectstoreUpdateResponse,
};
use crate::sdk::extract::Rpc;
use crate::sdk::registrar::{method_path, ServiceDescriptor};
use crate::sdk::Backends;

pub const SERVICE: &str = "Objectstore";

pub const DESCRIPTOR: ServiceDescriptor = ServiceDescriptor {
    name: SERVICE,
    methods: &["Inspect", "Create", "Update", "Delete"],
};

const MISSING_ID: &str = "Must supply object store id";

pub fn routes() -> Router {
    Router::new()
        .route(&method_path(SERVICE, "Inspect"), post(inspect))
        .route(&method_path(SERVICE, "Create"), post(create))
        .route(&method_path(SERVICE, "Update"), post(update))
        .route(&method_path(SERVICE, "Delete"), post(delete))
}

async fn inspect(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkObjectstoreInspectRequest>,
) -> RpcResult<SdkObjectstoreInspectResponse> {
    require(&req.objectstore_id, MISSING_ID)?;
    let objectstore_status = backends
        .cluster()?
        .object_store_inspect(&req.objectstore_id)
        .await
        .map_err(backend_failure("Failed to inspect object store"))?;
    Ok(Json(SdkObjectstoreInspectResponse { objectstore_status }))
}

async fn create(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkObjectstoreCreateRequest>,
) -> RpcResult<SdkObjectstoreCreateResponse> {
    require(&req.volume_id, "Must supply volume id")?;
    let objectstore_status = backends
        .cluster()?
        .object_store_create(&req.volume_id)
        .await
        .map_err(backend_failure("Failed to create object store"))?;
    Ok(Json(SdkObjectstoreCreateResponse { objectstore_status }))
}

async fn update(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkObjectstoreUpdateRequest>,
) -> RpcResult<SdkObjectstoreUpdateResponse> {
    require(&req.objectstore_id, MISSING_ID)?;
    backends
        .cluster()?
        .object_store_update(&req.objectstore_id, req.enable)
        .await
        .map_err(backend_failure("Failed to update object store"))?;
    Ok(Json(SdkObjectstoreUpdateResponse {}))
}

async fn delete(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkObjectstoreDeleteRequest>,
) -> RpcResult<SdkObjectstoreDeleteResponse> {
    require(&req.objectstore_id, MISSING_ID)?;
    backends
        .cluster()?
        .object_store_delete(&req.objectstore_id)
        .await
        .map_err(backend_failure("Failed to delete object store"))?;
    Ok(Json(SdkObjectstoreDeleteResponse {}))
}
