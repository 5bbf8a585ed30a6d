//! Volume service: lifecycle, labels and snapshots.

use axum::routing::post;
use axum::{Extension, Json, Router};

use super::{backend_failure, require, RpcResult};
use crate::api::volume::{
    SdkVolumeCreateRequest, SdkVolumeCreateResponse, SdkVolumeDeleteRequest,
    SdkVolumeDeleteResponse, SdkVolumeEnumerateRequest, SdkVolumeEnumerateResponse,
    SdkVolumeInspectRequest, SdkVolumeInspectResponse, SdkVolumeSnapshotCreateRequest,
    SdkVolumeSnapshotCreateResponse, SdkVolumeSnapshotEnumerateRequest,
    SdkVolumeSnapshotEnumerateResponse, SdkVolumeUpdateRequest, SdkVolumeUpdateResponse,
};
use crate::api::RpcStatus;
use crate::sdk::extract::Rpc;
use crate::sdk::registrar::{method_path, ServiceDescriptor};
use crate::sdk::Backends;

pub const SERVICE: &str = "Volume";

pub const DESCRIPTOR: ServiceDescriptor = ServiceDescriptor {
    name: SERVICE,
    methods: &[
        "Create",
        "Delete",
        "Inspect",
        "Enumerate",
        "Update",
        "SnapshotCreate",
        "SnapshotEnumerate",
    ],
};

pub(crate) const MISSING_VOLUME_ID: &str = "Must supply volume id";

pub fn routes() -> Router {
    Router::new()
        .route(&method_path(SERVICE, "Create"), post(create))
        .route(&method_path(SERVICE, "Delete"), post(delete))
        .route(&method_path(SERVICE, "Inspect"), post(inspect))
        .route(&method_path(SERVICE, "Enumerate"), post(enumerate))
        .route(&method_path(SERVICE, "Update"), post(update))
        .route(&method_path(SERVICE, "SnapshotCreate"), post(snapshot_create))
        .route(&method_path(SERVICE, "SnapshotEnumerate"), post(snapshot_enumerate))
}

async fn create(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkVolumeCreateRequest>,
) -> RpcResult<SdkVolumeCreateResponse> {
    require(&req.name, "Must supply a unique name")?;
    let spec = req
        .spec
        .as_ref()
        .ok_or_else(|| RpcStatus::invalid_argument("Must supply spec object"))?;

    let volume_id = backends
        .driver()?
        .create(&req.name, spec, &req.labels)
        .await
        .map_err(backend_failure("Failed to create volume"))?;
    Ok(Json(SdkVolumeCreateResponse { volume_id }))
}

async fn delete(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkVolumeDeleteRequest>,
) -> RpcResult<SdkVolumeDeleteResponse> {
    require(&req.volume_id, MISSING_VOLUME_ID)?;
    backends
        .driver()?
        .delete(&req.volume_id)
        .await
        .map_err(backend_failure("Failed to delete volume"))?;
    Ok(Json(SdkVolumeDeleteResponse {}))
}

async fn inspect(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkVolumeInspectRequest>,
) -> RpcResult<SdkVolumeInspectResponse> {
    require(&req.volume_id, MISSING_VOLUME_ID)?;
    let volume = backends
        .driver()?
        .inspect(&req.volume_id)
        .await
        .map_err(backend_failure("Failed to inspect volume"))?;
    Ok(Json(SdkVolumeInspectResponse { volume }))
}

async fn enumerate(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkVolumeEnumerateRequest>,
) -> RpcResult<SdkVolumeEnumerateResponse> {
    let volumes = backends
        .driver()?
        .enumerate(&req.labels)
        .await
        .map_err(backend_failure("Failed to enumerate volumes"))?;
    Ok(Json(SdkVolumeEnumerateResponse {
        volume_ids: volumes.into_iter().map(|v| v.id).collect(),
    }))
}

async fn update(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkVolumeUpdateRequest>,
) -> RpcResult<SdkVolumeUpdateResponse> {
    require(&req.volume_id, MISSING_VOLUME_ID)?;
    backends
        .driver()?
        .set(&req.volume_id, &req.labels, req.spec.as_ref())
        .await
        .map_err(backend_failure("Failed to update volume"))?;
    Ok(Json(SdkVolumeUpdateResponse {}))
}

async fn snapshot_create(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkVolumeSnapshotCreateRequest>,
) -> RpcResult<SdkVolumeSnapshotCreateResponse> {
    require(&req.volume_id, MISSING_VOLUME_ID)?;
    let snapshot_id = backends
        .driver()?
        .snapshot_create(&req.volume_id, &req.name, &req.labels)
        .await
        .map_err(backend_failure("Failed to create snapshot"))?;
    Ok(Json(SdkVolumeSnapshotCreateResponse { snapshot_id }))
}

async fn snapshot_enumerate(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkVolumeSnapshotEnumerateRequest>,
) -> RpcResult<SdkVolumeSnapshotEnumerateResponse> {
    require(&req.volume_id, MISSING_VOLUME_ID)?;
    let snapshots = backends
        .driver()?
        .snapshot_enumerate(&req.volume_id)
        .await
        .map_err(backend_failure("Failed to enumerate snapshots"))?;
    Ok(Json(SdkVolumeSnapshotEnumerateResponse {
        volume_snapshot_ids: snapshots.into_iter().map(|v| v.id).collect(),
    }))
}
