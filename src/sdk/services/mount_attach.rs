//! Mount/attach service.

use axum::routing::post;
use axum::{Extension, Json, Router};

use super::volume::MISSING_VOLUME_ID;
use super::{backend_failure, require, RpcResult};
use crate::api::volume::{
    SdkVolumeAttachRequest, SdkVolumeAttachResponse, SdkVolumeDetachRequest,
    SdkVolumeDetachResponse, SdkVolumeMountRequest, SdkVolumeMountResponse,
    SdkVolumeUnmountRequest, SdkVolumeUnmountResponse,
};
use crate::sdk::extract::Rpc;
use crate::sdk::registrar::{method_path, ServiceDescriptor};
use crate::sdk::Backends;

pub const SERVICE: &str = "MountAttach";

pub const DESCRIPTOR: ServiceDescriptor = ServiceDescriptor {
    name: SERVICE,
    methods: &["Attach", "Detach", "Mount", "Unmount"],
};

const INVALID_MOUNT_PATH: &str = "Invalid Mount Path";

pub fn routes() -> Router {
    Router::new()
        .route(&method_path(SERVICE, "Attach"), post(attach))
        .route(&method_path(SERVICE, "Detach"), post(detach))
        .route(&method_path(SERVICE, "Mount"), post(mount))
        .route(&method_path(SERVICE, "Unmount"), post(unmount))
}

async fn attach(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkVolumeAttachRequest>,
) -> RpcResult<SdkVolumeAttachResponse> {
    require(&req.volume_id, MISSING_VOLUME_ID)?;
    let device_path = backends
        .driver()?
        .attach(&req.volume_id, &req.options)
        .await
        .map_err(backend_failure("Failed to attach volume"))?;
    Ok(Json(SdkVolumeAttachResponse { device_path }))
}

async fn detach(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkVolumeDetachRequest>,
) -> RpcResult<SdkVolumeDetachResponse> {
    require(&req.volume_id, MISSING_VOLUME_ID)?;
    backends
        .driver()?
        .detach(&req.volume_id, &req.options)
        .await
        .map_err(backend_failure("Failed to detach volume"))?;
    Ok(Json(SdkVolumeDetachResponse {}))
}

async fn mount(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkVolumeMountRequest>,
) -> RpcResult<SdkVolumeMountResponse> {
    require(&req.volume_id, MISSING_VOLUME_ID)?;
    require(&req.mount_path, INVALID_MOUNT_PATH)?;
    backends
        .driver()?
        .mount(&req.volume_id, &req.mount_path, &req.options)
        .await
        .map_err(backend_failure("Failed to mount volume"))?;
    Ok(Json(SdkVolumeMountResponse {}))
}

async fn unmount(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkVolumeUnmountRequest>,
) -> RpcResult<SdkVolumeUnmountResponse> {
    require(&req.volume_id, MISSING_VOLUME_ID)?;
    require(&req.mount_path, INVALID_MOUNT_PATH)?;
    backends
        .driver()?
        .unmount(&req.volume_id, &req.mount_path, &req.options)
        .await
        .map_err(backend_failure("Failed to unmount volume"))?;
    Ok(Json(SdkVolumeUnmountResponse {}))
}
