//! Cloud backup service.

use axum::routing::post;
use axum::{Extension, Json, Router};

use super::credentials::MISSING_CREDENTIAL_ID;
use super::volume::MISSING_VOLUME_ID;
use super::{backend_failure, require, RpcResult};
use crate::api::credentials::{
    SdkCloudBackupCreateRequest, SdkCloudBackupCreateResponse, SdkCloudBackupDeleteRequest,
    SdkCloudBackupDeleteResponse, SdkCloudBackupEnumerateRequest,
    SdkCloudBackupEnumerateResponse, SdkCloudBackupRestoreRequest,
    SdkCloudBackupRestoreResponse, SdkCloudBackupStatusRequest, SdkCloudBackupStatusResponse,
};
use crate::sdk::extract::Rpc;
use crate::sdk::registrar::{method_path, ServiceDescriptor};
use crate::sdk::Backends;

pub const SERVICE: &str = "CloudBackup";

pub const DESCRIPTOR: ServiceDescriptor = ServiceDescriptor {
    name: SERVICE,
    methods: &["Create", "Restore", "Enumerate", "Status", "Delete"],
};

const MISSING_BACKUP_ID: &str = "Must provide backup id";

pub fn routes() -> Router {
    Router::new()
        .route(&method_path(SERVICE, "Create"), post(create))
        .route(&method_path(SERVICE, "Restore"), post(restore))
        .route(&method_path(SERVICE, "Enumerate"), post(enumerate))
        .route(&method_path(SERVICE, "Status"), post(status))
        .route(&method_path(SERVICE, "Delete"), post(delete))
}

async fn create(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkCloudBackupCreateRequest>,
) -> RpcResult<SdkCloudBackupCreateResponse> {
    require(&req.volume_id, MISSING_VOLUME_ID)?;
    require(&req.credential_id, MISSING_CREDENTIAL_ID)?;
    let task_id = backends
        .driver()?
        .cloud_backup_create(&req)
        .await
        .map_err(backend_failure("Failed to create backup"))?;
    Ok(Json(SdkCloudBackupCreateResponse { task_id }))
}

async fn restore(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkCloudBackupRestoreRequest>,
) -> RpcResult<SdkCloudBackupRestoreResponse> {
    require(&req.backup_id, MISSING_BACKUP_ID)?;
    require(&req.credential_id, MISSING_CREDENTIAL_ID)?;
    let response = backends
        .driver()?
        .cloud_backup_restore(&req)
        .await
        .map_err(backend_failure("Failed to restore backup"))?;
    Ok(Json(response))
}

async fn enumerate(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkCloudBackupEnumerateRequest>,
) -> RpcResult<SdkCloudBackupEnumerateResponse> {
    let backups = backends
        .driver()?
        .cloud_backup_enumerate(&req)
        .await
        .map_err(backend_failure("Failed to enumerate backups"))?;
    Ok(Json(SdkCloudBackupEnumerateResponse { backups }))
}

async fn status(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkCloudBackupStatusRequest>,
) -> RpcResult<SdkCloudBackupStatusResponse> {
    let statuses = backends
        .driver()?
        .cloud_backup_status(&req)
        .await
        .map_err(backend_failure("Failed to get backup status"))?;
    Ok(Json(SdkCloudBackupStatusResponse { statuses }))
}

async fn delete(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkCloudBackupDeleteRequest>,
) -> RpcResult<SdkCloudBackupDeleteResponse> {
    require(&req.backup_id, MISSING_BACKUP_ID)?;
    require(&req.credential_id, MISSING_CREDENTIAL_ID)?;
    backends
        .driver()?
        .cloud_backup_delete(&req)
        .await
        .map_err(backend_failure("Failed to delete backup"))?;
    Ok(Json(SdkCloudBackupDeleteResponse {}))
}
