//! Cloud migration service.

use axum::routing::post;
use axum::{Extension, Json, Router};

use super::{backend_failure, require, RpcResult};
use crate::api::migrate::{
    CloudMigrateOperation, CloudMigrateStartRequest, MigrateOpt, SdkCloudMigrateCancelRequest,
    SdkCloudMigrateCancelResponse, SdkCloudMigrateStartRequest, SdkCloudMigrateStartResponse,
    SdkCloudMigrateStatusRequest, SdkCloudMigrateStatusResponse,
};
use crate::api::RpcStatus;
use crate::sdk::extract::Rpc;
use crate::sdk::registrar::{method_path, ServiceDescriptor};
use crate::sdk::Backends;

pub const SERVICE: &str = "Migrate";

pub const DESCRIPTOR: ServiceDescriptor = ServiceDescriptor {
    name: SERVICE,
    methods: &["Start", "Cancel", "Status"],
};

pub fn routes() -> Router {
    Router::new()
        .route(&method_path(SERVICE, "Start"), post(start))
        .route(&method_path(SERVICE, "Cancel"), post(cancel))
        .route(&method_path(SERVICE, "Status"), post(status))
}

/// Translate the caller's request into the driver's start request.
pub fn driver_request(req: &SdkCloudMigrateStartRequest) -> Result<CloudMigrateStartRequest, RpcStatus> {
    require(&req.cluster_id, "Must supply valid Cluster ID")?;
    let (operation, target_id) = match &req.opt {
        Some(MigrateOpt::Volume { volume_id }) => {
            (CloudMigrateOperation::MigrateVolume, volume_id.clone())
        }
        Some(MigrateOpt::VolumeGroup { group_id }) => {
            (CloudMigrateOperation::MigrateVolumeGroup, group_id.clone())
        }
        Some(MigrateOpt::AllVolumes {}) => (CloudMigrateOperation::MigrateCluster, String::new()),
        None => return Err(RpcStatus::invalid_argument("Must supply valid migration operation")),
    };
    Ok(CloudMigrateStartRequest {
        operation,
        cluster_id: req.cluster_id.clone(),
        target_id,
        task_id: req.task_id.clone(),
    })
}

async fn start(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkCloudMigrateStartRequest>,
) -> RpcResult<SdkCloudMigrateStartResponse> {
    let request = driver_request(&req)?;
    let result = backends
        .driver()?
        .cloud_migrate_start(&request)
        .await
        .map_err(backend_failure("Failed to start migration"))?;
    Ok(Json(SdkCloudMigrateStartResponse { result }))
}

async fn cancel(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkCloudMigrateCancelRequest>,
) -> RpcResult<SdkCloudMigrateCancelResponse> {
    let request = req
        .request
        .filter(|r| !r.task_id.trim().is_empty())
        .ok_or_else(|| RpcStatus::invalid_argument("Must supply valid Task ID"))?;
    backends
        .driver()?
        .cloud_migrate_cancel(&request)
        .await
        .map_err(backend_failure("Failed to cancel migration"))?;
    Ok(Json(SdkCloudMigrateCancelResponse {}))
}

async fn status(
    Extension(backends): Extension<Backends>,
    Rpc(_req): Rpc<SdkCloudMigrateStatusRequest>,
) -> RpcResult<SdkCloudMigrateStatusResponse> {
    let result = backends
        .driver()?
        .cloud_migrate_status()
        .await
        .map_err(backend_failure("Failed to get migration status"))?;
    Ok(Json(SdkCloudMigrateStatusResponse { result }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RpcCode;

    fn start_request(opt: Option<MigrateOpt>) -> SdkCloudMigrateStartRequest {
        SdkCloudMigrateStartRequest {
            cluster_id: "Source".into(),
            task_id: String::new(),
            opt,
        }
    }

    #[test]
    fn maps_each_scope_to_operation() {
        let volume = driver_request(&start_request(Some(MigrateOpt::Volume {
            volume_id: "Target".into(),
        })))
        .unwrap();
        assert_eq!(volume.operation, CloudMigrateOperation::MigrateVolume);
        assert_eq!(volume.target_id, "Target");

        let group = driver_request(&start_request(Some(MigrateOpt::VolumeGroup {
            group_id: "Group".into(),
        })))
        .unwrap();
        assert_eq!(group.operation, CloudMigrateOperation::MigrateVolumeGroup);
        assert_eq!(group.target_id, "Group");

        let all = driver_request(&SdkCloudMigrateStartRequest {
            task_id: "1".into(),
            ..start_request(Some(MigrateOpt::AllVolumes {}))
        })
        .unwrap();
        assert_eq!(
            all,
            CloudMigrateStartRequest {
                operation: CloudMigrateOperation::MigrateCluster,
                cluster_id: "Source".into(),
                target_id: String::new(),
                task_id: "1".into(),
            }
        );
    }

    #[test]
    fn rejects_missing_cluster_or_scope() {
        let err = driver_request(&SdkCloudMigrateStartRequest::default()).unwrap_err();
        assert_eq!(err.code, RpcCode::InvalidArgument);
        assert_eq!(err.message, "Must supply valid Cluster ID");

        let err = driver_request(&start_request(None)).unwrap_err();
        assert_eq!(err.message, "Must supply valid migration operation");
    }
}
