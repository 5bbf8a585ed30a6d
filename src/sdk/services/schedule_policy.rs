//! Schedule policy service.

use axum::routing::post;
use axum::{Extension, Json, Router};

use super::{backend_failure, require, RpcResult};
use crate::api::cluster::{
    SchedulePolicy, SdkSchedulePolicyCreateRequest, SdkSchedulePolicyCreateResponse,
    SdkSchedulePolicyDeleteRequest, SdkSchedulePolicyDeleteResponse,
    SdkSchedulePolicyEnumerateRequest, SdkSchedulePolicyEnumerateResponse,
    SdkSchedulePolicyInspectRequest, SdkSchedulePolicyInspectResponse,
    SdkSchedulePolicyUpdateRequest, SdkSchedulePolicyUpdateResponse,
};
use crate::api::RpcStatus;
use crate::sdk::extract::Rpc;
use crate::sdk::registrar::{method_path, ServiceDescriptor};
use crate::sdk::Backends;

pub const SERVICE: &str = "SchedulePolicy";

pub const DESCRIPTOR: ServiceDescriptor = ServiceDescriptor {
    name: SERVICE,
    methods: &["Create", "Update", "Enumerate", "Inspect", "Delete"],
};

const MISSING_NAME: &str = "Must supply Schedule name";

pub fn routes() -> Router {
    Router::new()
        .route(&method_path(SERVICE, "Create"), post(create))
        .route(&method_path(SERVICE, "Update"), post(update))
        .route(&method_path(SERVICE, "Enumerate"), post(enumerate))
        .route(&method_path(SERVICE, "Inspect"), post(inspect))
        .route(&method_path(SERVICE, "Delete"), post(delete))
}

fn named_policy(policy: Option<SchedulePolicy>) -> Result<SchedulePolicy, RpcStatus> {
    let policy = policy.ok_or_else(|| RpcStatus::invalid_argument("Must supply Schedule Policy"))?;
    require(&policy.name, MISSING_NAME)?;
    require(&policy.schedule, "Must supply Schedule")?;
    Ok(policy)
}

async fn create(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkSchedulePolicyCreateRequest>,
) -> RpcResult<SdkSchedulePolicyCreateResponse> {
    let policy = named_policy(req.schedule_policy)?;
    backends
        .cluster()?
        .sched_policy_create(&policy.name, &policy.schedule)
        .await
        .map_err(backend_failure("Failed to create schedule policy"))?;
    Ok(Json(SdkSchedulePolicyCreateResponse {}))
}

async fn update(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkSchedulePolicyUpdateRequest>,
) -> RpcResult<SdkSchedulePolicyUpdateResponse> {
    let policy = named_policy(req.schedule_policy)?;
    backends
        .cluster()?
        .sched_policy_update(&policy.name, &policy.schedule)
        .await
        .map_err(backend_failure("Failed to update schedule policy"))?;
    Ok(Json(SdkSchedulePolicyUpdateResponse {}))
}

async fn enumerate(
    Extension(backends): Extension<Backends>,
    Rpc(_req): Rpc<SdkSchedulePolicyEnumerateRequest>,
) -> RpcResult<SdkSchedulePolicyEnumerateResponse> {
    let policies = backends
        .cluster()?
        .sched_policy_enumerate()
        .await
        .map_err(backend_failure("Failed to enumerate schedule policies"))?;
    Ok(Json(SdkSchedulePolicyEnumerateResponse { policies }))
}

async fn inspect(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkSchedulePolicyInspectRequest>,
) -> RpcResult<SdkSchedulePolicyInspectResponse> {
    require(&req.name, MISSING_NAME)?;
    let policy = backends
        .cluster()?
        .sched_policy_inspect(&req.name)
        .await
        .map_err(backend_failure("Failed to inspect schedule policy"))?;
    Ok(Json(SdkSchedulePolicyInspectResponse { policy }))
}

async fn delete(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkSchedulePolicyDeleteRequest>,
) -> RpcResult<SdkSchedulePolicyDeleteResponse> {
    require(&req.name, MISSING_NAME)?;
    backends
        .cluster()?
        .sched_policy_delete(&req.name)
        .await
        .map_err(backend_failure("Failed to delete schedule policy"))?;
    Ok(Json(SdkSchedulePolicyDeleteResponse {}))
}
