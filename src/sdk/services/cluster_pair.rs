//! Cluster pair service.

use axum::routing::post;
use axum::{Extension, Json, Router};

use super::{backend_failure, require, RpcResult};
use crate::api::cluster::{
    SdkClusterPairCreateRequest, SdkClusterPairCreateResponse, SdkClusterPairDeleteRequest,
    SdkClusterPairDeleteResponse, SdkClusterPairEnumerateRequest,
    SdkClusterPairEnumerateResponse, SdkClusterPairGetTokenRequest,
    SdkClusterPairInspectRequest, SdkClusterPairInspectResponse,
    SdkClusterPairResetTokenRequest, SdkClusterPairTokenResponse,
};
use crate::sdk::extract::Rpc;
use crate::sdk::registrar::{method_path, ServiceDescriptor};
use crate::sdk::Backends;

pub const SERVICE: &str = "ClusterPair";

pub const DESCRIPTOR: ServiceDescriptor = ServiceDescriptor {
    name: SERVICE,
    methods: &[
        "Create",
        "Inspect",
        "Enumerate",
        "Delete",
        "GetToken",
        "ResetToken",
    ],
};

const MISSING_CLUSTER_ID: &str = "Must supply cluster ID";

pub fn routes() -> Router {
    Router::new()
        .route(&method_path(SERVICE, "Create"), post(create))
        .route(&method_path(SERVICE, "Inspect"), post(inspect))
        .route(&method_path(SERVICE, "Enumerate"), post(enumerate))
        .route(&method_path(SERVICE, "Delete"), post(delete))
        .route(&method_path(SERVICE, "GetToken"), post(get_token))
        .route(&method_path(SERVICE, "ResetToken"), post(reset_token))
}

async fn create(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkClusterPairCreateRequest>,
) -> RpcResult<SdkClusterPairCreateResponse> {
    require(&req.remote_cluster_ip, "Must supply remote cluster IP")?;
    require(&req.remote_cluster_token, "Must supply remote cluster token")?;
    let result = backends
        .cluster()?
        .pair_create(&req)
        .await
        .map_err(backend_failure("Failed to create cluster pair"))?;
    Ok(Json(SdkClusterPairCreateResponse { result }))
}

async fn inspect(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkClusterPairInspectRequest>,
) -> RpcResult<SdkClusterPairInspectResponse> {
    require(&req.cluster_id, MISSING_CLUSTER_ID)?;
    let pair_info = backends
        .cluster()?
        .pair_inspect(&req.cluster_id)
        .await
        .map_err(backend_failure("Failed to inspect cluster pair"))?;
    Ok(Json(SdkClusterPairInspectResponse { pair_info }))
}

async fn enumerate(
    Extension(backends): Extension<Backends>,
    Rpc(_req): Rpc<SdkClusterPairEnumerateRequest>,
) -> RpcResult<SdkClusterPairEnumerateResponse> {
    let response = backends
        .cluster()?
        .pair_enumerate()
        .await
        .map_err(backend_failure("Failed to enumerate cluster pairs"))?;
    Ok(Json(response))
}

async fn delete(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkClusterPairDeleteRequest>,
) -> RpcResult<SdkClusterPairDeleteResponse> {
    require(&req.cluster_id, MISSING_CLUSTER_ID)?;
    backends
        .cluster()?
        .pair_delete(&req.cluster_id)
        .await
        .map_err(backend_failure("Failed to delete cluster pair"))?;
    Ok(Json(SdkClusterPairDeleteResponse {}))
}

async fn get_token(
    Extension(backends): Extension<Backends>,
    Rpc(_req): Rpc<SdkClusterPairGetTokenRequest>,
) -> RpcResult<SdkClusterPairTokenResponse> {
    let token = backends
        .cluster()?
        .pair_get_token()
        .await
        .map_err(backend_failure("Failed to get cluster pair token"))?;
    Ok(Json(SdkClusterPairTokenResponse { token }))
}

async fn reset_token(
    Extension(backends): Extension<Backends>,
    Rpc(_req): Rpc<SdkClusterPairResetTokenRequest>,
) -> RpcResult<SdkClusterPairTokenResponse> {
    let token = backends
        .cluster()?
        .pair_reset_token()
        .await
        .map_err(backend_failure("Failed to reset cluster pair token"))?;
    Ok(Json(SdkClusterPairTokenResponse { token }))
}
