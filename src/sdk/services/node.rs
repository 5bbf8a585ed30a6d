//! Node service.

use axum::routing::post;
use axum::{Extension, Json, Router};

use super::{backend_failure, require, RpcResult};
use crate::api::cluster::{
    SdkNodeEnumerateRequest, SdkNodeEnumerateResponse, SdkNodeInspectCurrentRequest,
    SdkNodeInspectCurrentResponse, SdkNodeInspectRequest, SdkNodeInspectResponse,
};
use crate::sdk::extract::Rpc;
use crate::sdk::registrar::{method_path, ServiceDescriptor};
use crate::sdk::Backends;

pub const SERVICE: &str = "Node";

pub const DESCRIPTOR: ServiceDescriptor = ServiceDescriptor {
    name: SERVICE,
    methods: &["Inspect", "Enumerate", "InspectCurrent"],
};

pub fn routes() -> Router {
    Router::new()
        .route(&method_path(SERVICE, "Inspect"), post(inspect))
        .route(&method_path(SERVICE, "Enumerate"), post(enumerate))
        .route(&method_path(SERVICE, "InspectCurrent"), post(inspect_current))
}

async fn inspect(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkNodeInspectRequest>,
) -> RpcResult<SdkNodeInspectResponse> {
    require(&req.node_id, "Node id must be provided")?;
    let node = backends
        .cluster()?
        .inspect_node(&req.node_id)
        .await
        .map_err(backend_failure("Failed to inspect node"))?;
    Ok(Json(SdkNodeInspectResponse { node }))
}

async fn enumerate(
    Extension(backends): Extension<Backends>,
    Rpc(_req): Rpc<SdkNodeEnumerateRequest>,
) -> RpcResult<SdkNodeEnumerateResponse> {
    let nodes = backends
        .cluster()?
        .enumerate_nodes()
        .await
        .map_err(backend_failure("Failed to enumerate nodes"))?;
    Ok(Json(SdkNodeEnumerateResponse {
        node_ids: nodes.into_iter().map(|n| n.id).collect(),
    }))
}

async fn inspect_current(
    Extension(backends): Extension<Backends>,
    Rpc(_req): Rpc<SdkNodeInspectCurrentRequest>,
) -> RpcResult<SdkNodeInspectCurrentResponse> {
    let cluster = backends.cluster()?;
    let info = cluster
        .enumerate()
        .await
        .map_err(backend_failure("Failed to inspect cluster"))?;
    let node = cluster
        .inspect_node(&info.node_id)
        .await
        .map_err(backend_failure("Failed to inspect current node"))?;
    Ok(Json(SdkNodeInspectCurrentResponse { node }))
}
