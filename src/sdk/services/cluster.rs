//! Cluster service.

use axum::routing::post;
use axum::{Extension, Json, Router};

use super::{backend_failure, RpcResult};
use crate::api::cluster::{
    SdkClusterInspectCurrentRequest, SdkClusterInspectCurrentResponse, StorageCluster,
};
use crate::sdk::extract::Rpc;
use crate::sdk::registrar::{method_path, ServiceDescriptor};
use crate::sdk::Backends;

pub const SERVICE: &str = "Cluster";

pub const DESCRIPTOR: ServiceDescriptor = ServiceDescriptor {
    name: SERVICE,
    methods: &["InspectCurrent"],
};

pub fn routes() -> Router {
    Router::new().route(&method_path(SERVICE, "InspectCurrent"), post(inspect_current))
}

async fn inspect_current(
    Extension(backends): Extension<Backends>,
    Rpc(_req): Rpc<SdkClusterInspectCurrentRequest>,
) -> RpcResult<SdkClusterInspectCurrentResponse> {
    let info = backends
        .cluster()?
        .enumerate()
        .await
        .map_err(backend_failure("Failed to inspect cluster"))?;
    Ok(Json(SdkClusterInspectCurrentResponse {
        cluster: StorageCluster {
            id: info.id,
            name: info.name,
            status: info.status,
        },
    }))
}
