//! Identity service: what this endpoint serves and which driver backs it.

use axum::routing::post;
use axum::{Extension, Json, Router};

use super::{backend_failure, RpcResult};
use crate::api::identity::{
    SdkIdentityCapabilitiesRequest, SdkIdentityCapabilitiesResponse,
    SdkIdentityVersionRequest, SdkIdentityVersionResponse, SdkVersion, ServiceCapability,
};
use crate::sdk::extract::Rpc;
use crate::sdk::registrar::{method_path, ServiceDescriptor, NAMESPACE, SERVICES};
use crate::sdk::Backends;

pub const SERVICE: &str = "Identity";

pub const DESCRIPTOR: ServiceDescriptor = ServiceDescriptor {
    name: SERVICE,
    methods: &["Capabilities", "Version"],
};

pub fn routes() -> Router {
    Router::new()
        .route(&method_path(SERVICE, "Capabilities"), post(capabilities))
        .route(&method_path(SERVICE, "Version"), post(version))
}

/// Version of the API surface, taken from the crate version.
pub fn sdk_version() -> SdkVersion {
    let parse = |s: &str| s.parse().unwrap_or_default();
    SdkVersion {
        major: parse(env!("CARGO_PKG_VERSION_MAJOR")),
        minor: parse(env!("CARGO_PKG_VERSION_MINOR")),
        patch: parse(env!("CARGO_PKG_VERSION_PATCH")),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

async fn capabilities(
    Rpc(_req): Rpc<SdkIdentityCapabilitiesRequest>,
) -> RpcResult<SdkIdentityCapabilitiesResponse> {
    let capabilities = SERVICES
        .iter()
        .map(|service| ServiceCapability {
            service: format!("{NAMESPACE}{}", service.name),
            methods: service.methods.iter().map(|m| m.to_string()).collect(),
        })
        .collect();
    Ok(Json(SdkIdentityCapabilitiesResponse { capabilities }))
}

async fn version(
    Extension(backends): Extension<Backends>,
    Rpc(_req): Rpc<SdkIdentityVersionRequest>,
) -> RpcResult<SdkIdentityVersionResponse> {
    let version = backends
        .driver()?
        .version()
        .await
        .map_err(backend_failure("Failed to get driver version"))?;
    Ok(Json(SdkIdentityVersionResponse {
        sdk_version: sdk_version(),
        version,
    }))
}
