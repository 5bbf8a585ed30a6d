//! Cloud credentials service.

use axum::routing::post;
use axum::{Extension, Json, Router};

use super::{backend_failure, require, RpcResult};
use crate::api::credentials::{
    SdkCredentialCreateRequest, SdkCredentialCreateResponse, SdkCredentialDeleteResponse,
    SdkCredentialEnumerateRequest, SdkCredentialEnumerateResponse, SdkCredentialIdRequest,
    SdkCredentialInspectResponse, SdkCredentialValidateResponse,
};
use crate::api::RpcStatus;
use crate::sdk::extract::Rpc;
use crate::sdk::registrar::{method_path, ServiceDescriptor};
use crate::sdk::Backends;

pub const SERVICE: &str = "Credentials";

pub const DESCRIPTOR: ServiceDescriptor = ServiceDescriptor {
    name: SERVICE,
    methods: &["Create", "Enumerate", "Inspect", "Delete", "Validate"],
};

pub(crate) const MISSING_CREDENTIAL_ID: &str = "Must provide credential uuid";

pub fn routes() -> Router {
    Router::new()
        .route(&method_path(SERVICE, "Create"), post(create))
        .route(&method_path(SERVICE, "Enumerate"), post(enumerate))
        .route(&method_path(SERVICE, "Inspect"), post(inspect))
        .route(&method_path(SERVICE, "Delete"), post(delete))
        .route(&method_path(SERVICE, "Validate"), post(validate))
}

async fn create(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkCredentialCreateRequest>,
) -> RpcResult<SdkCredentialCreateResponse> {
    require(&req.name, "Must supply a name")?;
    if req.provider.is_none() {
        return Err(RpcStatus::invalid_argument("Must supply credential provider"));
    }
    let credential_id = backends
        .driver()?
        .credentials_create(&req)
        .await
        .map_err(backend_failure("Failed to create credentials"))?;
    Ok(Json(SdkCredentialCreateResponse { credential_id }))
}

async fn enumerate(
    Extension(backends): Extension<Backends>,
    Rpc(_req): Rpc<SdkCredentialEnumerateRequest>,
) -> RpcResult<SdkCredentialEnumerateResponse> {
    let credentials = backends
        .driver()?
        .credentials_enumerate()
        .await
        .map_err(backend_failure("Failed to enumerate credentials"))?;
    Ok(Json(SdkCredentialEnumerateResponse {
        credential_ids: credentials.into_iter().map(|c| c.credential_id).collect(),
    }))
}

async fn inspect(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkCredentialIdRequest>,
) -> RpcResult<SdkCredentialInspectResponse> {
    require(&req.credential_id, MISSING_CREDENTIAL_ID)?;
    let credential = backends
        .driver()?
        .credentials_inspect(&req.credential_id)
        .await
        .map_err(backend_failure("Failed to inspect credentials"))?;
    Ok(Json(SdkCredentialInspectResponse { credential }))
}

async fn delete(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkCredentialIdRequest>,
) -> RpcResult<SdkCredentialDeleteResponse> {
    require(&req.credential_id, MISSING_CREDENTIAL_ID)?;
    backends
        .driver()?
        .credentials_delete(&req.credential_id)
        .await
        .map_err(backend_failure("Failed to delete credentials"))?;
    Ok(Json(SdkCredentialDeleteResponse {}))
}

async fn validate(
    Extension(backends): Extension<Backends>,
    Rpc(req): Rpc<SdkCredentialIdRequest>,
) -> RpcResult<SdkCredentialValidateResponse> {
    require(&req.credential_id, MISSING_CREDENTIAL_ID)?;
    backends
        .driver()?
        .credentials_validate(&req.credential_id)
        .await
        .map_err(backend_failure("Failed to validate credentials"))?;
    Ok(Json(SdkCredentialValidateResponse {}))
}
