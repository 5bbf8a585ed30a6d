//! Operation-group dispatchers.
//!
//! Every handler follows the same order: validate the request shape, take
//! the backend from the [`Backends`](crate::sdk::Backends) hold, call it,
//! and map backend failures to `Internal`.

pub mod alerts;
pub mod cloud_backup;
pub mod cluster;
pub mod cluster_pair;
pub mod credentials;
pub mod identity;
pub mod migrate;
pub mod mount_attach;
pub mod node;
pub mod objectstore;
pub mod schedule_policy;
pub mod volume;

use crate::api::RpcStatus;
use crate::backend::BackendError;

pub(crate) type RpcResult<T> = Result<axum::Json<T>, RpcStatus>;

/// `InvalidArgument` with `message` when `value` is empty.
pub(crate) fn require(value: &str, message: &str) -> Result<(), RpcStatus> {
    if value.trim().is_empty() {
        Err(RpcStatus::invalid_argument(message))
    } else {
        Ok(())
    }
}

/// Backend failures surface as `Internal` with the backend's message.
pub(crate) fn backend_failure(context: &str) -> impl FnOnce(BackendError) -> RpcStatus + '_ {
    move |err| RpcStatus::internal(format!("{context}: {err}"))
}
