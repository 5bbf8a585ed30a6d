//! Binds every operation group to one router.
//!
//! Method paths follow `/openstorage.api.OpenStorage<Service>/<Method>` and
//! are served with `POST`. Anything else is answered with `NotFound`.

use axum::http::Uri;
use axum::Router;

use super::services;
use crate::api::RpcStatus;

/// Package and service-name prefix of every method path.
pub const NAMESPACE: &str = "openstorage.api.OpenStorage";

/// Full path of `service`.`method`.
pub fn method_path(service: &str, method: &str) -> String {
    format!("/{NAMESPACE}{service}/{method}")
}

/// True when `path` names a method in [`SERVICES`].
pub fn is_registered(path: &str) -> bool {
    let Some((service, method)) = path
        .strip_prefix('/')
        .and_then(|p| p.strip_prefix(NAMESPACE))
        .and_then(|p| p.split_once('/'))
    else {
        return false;
    };
    SERVICES
        .iter()
        .any(|s| s.name == service && s.methods.iter().any(|m| *m == method))
}

/// One exposed operation group.
#[derive(Debug, Clone, Copy)]
pub struct ServiceDescriptor {
    pub name: &'static str,
    pub methods: &'static [&'static str],
}

/// Fixed table of operation groups.
pub const SERVICES: &[ServiceDescriptor] = &[
    services::identity::DESCRIPTOR,
    services::cluster::DESCRIPTOR,
    services::node::DESCRIPTOR,
    services::volume::DESCRIPTOR,
    services::mount_attach::DESCRIPTOR,
    services::migrate::DESCRIPTOR,
    services::objectstore::DESCRIPTOR,
    services::schedule_policy::DESCRIPTOR,
    services::credentials::DESCRIPTOR,
    services::cloud_backup::DESCRIPTOR,
    services::alerts::DESCRIPTOR,
    services::cluster_pair::DESCRIPTOR,
];

/// Router with every group registered.
pub fn routes() -> Router {
    Router::new()
        .merge(services::identity::routes())
        .merge(services::cluster::routes())
        .merge(services::node::routes())
        .merge(services::volume::routes())
        .merge(services::mount_attach::routes())
        .merge(services::migrate::routes())
        .merge(services::objectstore::routes())
        .merge(services::schedule_policy::routes())
        .merge(services::credentials::routes())
        .merge(services::cloud_backup::routes())
        .merge(services::alerts::routes())
        .merge(services::cluster_pair::routes())
        .fallback(unknown_method)
}

async fn unknown_method(uri: Uri) -> RpcStatus {
    RpcStatus::not_found(format!("Unknown method {}", uri.path()))
}
