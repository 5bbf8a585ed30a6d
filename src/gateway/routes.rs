//! REST path to RPC method mapping.
//!
//! # Design Decisions
//! - Resources are a fixed table, one per operation group
//! - Actions are kebab-case method names; the listener decides whether the
//!   method exists

use crate::sdk::registrar::method_path;
use crate::sdk::services;

/// `(resource, service)` pairs served under `/v1/<resource>/`.
pub const RESOURCES: &[(&str, &str)] = &[
    ("identities", services::identity::SERVICE),
    ("clusters", services::cluster::SERVICE),
    ("nodes", services::node::SERVICE),
    ("volumes", services::volume::SERVICE),
    ("mountattach", services::mount_attach::SERVICE),
    ("migrate", services::migrate::SERVICE),
    ("objectstores", services::objectstore::SERVICE),
    ("schedulepolicies", services::schedule_policy::SERVICE),
    ("credentials", services::credentials::SERVICE),
    ("cloudbackups", services::cloud_backup::SERVICE),
    ("alerts", services::alerts::SERVICE),
    ("clusterpairs", services::cluster_pair::SERVICE),
];

/// Service name behind `resource`.
pub fn service_for(resource: &str) -> Option<&'static str> {
    RESOURCES
        .iter()
        .find(|(name, _)| *name == resource)
        .map(|(_, service)| *service)
}

/// `snapshot-create` → `SnapshotCreate`.
pub fn pascal_case(action: &str) -> String {
    action
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Method path for `/v1/<resource>/<action>`, if the resource exists.
pub fn resolve(resource: &str, action: &str) -> Option<String> {
    let service = service_for(resource)?;
    let method = pascal_case(action);
    if method.is_empty() {
        return None;
    }
    Some(method_path(service, &method))
}
