//! Request, response and error types exchanged on the wire.
//!
//! Everything here is plain serde data. Requests use `#[serde(default)]` so
//! omitted fields arrive as empty values and are rejected by the service
//! dispatchers rather than by the JSON decoder.

pub mod alerts;
pub mod cluster;
pub mod credentials;
pub mod identity;
pub mod migrate;
pub mod status;
pub mod volume;

use std::collections::BTreeMap;

pub use status::{RpcCode, RpcStatus, STATUS_HEADER};

/// String key/value pairs attached to volumes and passed as options.
pub type Labels = BTreeMap<String, String>;
