//! Cluster, node, object store, schedule policy and cluster pair wire types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Init,
    Ok,
    Offline,
    Error,
    NotInQuorum,
    Maintenance,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageNode {
    pub id: String,
    pub hostname: String,
    pub mgmt_ip: String,
    pub data_ip: String,
    pub status: Status,
    pub mem_total: u64,
    pub mem_used: u64,
}

/// Cluster view reported by the cluster backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterInfo {
    pub id: String,
    pub name: String,
    pub status: Status,
    /// Node this process runs on.
    pub node_id: String,
    pub nodes: Vec<StorageNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageCluster {
    pub id: String,
    pub name: String,
    pub status: Status,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkClusterInspectCurrentRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkClusterInspectCurrentResponse {
    pub cluster: StorageCluster,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkNodeInspectRequest {
    pub node_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkNodeInspectResponse {
    pub node: StorageNode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkNodeEnumerateRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkNodeEnumerateResponse {
    pub node_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkNodeInspectCurrentRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkNodeInspectCurrentResponse {
    pub node: StorageNode,
}

// Object stores

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectstoreInfo {
    pub uuid: String,
    pub volume_id: String,
    pub enabled: bool,
    pub status: String,
    pub region: String,
    pub access_port: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkObjectstoreInspectRequest {
    pub objectstore_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkObjectstoreInspectResponse {
    pub objectstore_status: ObjectstoreInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkObjectstoreCreateRequest {
    pub volume_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkObjectstoreCreateResponse {
    pub objectstore_status: ObjectstoreInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkObjectstoreUpdateRequest {
    pub objectstore_id: String,
    pub enable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkObjectstoreUpdateResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkObjectstoreDeleteRequest {
    pub objectstore_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkObjectstoreDeleteResponse {}

// Schedule policies

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulePolicy {
    pub name: String,
    /// Schedule expression, e.g. `periodic=60,10`.
    pub schedule: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkSchedulePolicyCreateRequest {
    pub schedule_policy: Option<SchedulePolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkSchedulePolicyCreateResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkSchedulePolicyUpdateRequest {
    pub schedule_policy: Option<SchedulePolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkSchedulePolicyUpdateResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkSchedulePolicyEnumerateRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkSchedulePolicyEnumerateResponse {
    pub policies: Vec<SchedulePolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkSchedulePolicyInspectRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkSchedulePolicyInspectResponse {
    pub policy: SchedulePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkSchedulePolicyDeleteRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkSchedulePolicyDeleteResponse {}

// Cluster pairs

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterPairInfo {
    pub id: String,
    pub name: String,
    pub endpoints: Vec<String>,
    pub secure: bool,
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkClusterPairCreateRequest {
    pub remote_cluster_ip: String,
    pub remote_cluster_port: u32,
    pub remote_cluster_token: String,
    pub set_default: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterPairCreateResult {
    pub remote_cluster_id: String,
    pub remote_cluster_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkClusterPairCreateResponse {
    pub result: ClusterPairCreateResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkClusterPairInspectRequest {
    pub cluster_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkClusterPairInspectResponse {
    pub pair_info: ClusterPairInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkClusterPairEnumerateRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkClusterPairEnumerateResponse {
    pub default_id: String,
    pub pairs: BTreeMap<String, ClusterPairInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkClusterPairDeleteRequest {
    pub cluster_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkClusterPairDeleteResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkClusterPairGetTokenRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkClusterPairResetTokenRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkClusterPairTokenResponse {
    pub token: String,
}
