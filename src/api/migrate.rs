//! Cloud migration wire types.
//!
//! The `Sdk*` types are what callers send; the un-prefixed request and
//! response types are what the volume driver receives and returns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Scope of a migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudMigrateOperation {
    #[default]
    MigrateCluster,
    MigrateVolume,
    MigrateVolumeGroup,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudMigrateStage {
    #[default]
    Invalid,
    Backup,
    Restore,
    VolumeUpdate,
    Done,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudMigrateStatus {
    #[default]
    Invalid,
    Queued,
    Initialized,
    InProgress,
    Failed,
    Complete,
    Canceled,
}

/// Driver-level start request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudMigrateStartRequest {
    pub operation: CloudMigrateOperation,
    pub cluster_id: String,
    /// Volume or group id; empty for cluster-wide migrations.
    pub target_id: String,
    pub task_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudMigrateStartResponse {
    pub task_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudMigrateCancelRequest {
    pub task_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudMigrateInfo {
    pub task_id: String,
    pub cluster_id: String,
    pub local_volume_id: String,
    pub local_volume_name: String,
    pub remote_volume_id: String,
    pub cloudbackup_id: String,
    pub current_stage: CloudMigrateStage,
    pub status: CloudMigrateStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudMigrateInfoList {
    pub list: Vec<CloudMigrateInfo>,
}

/// Migrations keyed by cluster id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudMigrateStatusResponse {
    pub info: BTreeMap<String, CloudMigrateInfoList>,
}

/// What a start request migrates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrateOpt {
    Volume { volume_id: String },
    VolumeGroup { group_id: String },
    AllVolumes {},
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCloudMigrateStartRequest {
    pub cluster_id: String,
    pub task_id: String,
    pub opt: Option<MigrateOpt>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCloudMigrateStartResponse {
    pub result: CloudMigrateStartResponse,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCloudMigrateCancelRequest {
    pub request: Option<CloudMigrateCancelRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkCloudMigrateCancelResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkCloudMigrateStatusRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCloudMigrateStatusResponse {
    pub result: CloudMigrateStatusResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_opt_uses_external_tagging() {
        let req: SdkCloudMigrateStartRequest = serde_json::from_str(
            r#"{"cluster_id":"Source","opt":{"volume":{"volume_id":"Target"}}}"#,
        )
        .unwrap();
        assert_eq!(
            req.opt,
            Some(MigrateOpt::Volume {
                volume_id: "Target".into()
            })
        );

        let all: SdkCloudMigrateStartRequest =
            serde_json::from_str(r#"{"cluster_id":"Source","opt":{"all_volumes":{}}}"#).unwrap();
        assert_eq!(all.opt, Some(MigrateOpt::AllVolumes {}));
        assert!(all.task_id.is_empty());
    }
}
