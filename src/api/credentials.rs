//! Cloud credential and cloud backup wire types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Labels;

/// Provider-specific secret material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialProvider {
    AwsCredential {
        access_key: String,
        secret_key: String,
        endpoint: String,
        region: String,
    },
    AzureCredential {
        account_name: String,
        account_key: String,
    },
    GoogleCredential {
        project_id: String,
        json_key: String,
    },
}

impl CredentialProvider {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AwsCredential { .. } => "aws",
            Self::AzureCredential { .. } => "azure",
            Self::GoogleCredential { .. } => "google",
        }
    }
}

/// Credential as reported back to callers; secrets are never echoed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialInfo {
    pub credential_id: String,
    pub name: String,
    pub bucket: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCredentialCreateRequest {
    pub name: String,
    pub bucket: String,
    pub encryption_key: String,
    pub provider: Option<CredentialProvider>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCredentialCreateResponse {
    pub credential_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkCredentialEnumerateRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCredentialEnumerateResponse {
    pub credential_ids: Vec<String>,
}

/// Shared shape of inspect, delete and validate requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCredentialIdRequest {
    pub credential_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCredentialInspectResponse {
    pub credential: CredentialInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkCredentialDeleteResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkCredentialValidateResponse {}

// Cloud backups

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudBackupStatusType {
    #[default]
    Unknown,
    NotStarted,
    InProgress,
    Done,
    Paused,
    Stopped,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudBackupInfo {
    pub id: String,
    pub src_volume_id: String,
    pub src_volume_name: String,
    pub timestamp_secs: u64,
    pub status: CloudBackupStatusType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudBackupStatus {
    pub backup_id: String,
    pub op_type: String,
    pub status: CloudBackupStatusType,
    pub bytes_done: u64,
    pub node_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCloudBackupCreateRequest {
    pub volume_id: String,
    pub credential_id: String,
    pub full: bool,
    pub task_id: String,
    pub labels: Labels,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCloudBackupCreateResponse {
    pub task_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCloudBackupRestoreRequest {
    pub backup_id: String,
    pub restore_volume_name: String,
    pub credential_id: String,
    pub node_id: String,
    pub task_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCloudBackupRestoreResponse {
    pub restore_volume_id: String,
    pub task_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCloudBackupEnumerateRequest {
    pub src_volume_id: String,
    pub cluster_id: String,
    pub credential_id: String,
    pub all: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCloudBackupEnumerateResponse {
    pub backups: Vec<CloudBackupInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCloudBackupStatusRequest {
    pub volume_id: String,
    pub local: bool,
    pub task_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCloudBackupStatusResponse {
    pub statuses: BTreeMap<String, CloudBackupStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkCloudBackupDeleteRequest {
    pub backup_id: String,
    pub credential_id: String,
    pub force: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkCloudBackupDeleteResponse {}
