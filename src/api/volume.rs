//! Volume and mount/attach wire types.

use serde::{Deserialize, Serialize};

use super::Labels;

/// Requested properties of a volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSpec {
    /// Size in bytes.
    pub size: u64,
    /// Number of replicas.
    pub ha_level: u32,
    /// Filesystem format, e.g. `ext4`.
    pub format: String,
    /// Whether the volume may be attached on several nodes.
    pub shared: bool,
}

/// Partial spec applied by `Volume.Update`; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSpecUpdate {
    pub size: Option<u64>,
    pub ha_level: Option<u32>,
    pub shared: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachState {
    #[default]
    Detached,
    Attached,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volume {
    pub id: String,
    pub name: String,
    pub spec: VolumeSpec,
    pub labels: Labels,
    pub state: AttachState,
    /// Device path while attached.
    pub device_path: String,
    /// Mount paths currently in use.
    pub attach_path: Vec<String>,
    /// Parent volume id for snapshots.
    pub parent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeCreateRequest {
    pub name: String,
    pub spec: Option<VolumeSpec>,
    pub labels: Labels,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeCreateResponse {
    pub volume_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeDeleteRequest {
    pub volume_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkVolumeDeleteResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeInspectRequest {
    pub volume_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeInspectResponse {
    pub volume: Volume,
}

/// Lists volumes; a non-empty label set filters by exact label match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeEnumerateRequest {
    pub labels: Labels,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeEnumerateResponse {
    pub volume_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeUpdateRequest {
    pub volume_id: String,
    pub labels: Labels,
    pub spec: Option<VolumeSpecUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkVolumeUpdateResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeSnapshotCreateRequest {
    pub volume_id: String,
    pub name: String,
    pub labels: Labels,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeSnapshotCreateResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeSnapshotEnumerateRequest {
    pub volume_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeSnapshotEnumerateResponse {
    pub volume_snapshot_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeAttachRequest {
    pub volume_id: String,
    pub options: Labels,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeAttachResponse {
    pub device_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeDetachRequest {
    pub volume_id: String,
    pub options: Labels,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkVolumeDetachResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeMountRequest {
    pub volume_id: String,
    pub mount_path: String,
    pub options: Labels,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkVolumeMountResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkVolumeUnmountRequest {
    pub volume_id: String,
    pub mount_path: String,
    pub options: Labels,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkVolumeUnmountResponse {}
