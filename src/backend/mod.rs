//! Backend collaborators behind the SDK.
//!
//! # Data Flow
//! ```text
//! service dispatcher
//!     → Backends guard (shared hold)
//!     → VolumeDriver / Cluster / AlertStore trait object
//!     → Result<_, BackendError>
//! ```
//!
//! # Design Decisions
//! - Every trait method has a default that reports `NotSupported`, so a
//!   backend only implements what it actually serves
//! - Drivers are looked up by name through [`DriverRegistry`]

pub mod fake;
pub mod registry;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::api::alerts::{Alert, AlertsFilter};
use crate::api::cluster::{
    ClusterInfo, ClusterPairCreateResult, ClusterPairInfo, ObjectstoreInfo, SchedulePolicy,
    SdkClusterPairCreateRequest, SdkClusterPairEnumerateResponse, StorageNode,
};
use crate::api::credentials::{
    CloudBackupInfo, CloudBackupStatus, CredentialInfo, SdkCloudBackupCreateRequest,
    SdkCloudBackupDeleteRequest, SdkCloudBackupEnumerateRequest, SdkCloudBackupRestoreRequest,
    SdkCloudBackupRestoreResponse, SdkCloudBackupStatusRequest, SdkCredentialCreateRequest,
};
use crate::api::identity::StorageVersion;
use crate::api::migrate::{
    CloudMigrateCancelRequest, CloudMigrateStartRequest, CloudMigrateStartResponse,
    CloudMigrateStatusResponse,
};
use crate::api::volume::{Volume, VolumeSpec, VolumeSpecUpdate};
use crate::api::Labels;

pub use registry::DriverRegistry;

/// Errors reported by backends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("Not supported")]
    NotSupported,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Failed(String),
}

impl BackendError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Storage driver: volumes, mounts, migrations, credentials and backups.
#[async_trait]
pub trait VolumeDriver: Send + Sync {
    /// Registry name of the driver.
    fn name(&self) -> &str;

    async fn version(&self) -> BackendResult<StorageVersion> {
        Ok(StorageVersion {
            driver: self.name().to_string(),
            ..Default::default()
        })
    }

    // Volumes

    /// Creates a volume and returns its id.
    async fn create(&self, _name: &str, _spec: &VolumeSpec, _labels: &Labels) -> BackendResult<String> {
        Err(BackendError::NotSupported)
    }

    async fn delete(&self, _volume_id: &str) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }

    async fn inspect(&self, _volume_id: &str) -> BackendResult<Volume> {
        Err(BackendError::NotSupported)
    }

    /// Lists volumes carrying every label in `labels`.
    async fn enumerate(&self, _labels: &Labels) -> BackendResult<Vec<Volume>> {
        Err(BackendError::NotSupported)
    }

    /// Merges `labels` and applies the optional partial spec.
    async fn set(
        &self,
        _volume_id: &str,
        _labels: &Labels,
        _spec: Option<&VolumeSpecUpdate>,
    ) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }

    async fn snapshot_create(
        &self,
        _volume_id: &str,
        _name: &str,
        _labels: &Labels,
    ) -> BackendResult<String> {
        Err(BackendError::NotSupported)
    }

    async fn snapshot_enumerate(&self, _volume_id: &str) -> BackendResult<Vec<Volume>> {
        Err(BackendError::NotSupported)
    }

    // Mount / attach

    /// Attaches the volume and returns the device path.
    async fn attach(&self, _volume_id: &str, _options: &Labels) -> BackendResult<String> {
        Err(BackendError::NotSupported)
    }

    async fn detach(&self, _volume_id: &str, _options: &Labels) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }

    async fn mount(&self, _volume_id: &str, _mount_path: &str, _options: &Labels) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }

    async fn unmount(
        &self,
        _volume_id: &str,
        _mount_path: &str,
        _options: &Labels,
    ) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }

    // Migration

    async fn cloud_migrate_start(
        &self,
        _request: &CloudMigrateStartRequest,
    ) -> BackendResult<CloudMigrateStartResponse> {
        Err(BackendError::NotSupported)
    }

    async fn cloud_migrate_cancel(&self, _request: &CloudMigrateCancelRequest) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }

    async fn cloud_migrate_status(&self) -> BackendResult<CloudMigrateStatusResponse> {
        Err(BackendError::NotSupported)
    }

    // Credentials

    /// Stores a credential and returns its id.
    async fn credentials_create(&self, _request: &SdkCredentialCreateRequest) -> BackendResult<String> {
        Err(BackendError::NotSupported)
    }

    async fn credentials_enumerate(&self) -> BackendResult<Vec<CredentialInfo>> {
        Err(BackendError::NotSupported)
    }

    async fn credentials_inspect(&self, _credential_id: &str) -> BackendResult<CredentialInfo> {
        Err(BackendError::NotSupported)
    }

    async fn credentials_delete(&self, _credential_id: &str) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }

    async fn credentials_validate(&self, _credential_id: &str) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }

    // Cloud backup

    /// Starts a backup and returns the task id.
    async fn cloud_backup_create(&self, _request: &SdkCloudBackupCreateRequest) -> BackendResult<String> {
        Err(BackendError::NotSupported)
    }

    async fn cloud_backup_restore(
        &self,
        _request: &SdkCloudBackupRestoreRequest,
    ) -> BackendResult<SdkCloudBackupRestoreResponse> {
        Err(BackendError::NotSupported)
    }

    async fn cloud_backup_enumerate(
        &self,
        _request: &SdkCloudBackupEnumerateRequest,
    ) -> BackendResult<Vec<CloudBackupInfo>> {
        Err(BackendError::NotSupported)
    }

    async fn cloud_backup_status(
        &self,
        _request: &SdkCloudBackupStatusRequest,
    ) -> BackendResult<BTreeMap<String, CloudBackupStatus>> {
        Err(BackendError::NotSupported)
    }

    async fn cloud_backup_delete(&self, _request: &SdkCloudBackupDeleteRequest) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }
}

/// Cluster controller: membership, object stores, schedule policies, pairs.
#[async_trait]
pub trait Cluster: Send + Sync {
    async fn enumerate(&self) -> BackendResult<ClusterInfo>;

    async fn inspect_node(&self, node_id: &str) -> BackendResult<StorageNode> {
        self.enumerate()
            .await?
            .nodes
            .into_iter()
            .find(|node| node.id == node_id)
            .ok_or_else(|| BackendError::NotFound(format!("Node {node_id}")))
    }

    async fn enumerate_nodes(&self) -> BackendResult<Vec<StorageNode>> {
        Ok(self.enumerate().await?.nodes)
    }

    // Object store

    async fn object_store_inspect(&self, _objectstore_id: &str) -> BackendResult<ObjectstoreInfo> {
        Err(BackendError::NotSupported)
    }

    async fn object_store_create(&self, _volume_id: &str) -> BackendResult<ObjectstoreInfo> {
        Err(BackendError::NotSupported)
    }

    async fn object_store_update(&self, _objectstore_id: &str, _enable: bool) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }

    async fn object_store_delete(&self, _objectstore_id: &str) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }

    // Schedule policies

    async fn sched_policy_create(&self, _name: &str, _schedule: &str) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }

    async fn sched_policy_update(&self, _name: &str, _schedule: &str) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }

    async fn sched_policy_enumerate(&self) -> BackendResult<Vec<SchedulePolicy>> {
        Err(BackendError::NotSupported)
    }

    async fn sched_policy_inspect(&self, _name: &str) -> BackendResult<SchedulePolicy> {
        Err(BackendError::NotSupported)
    }

    async fn sched_policy_delete(&self, _name: &str) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }

    // Cluster pairs

    async fn pair_create(
        &self,
        _request: &SdkClusterPairCreateRequest,
    ) -> BackendResult<ClusterPairCreateResult> {
        Err(BackendError::NotSupported)
    }

    async fn pair_inspect(&self, _cluster_id: &str) -> BackendResult<ClusterPairInfo> {
        Err(BackendError::NotSupported)
    }

    async fn pair_enumerate(&self) -> BackendResult<SdkClusterPairEnumerateResponse> {
        Err(BackendError::NotSupported)
    }

    async fn pair_delete(&self, _cluster_id: &str) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }

    async fn pair_get_token(&self) -> BackendResult<String> {
        Err(BackendError::NotSupported)
    }

    async fn pair_reset_token(&self) -> BackendResult<String> {
        Err(BackendError::NotSupported)
    }
}

/// Alert storage queried and pruned by filter.
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn enumerate(&self, _filters: &[AlertsFilter]) -> BackendResult<Vec<Alert>> {
        Err(BackendError::NotSupported)
    }

    async fn delete(&self, _filters: &[AlertsFilter]) -> BackendResult<()> {
        Err(BackendError::NotSupported)
    }
}
