//! In-memory backends.
//!
//! `FakeDriver` keeps volumes, snapshots, mount state, credentials,
//! migrations and backups in process memory. `FakeCluster` reports a single
//! local node and `MemoryAlerts` stores alerts in a map. Used by the binary
//! when no real driver is configured and throughout the tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{AlertStore, BackendError, BackendResult, Cluster, VolumeDriver};
use crate::api::alerts::{Alert, AlertsFilter};
use crate::api::cluster::{
    ClusterInfo, ClusterPairCreateResult, ClusterPairInfo, ObjectstoreInfo, SchedulePolicy,
    SdkClusterPairCreateRequest, SdkClusterPairEnumerateResponse, Status, StorageNode,
};
use crate::api::credentials::{
    CloudBackupInfo, CloudBackupStatus, CloudBackupStatusType, CredentialInfo,
    SdkCloudBackupCreateRequest, SdkCloudBackupDeleteRequest, SdkCloudBackupEnumerateRequest,
    SdkCloudBackupRestoreRequest, SdkCloudBackupRestoreResponse, SdkCloudBackupStatusRequest,
    SdkCredentialCreateRequest,
};
use crate::api::identity::StorageVersion;
use crate::api::migrate::{
    CloudMigrateCancelRequest, CloudMigrateInfo, CloudMigrateOperation, CloudMigrateStage,
    CloudMigrateStartRequest, CloudMigrateStartResponse, CloudMigrateStatus,
    CloudMigrateStatusResponse,
};
use crate::api::volume::{AttachState, Volume, VolumeSpec, VolumeSpecUpdate};
use crate::api::Labels;

pub const FAKE_DRIVER_NAME: &str = "fake";

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// In-memory volume driver.
#[derive(Default)]
pub struct FakeDriver {
    volumes: DashMap<String, Volume>,
    credentials: DashMap<String, CredentialInfo>,
    migrations: DashMap<String, CloudMigrateInfo>,
    backups: DashMap<String, CloudBackupInfo>,
    backup_status: DashMap<String, CloudBackupStatus>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn volume(&self, volume_id: &str) -> BackendResult<Volume> {
        self.volumes
            .get(volume_id)
            .map(|v| v.value().clone())
            .ok_or_else(|| BackendError::NotFound(format!("Volume {volume_id}")))
    }

    fn credential(&self, credential_id: &str) -> BackendResult<CredentialInfo> {
        self.credentials
            .get(credential_id)
            .map(|c| c.value().clone())
            .ok_or_else(|| BackendError::NotFound(format!("Credential {credential_id}")))
    }

    fn insert_volume(&self, name: &str, spec: VolumeSpec, labels: Labels, parent: &str) -> String {
        let id = new_id();
        self.volumes.insert(
            id.clone(),
            Volume {
                id: id.clone(),
                name: name.to_string(),
                spec,
                labels,
                parent: parent.to_string(),
                ..Default::default()
            },
        );
        id
    }
}

#[async_trait]
impl VolumeDriver for FakeDriver {
    fn name(&self) -> &str {
        FAKE_DRIVER_NAME
    }

    async fn version(&self) -> BackendResult<StorageVersion> {
        Ok(StorageVersion {
            driver: FAKE_DRIVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            details: BTreeMap::from([("backend".to_string(), "memory".to_string())]),
        })
    }

    async fn create(&self, name: &str, spec: &VolumeSpec, labels: &Labels) -> BackendResult<String> {
        if self.volumes.iter().any(|v| v.name == name) {
            return Err(BackendError::failed(format!("Volume {name} already exists")));
        }
        Ok(self.insert_volume(name, spec.clone(), labels.clone(), ""))
    }

    async fn delete(&self, volume_id: &str) -> BackendResult<()> {
        let volume = self.volume(volume_id)?;
        if volume.state == AttachState::Attached {
            return Err(BackendError::failed(format!("Volume {volume_id} is attached")));
        }
        self.volumes.remove(volume_id);
        Ok(())
    }

    async fn inspect(&self, volume_id: &str) -> BackendResult<Volume> {
        self.volume(volume_id)
    }

    async fn enumerate(&self, labels: &Labels) -> BackendResult<Vec<Volume>> {
        let mut volumes: Vec<Volume> = self
            .volumes
            .iter()
            .filter(|v| labels.iter().all(|(k, val)| v.labels.get(k) == Some(val)))
            .map(|v| v.value().clone())
            .collect();
        volumes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(volumes)
    }

    async fn set(
        &self,
        volume_id: &str,
        labels: &Labels,
        spec: Option<&VolumeSpecUpdate>,
    ) -> BackendResult<()> {
        let mut volume = self
            .volumes
            .get_mut(volume_id)
            .ok_or_else(|| BackendError::NotFound(format!("Volume {volume_id}")))?;
        volume
            .labels
            .extend(labels.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(update) = spec {
            if let Some(size) = update.size {
                if size < volume.spec.size {
                    return Err(BackendError::failed("Volume size cannot shrink"));
                }
                volume.spec.size = size;
            }
            if let Some(ha_level) = update.ha_level {
                volume.spec.ha_level = ha_level;
            }
            if let Some(shared) = update.shared {
                volume.spec.shared = shared;
            }
        }
        Ok(())
    }

    async fn snapshot_create(
        &self,
        volume_id: &str,
        name: &str,
        labels: &Labels,
    ) -> BackendResult<String> {
        let parent = self.volume(volume_id)?;
        let name = if name.is_empty() {
            format!("{}.snap-{}", parent.name, now_secs())
        } else {
            name.to_string()
        };
        Ok(self.insert_volume(&name, parent.spec, labels.clone(), volume_id))
    }

    async fn snapshot_enumerate(&self, volume_id: &str) -> BackendResult<Vec<Volume>> {
        Ok(self
            .volumes
            .iter()
            .filter(|v| !v.parent.is_empty() && (volume_id.is_empty() || v.parent == volume_id))
            .map(|v| v.value().clone())
            .collect())
    }

    async fn attach(&self, volume_id: &str, _options: &Labels) -> BackendResult<String> {
        let mut volume = self
            .volumes
            .get_mut(volume_id)
            .ok_or_else(|| BackendError::NotFound(format!("Volume {volume_id}")))?;
        if volume.state != AttachState::Attached {
            volume.state = AttachState::Attached;
            volume.device_path = format!("/dev/fake/{volume_id}");
        }
        Ok(volume.device_path.clone())
    }

    async fn detach(&self, volume_id: &str, _options: &Labels) -> BackendResult<()> {
        let mut volume = self
            .volumes
            .get_mut(volume_id)
            .ok_or_else(|| BackendError::NotFound(format!("Volume {volume_id}")))?;
        if !volume.attach_path.is_empty() {
            return Err(BackendError::failed(format!("Volume {volume_id} is mounted")));
        }
        volume.state = AttachState::Detached;
        volume.device_path.clear();
        Ok(())
    }

    async fn mount(&self, volume_id: &str, mount_path: &str, _options: &Labels) -> BackendResult<()> {
        let mut volume = self
            .volumes
            .get_mut(volume_id)
            .ok_or_else(|| BackendError::NotFound(format!("Volume {volume_id}")))?;
        if volume.state != AttachState::Attached {
            return Err(BackendError::failed(format!("Volume {volume_id} is not attached")));
        }
        if !volume.attach_path.iter().any(|p| p == mount_path) {
            volume.attach_path.push(mount_path.to_string());
        }
        Ok(())
    }

    async fn unmount(
        &self,
        volume_id: &str,
        mount_path: &str,
        _options: &Labels,
    ) -> BackendResult<()> {
        let mut volume = self
            .volumes
            .get_mut(volume_id)
            .ok_or_else(|| BackendError::NotFound(format!("Volume {volume_id}")))?;
        volume.attach_path.retain(|p| p != mount_path);
        Ok(())
    }

    async fn cloud_migrate_start(
        &self,
        request: &CloudMigrateStartRequest,
    ) -> BackendResult<CloudMigrateStartResponse> {
        let (local_volume_id, local_volume_name) = match request.operation {
            CloudMigrateOperation::MigrateVolume => {
                let volume = self.volume(&request.target_id)?;
                (volume.id, volume.name)
            }
            _ => (String::new(), String::new()),
        };
        let task_id = if request.task_id.is_empty() {
            new_id()
        } else if self.migrations.contains_key(&request.task_id) {
            return Err(BackendError::failed(format!(
                "Migration task {} already exists",
                request.task_id
            )));
        } else {
            request.task_id.clone()
        };
        self.migrations.insert(
            task_id.clone(),
            CloudMigrateInfo {
                task_id: task_id.clone(),
                cluster_id: request.cluster_id.clone(),
                local_volume_id,
                local_volume_name,
                current_stage: CloudMigrateStage::Backup,
                status: CloudMigrateStatus::Queued,
                ..Default::default()
            },
        );
        Ok(CloudMigrateStartResponse { task_id })
    }

    async fn cloud_migrate_cancel(&self, request: &CloudMigrateCancelRequest) -> BackendResult<()> {
        let mut info = self
            .migrations
            .get_mut(&request.task_id)
            .ok_or_else(|| BackendError::NotFound(format!("Migration task {}", request.task_id)))?;
        info.status = CloudMigrateStatus::Canceled;
        Ok(())
    }

    async fn cloud_migrate_status(&self) -> BackendResult<CloudMigrateStatusResponse> {
        let mut response = CloudMigrateStatusResponse::default();
        for entry in self.migrations.iter() {
            response
                .info
                .entry(entry.cluster_id.clone())
                .or_default()
                .list
                .push(entry.value().clone());
        }
        for list in response.info.values_mut() {
            list.list.sort_by(|a, b| a.task_id.cmp(&b.task_id));
        }
        Ok(response)
    }

    async fn credentials_create(&self, request: &SdkCredentialCreateRequest) -> BackendResult<String> {
        let provider = request
            .provider
            .as_ref()
            .ok_or_else(|| BackendError::failed("Credential provider is required"))?;
        let id = new_id();
        self.credentials.insert(
            id.clone(),
            CredentialInfo {
                credential_id: id.clone(),
                name: request.name.clone(),
                bucket: request.bucket.clone(),
                kind: provider.kind().to_string(),
            },
        );
        Ok(id)
    }

    async fn credentials_enumerate(&self) -> BackendResult<Vec<CredentialInfo>> {
        Ok(self.credentials.iter().map(|c| c.value().clone()).collect())
    }

    async fn credentials_inspect(&self, credential_id: &str) -> BackendResult<CredentialInfo> {
        self.credential(credential_id)
    }

    async fn credentials_delete(&self, credential_id: &str) -> BackendResult<()> {
        self.credentials
            .remove(credential_id)
            .map(|_| ())
            .ok_or_else(|| BackendError::NotFound(format!("Credential {credential_id}")))
    }

    async fn credentials_validate(&self, credential_id: &str) -> BackendResult<()> {
        self.credential(credential_id).map(|_| ())
    }

    async fn cloud_backup_create(&self, request: &SdkCloudBackupCreateRequest) -> BackendResult<String> {
        let volume = self.volume(&request.volume_id)?;
        self.credential(&request.credential_id)?;
        let backup_id = format!("{}/{}", request.credential_id, new_id());
        let task_id = if request.task_id.is_empty() {
            new_id()
        } else {
            request.task_id.clone()
        };
        self.backups.insert(
            backup_id.clone(),
            CloudBackupInfo {
                id: backup_id.clone(),
                src_volume_id: volume.id.clone(),
                src_volume_name: volume.name,
                timestamp_secs: now_secs(),
                status: CloudBackupStatusType::Done,
            },
        );
        self.backup_status.insert(
            task_id.clone(),
            CloudBackupStatus {
                backup_id,
                op_type: "backup".to_string(),
                status: CloudBackupStatusType::Done,
                bytes_done: volume.spec.size,
                node_id: String::new(),
            },
        );
        Ok(task_id)
    }

    async fn cloud_backup_restore(
        &self,
        request: &SdkCloudBackupRestoreRequest,
    ) -> BackendResult<SdkCloudBackupRestoreResponse> {
        self.credential(&request.credential_id)?;
        let backup = self
            .backups
            .get(&request.backup_id)
            .map(|b| b.value().clone())
            .ok_or_else(|| BackendError::NotFound(format!("Backup {}", request.backup_id)))?;
        let spec = self
            .volumes
            .get(&backup.src_volume_id)
            .map(|v| v.spec.clone())
            .unwrap_or_default();
        let name = if request.restore_volume_name.is_empty() {
            format!("{}.restore-{}", backup.src_volume_name, now_secs())
        } else {
            request.restore_volume_name.clone()
        };
        let restore_volume_id = self.insert_volume(&name, spec, Labels::new(), "");
        let task_id = if request.task_id.is_empty() {
            new_id()
        } else {
            request.task_id.clone()
        };
        self.backup_status.insert(
            task_id.clone(),
            CloudBackupStatus {
                backup_id: request.backup_id.clone(),
                op_type: "restore".to_string(),
                status: CloudBackupStatusType::Done,
                bytes_done: 0,
                node_id: request.node_id.clone(),
            },
        );
        Ok(SdkCloudBackupRestoreResponse {
            restore_volume_id,
            task_id,
        })
    }

    async fn cloud_backup_enumerate(
        &self,
        request: &SdkCloudBackupEnumerateRequest,
    ) -> BackendResult<Vec<CloudBackupInfo>> {
        let mut backups: Vec<CloudBackupInfo> = self
            .backups
            .iter()
            .filter(|b| request.all || request.src_volume_id.is_empty() || b.src_volume_id == request.src_volume_id)
            .filter(|b| request.credential_id.is_empty() || b.id.starts_with(&request.credential_id))
            .map(|b| b.value().clone())
            .collect();
        backups.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(backups)
    }

    async fn cloud_backup_status(
        &self,
        request: &SdkCloudBackupStatusRequest,
    ) -> BackendResult<BTreeMap<String, CloudBackupStatus>> {
        Ok(self
            .backup_status
            .iter()
            .filter(|s| request.task_id.is_empty() || *s.key() == request.task_id)
            .filter(|s| {
                request.volume_id.is_empty()
                    || self
                        .backups
                        .get(&s.backup_id)
                        .is_some_and(|b| b.src_volume_id == request.volume_id)
            })
            .map(|s| (s.key().clone(), s.value().clone()))
            .collect())
    }

    async fn cloud_backup_delete(&self, request: &SdkCloudBackupDeleteRequest) -> BackendResult<()> {
        self.backups
            .remove(&request.backup_id)
            .map(|_| ())
            .ok_or_else(|| BackendError::NotFound(format!("Backup {}", request.backup_id)))
    }
}

/// Single-node cluster with in-memory policies, object store and pairs.
pub struct FakeCluster {
    info: ClusterInfo,
    policies: DashMap<String, SchedulePolicy>,
    objectstore: Mutex<Option<ObjectstoreInfo>>,
    pairs: DashMap<String, ClusterPairInfo>,
    default_pair: Mutex<String>,
    token: Mutex<String>,
}

impl FakeCluster {
    pub fn new(cluster_id: &str) -> Self {
        let node_id = new_id();
        let node = StorageNode {
            id: node_id.clone(),
            hostname: "localhost".to_string(),
            mgmt_ip: "127.0.0.1".to_string(),
            data_ip: "127.0.0.1".to_string(),
            status: Status::Ok,
            ..Default::default()
        };
        Self {
            info: ClusterInfo {
                id: cluster_id.to_string(),
                name: cluster_id.to_string(),
                status: Status::Ok,
                node_id,
                nodes: vec![node],
            },
            policies: DashMap::new(),
            objectstore: Mutex::new(None),
            pairs: DashMap::new(),
            default_pair: Mutex::new(String::new()),
            token: Mutex::new(new_id()),
        }
    }

    fn policy(&self, name: &str) -> BackendResult<SchedulePolicy> {
        self.policies
            .get(name)
            .map(|p| p.value().clone())
            .ok_or_else(|| BackendError::NotFound(format!("Schedule policy {name}")))
    }
}

#[async_trait]
impl Cluster for FakeCluster {
    async fn enumerate(&self) -> BackendResult<ClusterInfo> {
        Ok(self.info.clone())
    }

    async fn object_store_inspect(&self, objectstore_id: &str) -> BackendResult<ObjectstoreInfo> {
        self.objectstore
            .lock()
            .await
            .as_ref()
            .filter(|os| os.uuid == objectstore_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("Object store {objectstore_id}")))
    }

    async fn object_store_create(&self, volume_id: &str) -> BackendResult<ObjectstoreInfo> {
        let mut current = self.objectstore.lock().await;
        if current.is_some() {
            return Err(BackendError::failed("Object store already exists"));
        }
        let info = ObjectstoreInfo {
            uuid: new_id(),
            volume_id: volume_id.to_string(),
            enabled: true,
            status: "running".to_string(),
            region: "local".to_string(),
            access_port: 9010,
        };
        *current = Some(info.clone());
        Ok(info)
    }

    async fn object_store_update(&self, objectstore_id: &str, enable: bool) -> BackendResult<()> {
        let mut current = self.objectstore.lock().await;
        let info = current
            .as_mut()
            .filter(|os| os.uuid == objectstore_id)
            .ok_or_else(|| BackendError::NotFound(format!("Object store {objectstore_id}")))?;
        info.enabled = enable;
        info.status = if enable { "running" } else { "stopped" }.to_string();
        Ok(())
    }

    async fn object_store_delete(&self, objectstore_id: &str) -> BackendResult<()> {
        let mut current = self.objectstore.lock().await;
        match current.as_ref() {
            Some(os) if os.uuid == objectstore_id => {
                *current = None;
                Ok(())
            }
            _ => Err(BackendError::NotFound(format!("Object store {objectstore_id}"))),
        }
    }

    async fn sched_policy_create(&self, name: &str, schedule: &str) -> BackendResult<()> {
        if self.policies.contains_key(name) {
            return Err(BackendError::failed(format!("Schedule policy {name} already exists")));
        }
        self.policies.insert(
            name.to_string(),
            SchedulePolicy {
                name: name.to_string(),
                schedule: schedule.to_string(),
            },
        );
        Ok(())
    }

    async fn sched_policy_update(&self, name: &str, schedule: &str) -> BackendResult<()> {
        let mut policy = self
            .policies
            .get_mut(name)
            .ok_or_else(|| BackendError::NotFound(format!("Schedule policy {name}")))?;
        policy.schedule = schedule.to_string();
        Ok(())
    }

    async fn sched_policy_enumerate(&self) -> BackendResult<Vec<SchedulePolicy>> {
        let mut policies: Vec<SchedulePolicy> =
            self.policies.iter().map(|p| p.value().clone()).collect();
        policies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(policies)
    }

    async fn sched_policy_inspect(&self, name: &str) -> BackendResult<SchedulePolicy> {
        self.policy(name)
    }

    async fn sched_policy_delete(&self, name: &str) -> BackendResult<()> {
        self.policy(name)?;
        self.policies.remove(name);
        Ok(())
    }

    async fn pair_create(
        &self,
        request: &SdkClusterPairCreateRequest,
    ) -> BackendResult<ClusterPairCreateResult> {
        let remote_id = format!("{}:{}", request.remote_cluster_ip, request.remote_cluster_port);
        self.pairs.insert(
            remote_id.clone(),
            ClusterPairInfo {
                id: remote_id.clone(),
                name: remote_id.clone(),
                endpoints: vec![remote_id.clone()],
                secure: false,
                token: request.remote_cluster_token.clone(),
            },
        );
        let mut default_pair = self.default_pair.lock().await;
        if request.set_default || default_pair.is_empty() {
            *default_pair = remote_id.clone();
        }
        Ok(ClusterPairCreateResult {
            remote_cluster_name: remote_id.clone(),
            remote_cluster_id: remote_id,
        })
    }

    async fn pair_inspect(&self, cluster_id: &str) -> BackendResult<ClusterPairInfo> {
        let default_pair = self.default_pair.lock().await.clone();
        let id = if cluster_id.is_empty() {
            default_pair.as_str()
        } else {
            cluster_id
        };
        self.pairs
            .get(id)
            .map(|p| p.value().clone())
            .ok_or_else(|| BackendError::NotFound(format!("Cluster pair {id}")))
    }

    async fn pair_enumerate(&self) -> BackendResult<SdkClusterPairEnumerateResponse> {
        Ok(SdkClusterPairEnumerateResponse {
            default_id: self.default_pair.lock().await.clone(),
            pairs: self
                .pairs
                .iter()
                .map(|p| (p.key().clone(), p.value().clone()))
                .collect(),
        })
    }

    async fn pair_delete(&self, cluster_id: &str) -> BackendResult<()> {
        self.pairs
            .remove(cluster_id)
            .ok_or_else(|| BackendError::NotFound(format!("Cluster pair {cluster_id}")))?;
        let mut default_pair = self.default_pair.lock().await;
        if *default_pair == cluster_id {
            default_pair.clear();
        }
        Ok(())
    }

    async fn pair_get_token(&self) -> BackendResult<String> {
        Ok(self.token.lock().await.clone())
    }

    async fn pair_reset_token(&self) -> BackendResult<String> {
        let mut token = self.token.lock().await;
        *token = new_id();
        Ok(token.clone())
    }
}

/// Alert store backed by a map keyed on alert id.
#[derive(Default)]
pub struct MemoryAlerts {
    alerts: DashMap<i64, Alert>,
    next_id: AtomicI64,
}

impl MemoryAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an alert, assigning it the next id.
    pub fn raise(&self, mut alert: Alert) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        alert.id = id;
        if alert.timestamp_secs == 0 {
            alert.timestamp_secs = now_secs();
        }
        self.alerts.insert(id, alert);
        id
    }
}

fn matches_all(filters: &[AlertsFilter], alert: &Alert) -> bool {
    filters.iter().all(|f| f.matches(alert))
}

#[async_trait]
impl AlertStore for MemoryAlerts {
    async fn enumerate(&self, filters: &[AlertsFilter]) -> BackendResult<Vec<Alert>> {
        let mut alerts: Vec<Alert> = self
            .alerts
            .iter()
            .filter(|a| matches_all(filters, a.value()))
            .map(|a| a.value().clone())
            .collect();
        alerts.sort_by_key(|a| a.id);
        Ok(alerts)
    }

    async fn delete(&self, filters: &[AlertsFilter]) -> BackendResult<()> {
        self.alerts.retain(|_, alert| !matches_all(filters, alert));
        Ok(())
    }
}
