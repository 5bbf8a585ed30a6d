//! Swappable backend set and its shared-hold guard.

use std::sync::Arc;

use tokio::sync::{OwnedRwLockReadGuard, RwLock};

use crate::api::RpcStatus;
use crate::backend::{AlertStore, Cluster, VolumeDriver};

/// Backends served by one listener instance. Each field is replaced
/// independently by `use_*`.
#[derive(Default, Clone)]
pub struct BackendSet {
    pub driver: Option<Arc<dyn VolumeDriver>>,
    pub cluster: Option<Arc<dyn Cluster>>,
    pub alert: Option<Arc<dyn AlertStore>>,
}

impl BackendSet {
    pub fn with_driver(driver: Option<Arc<dyn VolumeDriver>>) -> Self {
        Self {
            driver,
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for BackendSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSet")
            .field("driver", &self.driver.as_ref().map(|d| d.name().to_string()))
            .field("cluster", &self.cluster.is_some())
            .field("alert", &self.alert.is_some())
            .finish()
    }
}

/// The lock every listener instance guards its [`BackendSet`] with.
pub type BackendLock = Arc<RwLock<BackendSet>>;

/// Shared hold on a [`BackendSet`], attached to each request by the guard
/// stage. The backend accessors live here so they cannot be reached
/// without holding the lock.
#[derive(Clone)]
pub struct Backends(Arc<OwnedRwLockReadGuard<BackendSet>>);

impl Backends {
    /// Wait for a shared hold on `lock`.
    pub async fn acquire(lock: &BackendLock) -> Self {
        Self(Arc::new(Arc::clone(lock).read_owned().await))
    }

    pub fn driver(&self) -> Result<&dyn VolumeDriver, RpcStatus> {
        self.0
            .driver
            .as_deref()
            .ok_or_else(|| RpcStatus::unavailable("No volume driver installed"))
    }

    pub fn cluster(&self) -> Result<&dyn Cluster, RpcStatus> {
        self.0
            .cluster
            .as_deref()
            .ok_or_else(|| RpcStatus::unavailable("No cluster installed"))
    }

    pub fn alert(&self) -> Result<&dyn AlertStore, RpcStatus> {
        self.0
            .alert
            .as_deref()
            .ok_or_else(|| RpcStatus::unavailable("No alerts store installed"))
    }
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Backends").field(&*self.0).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RpcCode;
    use crate::backend::fake::FakeDriver;
    use std::time::Duration;

    #[tokio::test]
    async fn absent_backends_are_unavailable() {
        let lock: BackendLock = Arc::new(RwLock::new(BackendSet::default()));
        let backends = Backends::acquire(&lock).await;
        assert_eq!(backends.driver().err().map(|s| s.code), Some(RpcCode::Unavailable));
        assert_eq!(
            backends.cluster().err().map(|s| s.message),
            Some("No cluster installed".to_string())
        );
        assert!(backends.alert().is_err());
    }

    #[tokio::test]
    async fn writer_waits_for_every_clone_to_drop() {
        let lock: BackendLock = Arc::new(RwLock::new(BackendSet::default()));
        let backends = Backends::acquire(&lock).await;
        let clone = backends.clone();
        drop(backends);

        let writer = {
            let lock = Arc::clone(&lock);
            tokio::spawn(async move {
                lock.write().await.driver = Some(Arc::new(FakeDriver::new()));
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!writer.is_finished());

        drop(clone);
        tokio::time::timeout(Duration::from_secs(1), writer)
            .await
            .unwrap()
            .unwrap();
        assert!(Backends::acquire(&lock).await.driver().is_ok());
    }
}
