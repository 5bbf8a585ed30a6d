//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tempfile::TempDir;
use tokio::sync::{Mutex, Notify};

use osd_sdk::api::migrate::{
    CloudMigrateCancelRequest, CloudMigrateStartRequest, CloudMigrateStartResponse,
    CloudMigrateStatusResponse,
};
use osd_sdk::api::volume::Volume;
use osd_sdk::api::Labels;
use osd_sdk::auth::Claims;
use osd_sdk::backend::{BackendError, BackendResult, DriverRegistry, VolumeDriver};
use osd_sdk::config::{AuthConfig, ServerConfig};
use osd_sdk::{SdkClient, Server};

pub const SECRET: &str = "integration-test-secret";

/// A running facade bound to an ephemeral port and a temp socket.
pub struct TestServer {
    pub server: Server,
    pub address: String,
    pub socket: String,
    _dir: TempDir,
}

impl TestServer {
    pub fn tcp_client(&self) -> SdkClient {
        SdkClient::tcp(&self.address)
    }

    pub fn uds_client(&self) -> SdkClient {
        SdkClient::unix(&self.socket)
    }

    pub async fn gateway_url(&self) -> String {
        let address = self.server.gateway_address().await.expect("gateway not running");
        let port = address.rsplit(':').next().unwrap_or_default();
        format!("http://127.0.0.1:{port}")
    }

    pub async fn stop(&self) {
        self.server.stop().await;
    }
}

#[derive(Default)]
pub struct Options {
    pub driver: Option<Arc<dyn VolumeDriver>>,
    pub auth: bool,
    pub gateway: bool,
}

/// Start a facade with `driver` registered and installed.
pub async fn start_server(options: Options) -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let registry = DriverRegistry::new();
    let driver_name = match options.driver {
        Some(driver) => {
            let name = driver.name().to_string();
            registry.register(driver);
            name
        }
        None => String::new(),
    };

    let config = ServerConfig {
        address: "127.0.0.1:0".into(),
        socket: dir.path().join("%s.sock").display().to_string(),
        driver_name,
        rest_port: options.gateway.then_some(0),
        auth: options.auth.then(|| AuthConfig {
            shared_secret: Some(SECRET.into()),
            ..Default::default()
        }),
        ..Default::default()
    };

    let server = Server::new(config, &registry).unwrap();
    server.start().await.unwrap();
    let address = server.address().await.unwrap();
    let socket = server.uds_address().await.unwrap();

    TestServer {
        server,
        address,
        socket,
        _dir: dir,
    }
}

/// HS256 token for `claims`, signed with [`SECRET`].
pub fn token(claims: &Claims) -> String {
    let claims = Claims {
        exp: Some(4_000_000_000),
        ..claims.clone()
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

/// Driver that records migration requests and answers with canned results.
#[derive(Default)]
pub struct RecordingDriver {
    pub starts: Mutex<Vec<CloudMigrateStartRequest>>,
    pub cancels: Mutex<Vec<CloudMigrateCancelRequest>>,
    pub start_result: Mutex<Option<Result<CloudMigrateStartResponse, String>>>,
    pub status_result: Mutex<Option<Result<CloudMigrateStatusResponse, String>>>,
}

impl RecordingDriver {
    pub async fn answer_start(&self, result: Result<CloudMigrateStartResponse, String>) {
        *self.start_result.lock().await = Some(result);
    }

    pub async fn answer_status(&self, result: Result<CloudMigrateStatusResponse, String>) {
        *self.status_result.lock().await = Some(result);
    }
}

#[async_trait]
impl VolumeDriver for RecordingDriver {
    fn name(&self) -> &str {
        "mock"
    }

    async fn cloud_migrate_start(
        &self,
        request: &CloudMigrateStartRequest,
    ) -> BackendResult<CloudMigrateStartResponse> {
        self.starts.lock().await.push(request.clone());
        match self.start_result.lock().await.clone() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(BackendError::failed(message)),
            None => Err(BackendError::NotSupported),
        }
    }

    async fn cloud_migrate_cancel(&self, request: &CloudMigrateCancelRequest) -> BackendResult<()> {
        self.cancels.lock().await.push(request.clone());
        Ok(())
    }

    async fn cloud_migrate_status(&self) -> BackendResult<CloudMigrateStatusResponse> {
        match self.status_result.lock().await.clone() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(BackendError::failed(message)),
            None => Err(BackendError::NotSupported),
        }
    }
}

/// Driver whose `enumerate` blocks until released. Each instance reports
/// one volume named after the driver.
pub struct GatedDriver {
    name: String,
    pub entered: Notify,
    pub release: Notify,
    gated: bool,
}

impl GatedDriver {
    pub fn gated(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entered: Notify::new(),
            release: Notify::new(),
            gated: true,
        }
    }

    pub fn open(name: &str) -> Self {
        Self {
            gated: false,
            ..Self::gated(name)
        }
    }
}

#[async_trait]
impl VolumeDriver for GatedDriver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn enumerate(&self, _labels: &Labels) -> BackendResult<Vec<Volume>> {
        if self.gated {
            self.entered.notify_one();
            self.release.notified().await;
        }
        Ok(vec![Volume {
            id: self.name.clone(),
            ..Default::default()
        }])
    }
}

/// Poll `condition` until true or the deadline passes.
pub async fn eventually<F, Fut>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
