//! Facade start/stop, TLS, partial starts and an end-to-end volume flow on
//! the fake driver.

use std::path::Path;
use std::sync::Arc;

use osd_sdk::api::identity::{SdkIdentityVersionRequest, SdkIdentityVersionResponse};
use osd_sdk::api::volume::*;
use osd_sdk::api::RpcCode;
use osd_sdk::backend::fake::FakeDriver;
use osd_sdk::backend::DriverRegistry;
use osd_sdk::config::{ServerConfig, TlsConfig};
use osd_sdk::{SdkClient, Server, ServerError};

mod common;
use common::{start_server, Options};

#[tokio::test]
async fn never_started_facade_stops_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        address: "127.0.0.1:0".into(),
        socket: dir.path().join("osd.sock").display().to_string(),
        ..Default::default()
    };
    let server = Server::new(config, &DriverRegistry::new()).unwrap();
    server.stop().await;
    server.stop().await;
    assert!(server.address().await.is_none());
}

#[tokio::test]
async fn socket_follows_driver_name_and_is_removed_on_stop() {
    let server = start_server(Options {
        driver: Some(Arc::new(FakeDriver::new())),
        ..Default::default()
    })
    .await;
    assert!(server.socket.ends_with("fake.sock"));
    assert!(Path::new(&server.socket).exists());

    server.stop().await;
    assert!(!Path::new(&server.socket).exists());
}

#[tokio::test]
async fn second_start_is_rejected() {
    let server = start_server(Options::default()).await;
    assert!(matches!(
        server.server.start().await,
        Err(ServerError::AlreadyRunning(_))
    ));
    server.stop().await;
}

#[tokio::test]
async fn stale_socket_file_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("osd.sock");
    std::fs::write(&socket, b"stale").unwrap();

    let config = ServerConfig {
        address: "127.0.0.1:0".into(),
        socket: socket.display().to_string(),
        ..Default::default()
    };
    let server = Server::new(config, &DriverRegistry::new()).unwrap();
    server.start().await.unwrap();
    assert_eq!(server.uds_address().await.unwrap(), socket.display().to_string());
    server.stop().await;
}

#[tokio::test]
async fn gateway_failure_leaves_listeners_running() {
    let occupied = std::net::TcpListener::bind("0.0.0.0:0").unwrap();
    let port = occupied.local_addr().unwrap().port();
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        address: "127.0.0.1:0".into(),
        socket: dir.path().join("%s.sock").display().to_string(),
        driver_name: "fake".into(),
        rest_port: Some(port),
        ..Default::default()
    };
    let server = Server::new(config, &DriverRegistry::with_defaults()).unwrap();

    let err = server.start().await.unwrap_err();
    assert!(matches!(err, ServerError::Transport { .. }), "{err}");

    // Nothing is rolled back.
    assert!(server.address().await.is_some());
    assert!(server.uds_address().await.is_some());
    assert!(server.gateway_address().await.is_none());

    server.stop().await;
    assert!(server.address().await.is_none());
}

#[tokio::test]
async fn tls_on_network_listener_only() {
    let dir = tempfile::tempdir().unwrap();
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert_file = dir.path().join("cert.pem");
    let key_file = dir.path().join("key.pem");
    std::fs::write(&cert_file, certified.cert.pem()).unwrap();
    std::fs::write(&key_file, certified.key_pair.serialize_pem()).unwrap();

    let config = ServerConfig {
        address: "127.0.0.1:0".into(),
        socket: dir.path().join("%s.sock").display().to_string(),
        driver_name: "fake".into(),
        tls: Some(TlsConfig {
            cert_file,
            key_file,
        }),
        ..Default::default()
    };
    let server = Server::new(config, &DriverRegistry::with_defaults()).unwrap();
    server.start().await.unwrap();
    let address = server.address().await.unwrap();

    // 1. The network listener speaks https.
    let https = reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .build()
        .unwrap();
    let response = https
        .post(format!(
            "https://{address}/openstorage.api.OpenStorageIdentity/Version"
        ))
        .header("content-type", "application/json")
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let version: SdkIdentityVersionResponse = response.json().await.unwrap();
    assert_eq!(version.version.driver, "fake");

    // 2. Plain http to it fails.
    let plain = SdkClient::tcp(&address)
        .with_timeout(std::time::Duration::from_secs(5))
        .call::<_, SdkIdentityVersionResponse>("Identity", "Version", &SdkIdentityVersionRequest::default())
        .await;
    assert!(plain.is_err());

    // 3. The unix socket stays plaintext.
    let socket = server.uds_address().await.unwrap();
    let version: SdkIdentityVersionResponse = SdkClient::unix(&socket)
        .call("Identity", "Version", &SdkIdentityVersionRequest::default())
        .await
        .unwrap();
    assert_eq!(version.version.driver, "fake");

    server.stop().await;
}

#[tokio::test]
async fn volume_lifecycle_over_unix_socket() {
    let server = start_server(Options {
        driver: Some(Arc::new(FakeDriver::new())),
        ..Default::default()
    })
    .await;
    let client = server.uds_client();

    let created: SdkVolumeCreateResponse = client
        .call(
            "Volume",
            "Create",
            &SdkVolumeCreateRequest {
                name: "data".into(),
                spec: Some(VolumeSpec {
                    size: 1 << 30,
                    ha_level: 2,
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let id = created.volume_id;

    let attached: SdkVolumeAttachResponse = client
        .call(
            "MountAttach",
            "Attach",
            &SdkVolumeAttachRequest {
                volume_id: id.clone(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!attached.device_path.is_empty());

    let _: SdkVolumeMountResponse = client
        .call(
            "MountAttach",
            "Mount",
            &SdkVolumeMountRequest {
                volume_id: id.clone(),
                mount_path: "/mnt/data".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Mounted volumes cannot be detached.
    let err = client
        .call::<_, SdkVolumeDetachResponse>(
            "MountAttach",
            "Detach",
            &SdkVolumeDetachRequest {
                volume_id: id.clone(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(RpcCode::Internal));

    let _: SdkVolumeUnmountResponse = client
        .call(
            "MountAttach",
            "Unmount",
            &SdkVolumeUnmountRequest {
                volume_id: id.clone(),
                mount_path: "/mnt/data".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let _: SdkVolumeDetachResponse = client
        .call(
            "MountAttach",
            "Detach",
            &SdkVolumeDetachRequest {
                volume_id: id.clone(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let snap: SdkVolumeSnapshotCreateResponse = client
        .call(
            "Volume",
            "SnapshotCreate",
            &SdkVolumeSnapshotCreateRequest {
                volume_id: id.clone(),
                name: "data.snap".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let snaps: SdkVolumeSnapshotEnumerateResponse = client
        .call(
            "Volume",
            "SnapshotEnumerate",
            &SdkVolumeSnapshotEnumerateRequest { volume_id: id.clone() },
        )
        .await
        .unwrap();
    assert_eq!(snaps.volume_snapshot_ids, vec![snap.snapshot_id]);

    let _: SdkVolumeDeleteResponse = client
        .call("Volume", "Delete", &SdkVolumeDeleteRequest { volume_id: id.clone() })
        .await
        .unwrap();
    let err = client
        .call::<_, SdkVolumeInspectResponse>("Volume", "Inspect", &SdkVolumeInspectRequest { volume_id: id })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(RpcCode::Internal));

    server.stop().await;
}
