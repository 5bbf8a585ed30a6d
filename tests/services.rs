//! Cluster-facing and cloud operation groups over the fake backends.

use std::sync::Arc;

use osd_sdk::api::cluster::*;
use osd_sdk::api::credentials::*;
use osd_sdk::api::volume::{SdkVolumeCreateRequest, SdkVolumeCreateResponse, VolumeSpec};
use osd_sdk::api::RpcCode;
use osd_sdk::backend::fake::{FakeCluster, FakeDriver};
use osd_sdk::SdkClient;

mod common;
use common::{start_server, Options, TestServer};

async fn fake_server() -> TestServer {
    let server = start_server(Options {
        driver: Some(Arc::new(FakeDriver::new())),
        ..Default::default()
    })
    .await;
    server
        .server
        .use_cluster(Arc::new(FakeCluster::new("cluster-1")))
        .await;
    server
}

async fn create_volume(client: &SdkClient, name: &str) -> String {
    let created: SdkVolumeCreateResponse = client
        .call(
            "Volume",
            "Create",
            &SdkVolumeCreateRequest {
                name: name.into(),
                spec: Some(VolumeSpec {
                    size: 1 << 20,
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    created.volume_id
}

async fn create_credential(client: &SdkClient, name: &str) -> String {
    let created: SdkCredentialCreateResponse = client
        .call(
            "Credentials",
            "Create",
            &SdkCredentialCreateRequest {
                name: name.into(),
                bucket: "backups".into(),
                provider: Some(CredentialProvider::AwsCredential {
                    access_key: "AKIA".into(),
                    secret_key: "secret".into(),
                    endpoint: "s3.local".into(),
                    region: "us-east-1".into(),
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    created.credential_id
}

#[tokio::test]
async fn nodes_report_the_local_node() {
    let server = fake_server().await;
    let client = server.tcp_client();

    let listed: SdkNodeEnumerateResponse = client
        .call("Node", "Enumerate", &SdkNodeEnumerateRequest {})
        .await
        .unwrap();
    assert_eq!(listed.node_ids.len(), 1);

    let current: SdkNodeInspectCurrentResponse = client
        .call("Node", "InspectCurrent", &SdkNodeInspectCurrentRequest {})
        .await
        .unwrap();
    assert_eq!(current.node.id, listed.node_ids[0]);

    let inspected: SdkNodeInspectResponse = client
        .call(
            "Node",
            "Inspect",
            &SdkNodeInspectRequest {
                node_id: current.node.id.clone(),
            },
        )
        .await
        .unwrap();
    assert_eq!(inspected.node.hostname, "localhost");

    let err = client
        .call::<_, SdkNodeInspectResponse>("Node", "Inspect", &SdkNodeInspectRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(RpcCode::InvalidArgument));

    server.stop().await;
}

#[tokio::test]
async fn objectstore_create_update_delete() {
    let server = fake_server().await;
    let client = server.tcp_client();
    let volume_id = create_volume(&client, "objects").await;

    let created: SdkObjectstoreCreateResponse = client
        .call(
            "Objectstore",
            "Create",
            &SdkObjectstoreCreateRequest {
                volume_id: volume_id.clone(),
            },
        )
        .await
        .unwrap();
    let id = created.objectstore_status.uuid;
    assert!(created.objectstore_status.enabled);

    let _: SdkObjectstoreUpdateResponse = client
        .call(
            "Objectstore",
            "Update",
            &SdkObjectstoreUpdateRequest {
                objectstore_id: id.clone(),
                enable: false,
            },
        )
        .await
        .unwrap();

    let inspected: SdkObjectstoreInspectResponse = client
        .call(
            "Objectstore",
            "Inspect",
            &SdkObjectstoreInspectRequest {
                objectstore_id: id.clone(),
            },
        )
        .await
        .unwrap();
    assert!(!inspected.objectstore_status.enabled);
    assert_eq!(inspected.objectstore_status.volume_id, volume_id);

    let _: SdkObjectstoreDeleteResponse = client
        .call(
            "Objectstore",
            "Delete",
            &SdkObjectstoreDeleteRequest {
                objectstore_id: id.clone(),
            },
        )
        .await
        .unwrap();

    let err = client
        .call::<_, SdkObjectstoreInspectResponse>(
            "Objectstore",
            "Inspect",
            &SdkObjectstoreInspectRequest { objectstore_id: id },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(RpcCode::Internal));

    server.stop().await;
}

#[tokio::test]
async fn schedule_policies_round_trip() {
    let server = fake_server().await;
    let client = server.tcp_client();

    for name in ["weekly", "daily"] {
        let _: SdkSchedulePolicyCreateResponse = client
            .call(
                "SchedulePolicy",
                "Create",
                &SdkSchedulePolicyCreateRequest {
                    schedule_policy: Some(SchedulePolicy {
                        name: name.into(),
                        schedule: "periodic=60,10".into(),
                    }),
                },
            )
            .await
            .unwrap();
    }

    let _: SdkSchedulePolicyUpdateResponse = client
        .call(
            "SchedulePolicy",
            "Update",
            &SdkSchedulePolicyUpdateRequest {
                schedule_policy: Some(SchedulePolicy {
                    name: "daily".into(),
                    schedule: "daily=02:00".into(),
                }),
            },
        )
        .await
        .unwrap();

    let listed: SdkSchedulePolicyEnumerateResponse = client
        .call("SchedulePolicy", "Enumerate", &SdkSchedulePolicyEnumerateRequest {})
        .await
        .unwrap();
    let names: Vec<_> = listed.policies.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["daily", "weekly"]);

    let inspected: SdkSchedulePolicyInspectResponse = client
        .call(
            "SchedulePolicy",
            "Inspect",
            &SdkSchedulePolicyInspectRequest {
                name: "daily".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(inspected.policy.schedule, "daily=02:00");

    let _: SdkSchedulePolicyDeleteResponse = client
        .call(
            "SchedulePolicy",
            "Delete",
            &SdkSchedulePolicyDeleteRequest {
                name: "weekly".into(),
            },
        )
        .await
        .unwrap();

    let err = client
        .call::<_, SdkSchedulePolicyCreateResponse>(
            "SchedulePolicy",
            "Create",
            &SdkSchedulePolicyCreateRequest {
                schedule_policy: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(RpcCode::InvalidArgument));
    assert_eq!(err.status().unwrap().message, "Must supply Schedule Policy");

    server.stop().await;
}

#[tokio::test]
async fn credentials_lifecycle() {
    let server = fake_server().await;
    let client = server.uds_client();
    let id = create_credential(&client, "s3").await;

    let listed: SdkCredentialEnumerateResponse = client
        .call("Credentials", "Enumerate", &SdkCredentialEnumerateRequest {})
        .await
        .unwrap();
    assert_eq!(listed.credential_ids, vec![id.clone()]);

    let inspected: SdkCredentialInspectResponse = client
        .call(
            "Credentials",
            "Inspect",
            &SdkCredentialIdRequest {
                credential_id: id.clone(),
            },
        )
        .await
        .unwrap();
    assert_eq!(inspected.credential.name, "s3");
    assert_eq!(inspected.credential.kind, "aws");

    let _: SdkCredentialValidateResponse = client
        .call(
            "Credentials",
            "Validate",
            &SdkCredentialIdRequest {
                credential_id: id.clone(),
            },
        )
        .await
        .unwrap();

    let _: SdkCredentialDeleteResponse = client
        .call(
            "Credentials",
            "Delete",
            &SdkCredentialIdRequest {
                credential_id: id.clone(),
            },
        )
        .await
        .unwrap();

    let err = client
        .call::<_, SdkCredentialValidateResponse>(
            "Credentials",
            "Validate",
            &SdkCredentialIdRequest { credential_id: id },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(RpcCode::Internal));

    server.stop().await;
}

#[tokio::test]
async fn credential_create_requires_name_and_provider() {
    let server = fake_server().await;
    let client = server.tcp_client();

    let err = client
        .call::<_, SdkCredentialCreateResponse>(
            "Credentials",
            "Create",
            &SdkCredentialCreateRequest::default(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status().unwrap().message, "Must supply a name");

    let err = client
        .call::<_, SdkCredentialCreateResponse>(
            "Credentials",
            "Create",
            &SdkCredentialCreateRequest {
                name: "bare".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(RpcCode::InvalidArgument));
    assert_eq!(err.status().unwrap().message, "Must supply credential provider");

    server.stop().await;
}

#[tokio::test]
async fn cloud_backup_create_status_restore_delete() {
    let server = fake_server().await;
    let client = server.tcp_client();
    let volume_id = create_volume(&client, "db").await;
    let credential_id = create_credential(&client, "s3").await;

    let created: SdkCloudBackupCreateResponse = client
        .call(
            "CloudBackup",
            "Create",
            &SdkCloudBackupCreateRequest {
                volume_id: volume_id.clone(),
                credential_id: credential_id.clone(),
                task_id: "backup-1".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(created.task_id, "backup-1");

    let status: SdkCloudBackupStatusResponse = client
        .call(
            "CloudBackup",
            "Status",
            &SdkCloudBackupStatusRequest {
                task_id: "backup-1".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let backup_status = &status.statuses["backup-1"];
    assert_eq!(backup_status.status, CloudBackupStatusType::Done);
    assert_eq!(backup_status.op_type, "backup");

    let listed: SdkCloudBackupEnumerateResponse = client
        .call(
            "CloudBackup",
            "Enumerate",
            &SdkCloudBackupEnumerateRequest {
                src_volume_id: volume_id.clone(),
                credential_id: credential_id.clone(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(listed.backups.len(), 1);
    let backup_id = listed.backups[0].id.clone();
    assert_eq!(backup_id, backup_status.backup_id);

    let restored: SdkCloudBackupRestoreResponse = client
        .call(
            "CloudBackup",
            "Restore",
            &SdkCloudBackupRestoreRequest {
                backup_id: backup_id.clone(),
                credential_id: credential_id.clone(),
                restore_volume_name: "db-restored".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!restored.restore_volume_id.is_empty());
    assert_ne!(restored.restore_volume_id, volume_id);

    let _: SdkCloudBackupDeleteResponse = client
        .call(
            "CloudBackup",
            "Delete",
            &SdkCloudBackupDeleteRequest {
                backup_id,
                credential_id,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let listed: SdkCloudBackupEnumerateResponse = client
        .call(
            "CloudBackup",
            "Enumerate",
            &SdkCloudBackupEnumerateRequest {
                all: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(listed.backups.is_empty());

    server.stop().await;
}

#[tokio::test]
async fn cloud_backup_requires_volume_and_credential() {
    let server = fake_server().await;
    let client = server.tcp_client();

    let err = client
        .call::<_, SdkCloudBackupCreateResponse>(
            "CloudBackup",
            "Create",
            &SdkCloudBackupCreateRequest {
                credential_id: "cred".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(RpcCode::InvalidArgument));

    let err = client
        .call::<_, SdkCloudBackupCreateResponse>(
            "CloudBackup",
            "Create",
            &SdkCloudBackupCreateRequest {
                volume_id: "vol".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status().unwrap().message, "Must provide credential uuid");

    server.stop().await;
}

#[tokio::test]
async fn cluster_pairs_and_tokens() {
    let server = fake_server().await;
    let client = server.tcp_client();

    let created: SdkClusterPairCreateResponse = client
        .call(
            "ClusterPair",
            "Create",
            &SdkClusterPairCreateRequest {
                remote_cluster_ip: "10.0.0.2".into(),
                remote_cluster_port: 9001,
                remote_cluster_token: "remote-token".into(),
                set_default: true,
            },
        )
        .await
        .unwrap();
    let pair_id = created.result.remote_cluster_id;
    assert_eq!(pair_id, "10.0.0.2:9001");

    let listed: SdkClusterPairEnumerateResponse = client
        .call("ClusterPair", "Enumerate", &SdkClusterPairEnumerateRequest {})
        .await
        .unwrap();
    assert_eq!(listed.default_id, pair_id);
    assert!(listed.pairs.contains_key(&pair_id));

    let inspected: SdkClusterPairInspectResponse = client
        .call(
            "ClusterPair",
            "Inspect",
            &SdkClusterPairInspectRequest {
                cluster_id: pair_id.clone(),
            },
        )
        .await
        .unwrap();
    assert_eq!(inspected.pair_info.token, "remote-token");

    let before: SdkClusterPairTokenResponse = client
        .call("ClusterPair", "GetToken", &SdkClusterPairGetTokenRequest {})
        .await
        .unwrap();
    let after: SdkClusterPairTokenResponse = client
        .call("ClusterPair", "ResetToken", &SdkClusterPairResetTokenRequest {})
        .await
        .unwrap();
    assert_ne!(before.token, after.token);

    let _: SdkClusterPairDeleteResponse = client
        .call(
            "ClusterPair",
            "Delete",
            &SdkClusterPairDeleteRequest {
                cluster_id: pair_id,
            },
        )
        .await
        .unwrap();
    let listed: SdkClusterPairEnumerateResponse = client
        .call("ClusterPair", "Enumerate", &SdkClusterPairEnumerateRequest {})
        .await
        .unwrap();
    assert!(listed.pairs.is_empty());
    assert!(listed.default_id.is_empty());

    let err = client
        .call::<_, SdkClusterPairCreateResponse>(
            "ClusterPair",
            "Create",
            &SdkClusterPairCreateRequest::default(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status().unwrap().message, "Must supply remote cluster IP");

    server.stop().await;
}
