//! Backend swaps against in-flight calls.

use std::sync::Arc;
use std::time::Duration;

use osd_sdk::api::alerts::{Alert, SdkAlertsEnumerateRequest, SdkAlertsEnumerateResponse};
use osd_sdk::api::cluster::{SdkClusterInspectCurrentRequest, SdkClusterInspectCurrentResponse};
use osd_sdk::api::volume::{SdkVolumeEnumerateRequest, SdkVolumeEnumerateResponse};
use osd_sdk::api::RpcCode;
use osd_sdk::backend::fake::{FakeCluster, MemoryAlerts};

mod common;
use common::{start_server, GatedDriver, Options};

#[tokio::test]
async fn swap_waits_for_in_flight_call() {
    let old = Arc::new(GatedDriver::gated("old"));
    let server = Arc::new(
        start_server(Options {
            driver: Some(old.clone()),
            ..Default::default()
        })
        .await,
    );

    // 1. A call enters the old driver and parks there.
    let client = server.tcp_client();
    let in_flight = tokio::spawn(async move {
        client
            .call::<_, SdkVolumeEnumerateResponse>("Volume", "Enumerate", &SdkVolumeEnumerateRequest::default())
            .await
    });
    tokio::time::timeout(Duration::from_secs(5), old.entered.notified())
        .await
        .unwrap();

    // 2. The swap cannot finish while the call holds the backend.
    let swapping = {
        let server = Arc::clone(&server);
        tokio::spawn(async move {
            server.server.use_driver(Arc::new(GatedDriver::open("new"))).await;
        })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!swapping.is_finished());

    // 3. Releasing the call lets both complete.
    old.release.notify_one();
    let first = tokio::time::timeout(Duration::from_secs(5), in_flight)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(first.volume_ids, vec!["old".to_string()]);
    tokio::time::timeout(Duration::from_secs(5), swapping)
        .await
        .unwrap()
        .unwrap();

    // 4. Later calls see the new driver on both listeners.
    for client in [server.tcp_client(), server.uds_client()] {
        let after: SdkVolumeEnumerateResponse = client
            .call("Volume", "Enumerate", &SdkVolumeEnumerateRequest::default())
            .await
            .unwrap();
        assert_eq!(after.volume_ids, vec!["new".to_string()]);
    }

    server.stop().await;
}

#[tokio::test]
async fn cancelled_call_releases_its_hold() {
    let old = Arc::new(GatedDriver::gated("old"));
    let server = start_server(Options {
        driver: Some(old.clone()),
        ..Default::default()
    })
    .await;

    // 1. A call parks in the old driver, then its caller goes away.
    let client = server.tcp_client();
    let in_flight = tokio::spawn(async move {
        client
            .call::<_, SdkVolumeEnumerateResponse>("Volume", "Enumerate", &SdkVolumeEnumerateRequest::default())
            .await
    });
    tokio::time::timeout(Duration::from_secs(5), old.entered.notified())
        .await
        .unwrap();
    in_flight.abort();
    assert!(in_flight.await.unwrap_err().is_cancelled());

    // 2. The old driver is never released, yet the swap completes.
    tokio::time::timeout(
        Duration::from_secs(5),
        server.server.use_driver(Arc::new(GatedDriver::open("new"))),
    )
    .await
    .expect("swap still waiting on a cancelled call");

    let after: SdkVolumeEnumerateResponse = server
        .tcp_client()
        .call("Volume", "Enumerate", &SdkVolumeEnumerateRequest::default())
        .await
        .unwrap();
    assert_eq!(after.volume_ids, vec!["new".to_string()]);

    server.stop().await;
}

#[tokio::test]
async fn cluster_and_alerts_become_available_after_install() {
    let server = start_server(Options::default()).await;
    let client = server.tcp_client();

    let err = client
        .call::<_, SdkClusterInspectCurrentResponse>(
            "Cluster",
            "InspectCurrent",
            &SdkClusterInspectCurrentRequest {},
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(RpcCode::Unavailable));

    server.server.use_cluster(Arc::new(FakeCluster::new("cluster-1"))).await;
    let resp: SdkClusterInspectCurrentResponse = client
        .call("Cluster", "InspectCurrent", &SdkClusterInspectCurrentRequest {})
        .await
        .unwrap();
    assert_eq!(resp.cluster.id, "cluster-1");

    let alerts = Arc::new(MemoryAlerts::new());
    alerts.raise(Alert {
        resource_id: "vol1".into(),
        message: "degraded".into(),
        ..Default::default()
    });
    server.server.use_alert(alerts).await;
    let resp: SdkAlertsEnumerateResponse = server
        .uds_client()
        .call("Alerts", "Enumerate", &SdkAlertsEnumerateRequest::default())
        .await
        .unwrap();
    assert_eq!(resp.alerts.len(), 1);
    assert_eq!(resp.alerts[0].message, "degraded");

    server.stop().await;
}
