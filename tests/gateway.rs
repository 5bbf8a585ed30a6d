//! REST gateway relaying to the unix listener.

use std::sync::Arc;

use serde_json::{json, Value};

use osd_sdk::api::STATUS_HEADER;
use osd_sdk::auth::Claims;
use osd_sdk::backend::fake::FakeDriver;

mod common;
use common::{start_server, token, Options};

fn http() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

async fn with_gateway(auth: bool) -> common::TestServer {
    start_server(Options {
        driver: Some(Arc::new(FakeDriver::new())),
        auth,
        gateway: true,
    })
    .await
}

#[tokio::test]
async fn create_then_enumerate_and_inspect() {
    let server = with_gateway(false).await;
    let base = server.gateway_url().await;
    let client = http();

    let created: Value = client
        .post(format!("{base}/v1/volumes/create"))
        .json(&json!({"name": "vol1", "spec": {"size": 1024, "ha_level": 1}}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let volume_id = created["volume_id"].as_str().unwrap().to_string();
    assert!(!volume_id.is_empty());

    let listed: Value = client
        .get(format!("{base}/v1/volumes/enumerate"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["volume_ids"], json!([volume_id.clone()]));

    let inspected: Value = client
        .get(format!("{base}/v1/volumes/inspect?volume_id={volume_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(inspected["volume"]["name"], "vol1");

    server.stop().await;
}

#[tokio::test]
async fn kebab_actions_reach_pascal_methods() {
    let server = with_gateway(false).await;
    let base = server.gateway_url().await;

    let res = http()
        .post(format!("{base}/v1/identities/capabilities"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["capabilities"].as_array().unwrap().len(), 12);

    let res = http()
        .post(format!("{base}/v1/volumes/snapshot-enumerate"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(res.headers()[STATUS_HEADER], "invalid_argument");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Must supply volume id");

    server.stop().await;
}

#[tokio::test]
async fn unknown_resource_and_method_are_not_found() {
    let server = with_gateway(false).await;
    let base = server.gateway_url().await;

    let res = http().get(format!("{base}/v1/pools/enumerate")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    let res = http().post(format!("{base}/v1/volumes/explode")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.headers()[STATUS_HEADER], "not_found");

    server.stop().await;
}

#[tokio::test]
async fn authorization_header_is_relayed() {
    let server = with_gateway(true).await;
    let base = server.gateway_url().await;

    let res = http()
        .get(format!("{base}/v1/identities/version"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 403);

    let admin = Claims {
        name: "admin".into(),
        role: "admin".into(),
        ..Default::default()
    };
    let res = http()
        .get(format!("{base}/v1/identities/version"))
        .bearer_auth(token(&admin))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["version"]["driver"], "fake");

    server.stop().await;
}
