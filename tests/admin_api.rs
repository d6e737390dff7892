//! Integration tests for the admin configuration API.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use chat_gateway::config::persistence;
use chat_gateway::{ConfigManager, ConfigRecord, HttpServer};

async fn start_server(manager: Arc<ConfigManager>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(manager);

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    addr
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

fn config_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("config.json")
}

#[tokio::test]
async fn test_health_endpoint_is_open() {
    let dir = tempfile::tempdir().unwrap();
    let manager = Arc::new(ConfigManager::bootstrap(config_path(&dir)));
    let addr = start_server(manager).await;

    let res = client()
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .expect("Server unreachable");

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_admin_rejects_missing_or_wrong_key() {
    let dir = tempfile::tempdir().unwrap();
    let manager = Arc::new(ConfigManager::bootstrap(config_path(&dir)));
    let addr = start_server(manager).await;
    let client = client();

    let res = client
        .get(format!("http://{}/admin/config", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401, "missing Authorization header");

    let res = client
        .get(format!("http://{}/admin/config", addr))
        .header("Authorization", "Bearer wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401, "wrong key");

    let res = client
        .post(format!("http://{}/admin/config", addr))
        .json(&serde_json::json!({ "proxy": "http://127.0.0.1:7890" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401, "unauthenticated update");
}

#[tokio::test]
async fn test_admin_get_reports_masked_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let record = ConfigRecord {
        sessions: vec!["s1".to_string(), "s2".to_string()],
        ..ConfigRecord::default()
    };
    let manager = Arc::new(ConfigManager::from_record(config_path(&dir), record));
    let addr = start_server(manager).await;

    let res = client()
        .get(format!("http://{}/admin/config", addr))
        .header("Authorization", "Bearer 123456")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["api_key_set"], true);
    assert_eq!(body["api_key_hint"], "****3456");
    assert!(body.get("apikey").is_none(), "raw key must not be exposed");
    assert_eq!(body["sessions"], serde_json::json!(["s1", "s2"]));
    assert_eq!(body["sessions_count"], 2);
    assert_eq!(body["retry_count"], 2);
    assert_eq!(body["default_model"], "claude-3.7-sonnet");
}

#[tokio::test]
async fn test_admin_update_round_trips_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = config_path(&dir);
    let manager = Arc::new(ConfigManager::bootstrap(&path));
    let addr = start_server(manager).await;
    let client = client();

    let res = client
        .post(format!("http://{}/admin/config", addr))
        .header("Authorization", "Bearer 123456")
        .json(&serde_json::json!({
            "sessions": ["alpha:meta,beta", " gamma "],
            "default_model": "claude-4",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["persisted"], true);
    assert_eq!(body["changed"], serde_json::json!(["default_model", "sessions"]));

    let res = client
        .get(format!("http://{}/admin/config", addr))
        .header("Authorization", "Bearer 123456")
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["sessions"], serde_json::json!(["alpha", "beta", "gamma"]));
    assert_eq!(body["retry_count"], 3);
    assert_eq!(body["default_model"], "claude-4");

    let on_disk = persistence::load(&path).unwrap();
    assert_eq!(on_disk.sessions, vec!["alpha", "beta", "gamma"]);
    assert_eq!(on_disk.default_model, "claude-4");
}

#[tokio::test]
async fn test_admin_update_validation_failure_mutates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let record = ConfigRecord {
        sessions: vec!["keep1".to_string(), "keep2".to_string()],
        ..ConfigRecord::default()
    };
    let manager = Arc::new(ConfigManager::from_record(config_path(&dir), record));
    let addr = start_server(manager).await;
    let client = client();

    let res = client
        .post(format!("http://{}/admin/config", addr))
        .header("Authorization", "Bearer 123456")
        .json(&serde_json::json!({ "sessions": [" , "], "proxy": "http://new" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "sessions cannot be empty");

    let res = client
        .get(format!("http://{}/admin/config", addr))
        .header("Authorization", "Bearer 123456")
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["sessions"], serde_json::json!(["keep1", "keep2"]));
    assert_eq!(body["proxy"], "", "valid field must not land when another fails");
}

#[tokio::test]
async fn test_admin_update_rejects_malformed_body() {
    let dir = tempfile::tempdir().unwrap();
    let manager = Arc::new(ConfigManager::bootstrap(config_path(&dir)));
    let addr = start_server(manager).await;

    let res = client()
        .post(format!("http://{}/admin/config", addr))
        .header("Authorization", "Bearer 123456")
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid request body");
}

#[tokio::test]
async fn test_admin_key_rotation_takes_effect_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let manager = Arc::new(ConfigManager::bootstrap(config_path(&dir)));
    let addr = start_server(manager).await;
    let client = client();

    let res = client
        .post(format!("http://{}/admin/config", addr))
        .header("Authorization", "Bearer 123456")
        .json(&serde_json::json!({ "apikey": "rotated-secret" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = client
        .get(format!("http://{}/admin/config", addr))
        .header("Authorization", "Bearer 123456")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401, "old key must stop working");

    let res = client
        .get(format!("http://{}/admin/config", addr))
        .header("Authorization", "Bearer rotated-secret")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["api_key_hint"], "****cret");
}
