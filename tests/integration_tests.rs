// Integration tests: HTTP and WebSocket endpoints

mod common;

use axum_test::TestServer;
use common::{minimal_rates, mount, test_app_config};
use osprobe::models::{DiskRates, RatesSnapshot};
use osprobe::routes;
use osprobe::topology::{ROOT_KEY, TopologyCache};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;

fn test_app() -> (
    axum::Router,
    broadcast::Sender<RatesSnapshot>,
    Arc<TopologyCache>,
    Arc<AtomicUsize>,
) {
    let config = test_app_config();
    let (tx, _) = broadcast::channel(config.publishing.broadcast_capacity);
    let topology = Arc::new(TopologyCache::new());
    let connections = Arc::new(AtomicUsize::new(0));
    let app = routes::app(tx.clone(), topology.clone(), connections.clone());
    (app, tx, topology, connections)
}

#[tokio::test]
async fn test_root_endpoint() {
    let (app, ..) = test_app();
    let server = TestServer::new(app);
    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_text("osprobe telemetry agent");
}

#[tokio::test]
async fn test_version_endpoint() {
    let (app, ..) = test_app();
    let server = TestServer::new(app);
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json.get("name").and_then(|v| v.as_str()), Some("osprobe"));
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_default_path_falls_back_when_topology_empty() {
    let (app, ..) = test_app();
    let server = TestServer::new(app);
    let response = server.get("/api/topology/default-path").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["path"], ".");
}

#[tokio::test]
async fn test_default_path_prefers_root_mount() {
    let (app, _, topology, _) = test_app();
    topology.put("sdb1", mount("/dev/sdb1", "/data"));
    topology.put(ROOT_KEY, mount("/dev/sda1", "/"));
    let server = TestServer::new(app);
    let json: serde_json::Value = server.get("/api/topology/default-path").await.json();
    assert_eq!(json["path"], "/");
}

#[tokio::test]
async fn test_topology_lists_mounts_sorted() {
    let (app, _, topology, _) = test_app();
    topology.replace_all([
        ("sdb1".to_string(), mount("/dev/sdb1", "/data")),
        (ROOT_KEY.to_string(), mount("/dev/sda1", "/")),
    ]);
    let server = TestServer::new(app);
    let json: serde_json::Value = server.get("/api/topology").await.json();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["key"], "/");
    assert_eq!(entries[1]["key"], "sdb1");
    assert_eq!(entries[1]["mountPoint"], "/data");
    assert_eq!(entries[1]["fsType"], "ext4");
}

#[tokio::test]
async fn test_topology_entries_are_flat_mount_objects() {
    let (app, _, topology, _) = test_app();
    topology.put("sdb1", mount("/dev/sdb1", "/data"));
    let server = TestServer::new(app);
    let json: serde_json::Value = server.get("/api/topology").await.json();
    let expected = serde_json::json!([{
        "key": "sdb1",
        "device": "/dev/sdb1",
        "mountPoint": "/data",
        "fsType": "ext4",
    }]);
    assert_eq!(json, expected);
}

#[tokio::test]
async fn test_mount_lookup_found_and_missing() {
    let (app, _, topology, _) = test_app();
    topology.put("sdb1", mount("/dev/sdb1", "/data"));
    topology.put(ROOT_KEY, mount("/dev/sda1", "/"));
    let server = TestServer::new(app);

    let response = server.get("/api/topology/sdb1").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    let expected = serde_json::json!({
        "device": "/dev/sdb1",
        "mountPoint": "/data",
        "fsType": "ext4",
    });
    assert_eq!(json, expected);

    let json: serde_json::Value = server.get("/api/topology/%2F").await.json();
    assert_eq!(json["device"], "/dev/sda1");

    let response = server.get("/api/topology/sdz9").await;
    response.assert_status_not_found();
    let json: serde_json::Value = response.json();
    assert_eq!(json["error"], "unknown device");
    assert_eq!(json["device"], "sdz9");
}

// --- WebSocket message tests (require http_transport + ws feature) ---

#[tokio::test]
async fn test_ws_rates_receives_broadcast_snapshot() {
    let (app, tx, _, connections) = test_app();
    let server = TestServer::builder().http_transport().build(app);
    let mut ws = server
        .get_websocket("/ws/rates")
        .await
        .into_websocket()
        .await;

    let mut snapshot = minimal_rates(42);
    snapshot.disks.push(DiskRates {
        name: "sda".into(),
        read_bytes_per_sec: 7,
        written_bytes_per_sec: 9,
    });
    let tx_clone = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        let _ = tx_clone.send(snapshot);
    });

    let received: RatesSnapshot = ws.receive_json().await;
    assert_eq!(received.timestamp, 42);
    assert_eq!(received.disks[0].written_bytes_per_sec, 9);
    assert_eq!(connections.load(Ordering::Relaxed), 1);
}
