use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use arkitek_common::{BootDefaults, ClusterLink};
use arkitek_registry::{JsonFileRegistry, MemoryRegistry};
use arkitek_server::build_router;
use arkitek_server::state::AppState;

fn file_backed_server(dir: &TempDir) -> TestServer {
    let registry = Arc::new(JsonFileRegistry::new(dir.path().join("cluster-links.json")));
    let app = build_router(AppState::new(registry, BootDefaults::default()), None);
    TestServer::new(app).expect("test server")
}

fn memory_server() -> TestServer {
    let app = build_router(
        AppState::new(Arc::new(MemoryRegistry::new()), BootDefaults::default()),
        None,
    );
    TestServer::new(app).expect("test server")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let server = memory_server();
    let response = server.get("/healthz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn create_list_delete_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let server = file_backed_server(&dir);

    let response = server.get("/api/cluster-links").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Vec<ClusterLink>>(), vec![]);

    let response = server
        .post("/api/cluster-links")
        .json(&json!({
            "name": "alpha",
            "endpoint": "https://alpha.example.com",
            "builderType": "k8s"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["name"], "alpha");
    assert_eq!(created["builderType"], "k8s");
    assert_eq!(created["credentials"], "");
    assert_eq!(created["status"], "active");
    let id = created["id"].as_str().expect("id").to_string();

    let links: Vec<ClusterLink> = server.get("/api/cluster-links").await.json();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].id, id);

    let response = server.delete(&format!("/api/cluster-links/{id}")).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Cluster link deleted successfully");

    let links: Vec<ClusterLink> = server.get("/api/cluster-links").await.json();
    assert!(links.is_empty());
}

#[tokio::test]
async fn create_rejects_missing_fields() {
    let server = memory_server();

    let response = server
        .post("/api/cluster-links")
        .json(&json!({"endpoint": "10.0.0.1"}))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "missing_field");

    let response = server
        .post("/api/cluster-links")
        .json(&json!({"name": "alpha", "endpoint": ""}))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_rejects_duplicate_name() {
    let server = memory_server();
    server
        .post("/api/cluster-links")
        .json(&json!({"name": "alpha", "endpoint": "1"}))
        .await;

    let response = server
        .post("/api/cluster-links")
        .json(&json!({"name": "alpha", "endpoint": "2"}))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "duplicate_name");
    assert!(body["error"]["request_id"].as_str().unwrap_or_default().starts_with("req_"));

    let links: Vec<ClusterLink> = server.get("/api/cluster-links").await.json();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].endpoint, "1");
}

#[tokio::test]
async fn create_rejects_unparsable_body() {
    let server = memory_server();
    let response = server
        .post("/api/cluster-links")
        .text("not json")
        .content_type("application/json")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "invalid_body");
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let server = memory_server();
    server
        .post("/api/cluster-links")
        .json(&json!({"name": "alpha", "endpoint": "1"}))
        .await;

    let response = server
        .delete("/api/cluster-links/does-not-exist")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"]["code"], "not_found");

    let links: Vec<ClusterLink> = server.get("/api/cluster-links").await.json();
    assert_eq!(links.len(), 1);
}

#[tokio::test]
async fn corrupt_links_file_lists_empty() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("cluster-links.json"), "[{\"id\": ").expect("write");
    let server = file_backed_server(&dir);

    let response = server.get("/api/cluster-links").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Vec<ClusterLink>>(), vec![]);
}

#[tokio::test]
async fn create_refuses_to_overwrite_corrupt_links_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("cluster-links.json");
    std::fs::write(&path, "[{\"id\": ").expect("write");
    let server = file_backed_server(&dir);

    let response = server
        .post("/api/cluster-links")
        .json(&json!({"name": "alpha", "endpoint": "1"}))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["error"]["code"], "persistence_error");
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "[{\"id\": ");
}

#[tokio::test]
async fn generate_returns_ipxe_attachment() {
    let server = memory_server();
    let response = server
        .post("/api/ipxe/generate")
        .json(&json!({"clusterName": "alpha", "serverCount": 3}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"alpha-boot.ipxe\""
    );
    assert!(response
        .header("content-type")
        .to_str()
        .expect("content type")
        .starts_with("text/plain"));

    let script = response.text();
    let hostnames: Vec<&str> = script
        .lines()
        .filter(|l| l.starts_with("set server-"))
        .collect();
    assert_eq!(
        hostnames,
        vec![
            "set server-1-hostname alpha-node-1",
            "set server-2-hostname alpha-node-2",
            "set server-3-hostname alpha-node-3",
        ]
    );
    for label in [":deploy", ":shell", ":failed", ":reboot"] {
        assert_eq!(script.lines().filter(|l| *l == label).count(), 1, "{label}");
    }
}

#[tokio::test]
async fn generate_accepts_string_count_and_overrides() {
    let server = memory_server();
    let response = server
        .post("/api/ipxe/generate")
        .json(&json!({
            "clusterName": "beta",
            "serverCount": "2",
            "bootImage": "http://pxe.lan/vmlinuz",
            "kernelParams": "console=ttyS0"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response
        .text()
        .contains("kernel http://pxe.lan/vmlinuz console=ttyS0 cluster=beta nodes=2"));
}

#[tokio::test]
async fn generate_uses_server_boot_defaults() {
    let defaults = BootDefaults {
        boot_image: "http://mirror.lan/vmlinuz".to_string(),
        kernel_params: "ip=dhcp".to_string(),
    };
    let app = build_router(AppState::new(Arc::new(MemoryRegistry::new()), defaults), None);
    let server = TestServer::new(app).expect("test server");

    let response = server
        .post("/api/ipxe/generate")
        .json(&json!({"clusterName": "gamma", "serverCount": 1}))
        .await;
    assert!(response
        .text()
        .contains("kernel http://mirror.lan/vmlinuz ip=dhcp cluster=gamma nodes=1"));
}

#[tokio::test]
async fn generate_validates_inputs() {
    let server = memory_server();

    let response = server
        .post("/api/ipxe/generate")
        .json(&json!({"serverCount": 3}))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "missing_field");

    let response = server
        .post("/api/ipxe/generate")
        .json(&json!({"clusterName": "alpha"}))
        .expect_failure()
        .await;
    assert_eq!(response.json::<Value>()["error"]["code"], "missing_field");

    let response = server
        .post("/api/ipxe/generate")
        .json(&json!({"clusterName": "alpha", "serverCount": 0}))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "invalid_server_count");
}

#[tokio::test]
async fn generate_rejects_oversized_server_count() {
    let server = memory_server();
    let response = server
        .post("/api/ipxe/generate")
        .json(&json!({"clusterName": "alpha", "serverCount": 4294967295u64}))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "invalid_server_count");
}

#[tokio::test]
async fn generate_rejects_multiline_cluster_name() {
    let server = memory_server();
    let response = server
        .post("/api/ipxe/generate")
        .json(&json!({"clusterName": "alpha\nshell", "serverCount": 1}))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "invalid_field");
}

#[tokio::test]
async fn benchmark_run_echoes_defaults() {
    let server = memory_server();
    let response = server
        .post("/api/benchmark/run")
        .json(&json!({"endpoint": "http://10.0.0.5"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["endpoint"], "http://10.0.0.5");
    assert_eq!(body["testType"], "stress");
    assert_eq!(body["iterations"], 100);
    assert_eq!(body["status"], "running");
    assert!(body["startTime"].is_string());

    let response = server
        .post("/api/benchmark/run")
        .json(&json!({}))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn run_until_fail_echoes_request() {
    let server = memory_server();
    let response = server
        .post("/api/test/run-until-fail")
        .json(&json!({"clusterName": "alpha", "testType": "soak"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["clusterName"], "alpha");
    assert_eq!(body["testType"], "soak");
    assert_eq!(body["maxIterations"], 1000);
    assert_eq!(
        body["message"],
        "Running continuous tests on alpha until failure is detected"
    );

    let response = server
        .post("/api/test/run-until-fail")
        .json(&json!({"testType": "soak"}))
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "missing_field");
}

#[tokio::test]
async fn serves_public_directory() {
    let public = TempDir::new().expect("temp dir");
    std::fs::write(public.path().join("index.html"), "<h1>arkitek</h1>").expect("write");

    let app = build_router(
        AppState::new(Arc::new(MemoryRegistry::new()), BootDefaults::default()),
        Some(public.path()),
    );
    let server = TestServer::new(app).expect("test server");

    let response = server.get("/index.html").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "<h1>arkitek</h1>");

    let response = server.get("/api/cluster-links").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}
