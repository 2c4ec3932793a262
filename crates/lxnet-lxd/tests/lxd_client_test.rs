use lxnet_core::{
    CanonicalConfig, ClientError, ConfigInput, ConnectionParams, DesiredSpec, NetworkClient,
    NetworkHandle, OutcomeStatus, Reconciler,
};
use lxnet_lxd::LxdClient;
use serde_json::json;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixListener;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────

fn sync_response(metadata: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "type": "sync",
        "status": "Success",
        "status_code": 200,
        "metadata": metadata
    }))
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "type": "error",
        "error": "Network not found",
        "error_code": 404
    }))
}

fn net0() -> serde_json::Value {
    json!({
        "name": "net0",
        "description": "old",
        "type": "bridge",
        "managed": true,
        "status": "Created",
        "config": {"a": "1"},
        "used_by": []
    })
}

fn conn(server: &MockServer) -> ConnectionParams {
    ConnectionParams::remote(server.uri())
}

/// Answer one request on a unix socket; resolves to the request head
fn serve_once(
    socket: &Path,
    status: &str,
    body: serde_json::Value,
) -> tokio::task::JoinHandle<String> {
    let listener = UnixListener::bind(socket).unwrap();
    let body = body.to_string();
    let response = format!(
        "HTTP/1.1 {status}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    );

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).into_owned()
    })
}

// ── Client operations ───────────────────────────────────────────

#[tokio::test]
async fn fetch_existing_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.0/networks/net0"))
        .respond_with(sync_response(net0()))
        .expect(1)
        .mount(&server)
        .await;

    let network = LxdClient::new()
        .fetch("net0", &conn(&server))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(network.description(), "old");
    assert_eq!(network.config_value("a"), Some("1"));
    assert_eq!(network.kind, "bridge");
}

#[tokio::test]
async fn fetch_missing_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.0/networks/net0"))
        .respond_with(not_found())
        .mount(&server)
        .await;

    let network = LxdClient::new().fetch("net0", &conn(&server)).await.unwrap();
    assert!(network.is_none());
}

#[tokio::test]
async fn fetch_error_envelope_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.0/networks/net0"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "type": "error",
            "error": "not authorized",
            "error_code": 403
        })))
        .mount(&server)
        .await;

    let err = LxdClient::new()
        .fetch("net0", &conn(&server))
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::Transport("not authorized (HTTP 403)".into()));
}

#[tokio::test]
async fn create_posts_name_description_and_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1.0/networks"))
        .and(body_json(json!({
            "name": "net0",
            "description": "bridge",
            "config": {"ipv4.address": "10.0.3.1/24"}
        })))
        .respond_with(sync_response(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = CanonicalConfig::new();
    config.insert("ipv4.address".into(), "10.0.3.1/24".into());

    LxdClient::new()
        .create("net0", &config, "bridge", &conn(&server))
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_missing_network_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/1.0/networks/net0"))
        .respond_with(not_found())
        .mount(&server)
        .await;

    let err = LxdClient::new()
        .delete("net0", &conn(&server))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn non_json_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/1.0/networks/net0"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = LxdClient::new()
        .delete("net0", &conn(&server))
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::Transport("Bad Gateway (HTTP 502)".into()));
}

#[tokio::test]
async fn name_is_sent_as_one_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/1.0/instances/c1"))
        .respond_with(sync_response(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/1.0/networks/..%2Finstances%2Fc1"))
        .respond_with(not_found())
        .expect(1)
        .mount(&server)
        .await;

    let err = LxdClient::new()
        .delete("../instances/c1", &conn(&server))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn traversal_name_never_reaches_the_daemon() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(sync_response(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = Reconciler::new(LxdClient::new())
        .absent("../instances/c1", &conn(&server), false)
        .await
        .unwrap_err();
    assert!(matches!(err, lxnet_core::NetworkError::InvalidName(_)));
}

#[tokio::test]
async fn bare_404_is_not_a_missing_network() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_string("404 page not found"))
        .mount(&server)
        .await;

    let outcome = Reconciler::new(LxdClient::new())
        .absent("net0", &conn(&server), false)
        .await
        .unwrap();

    assert!(outcome.is_failure());
    assert_eq!(outcome.comment(), "404 page not found (HTTP 404)");
}

// ── Local unix socket ───────────────────────────────────────────

#[tokio::test]
async fn fetch_over_unix_socket() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("unix.socket");
    let server = serve_once(
        &socket,
        "200 OK",
        json!({"type": "sync", "status": "Success", "metadata": net0()}),
    );

    let network = LxdClient::new()
        .fetch("net0", &ConnectionParams::remote(socket.to_str().unwrap()))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(network.description(), "old");
    let request = server.await.unwrap();
    assert!(request.starts_with("GET /1.0/networks/net0 HTTP/1.1"));
}

#[tokio::test]
async fn delete_missing_over_unix_socket() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("unix.socket");
    let server = serve_once(
        &socket,
        "404 Not Found",
        json!({"type": "error", "error": "Network not found", "error_code": 404}),
    );

    let conn = ConnectionParams::remote(format!("unix:{}", socket.display()));
    let outcome = Reconciler::new(LxdClient::new())
        .absent("net0", &conn, false)
        .await
        .unwrap();

    assert_eq!(outcome.status(), OutcomeStatus::NoOp);
    assert_eq!(outcome.comment(), "Network \"net0\" not found.");
    let request = server.await.unwrap();
    assert!(request.starts_with("DELETE /1.0/networks/net0 HTTP/1.1"));
}

// ── Reconciliation against the mock daemon ──────────────────────

#[tokio::test]
async fn present_puts_merged_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.0/networks/net0"))
        .respond_with(sync_response(net0()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/1.0/networks/net0"))
        .and(body_json(json!({
            "description": "new",
            "config": {"a": "1", "b": "2"}
        })))
        .respond_with(sync_response(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let spec = DesiredSpec::new("net0")
        .with_description("new")
        .with_config(ConfigInput::from_pairs([("b", "2")]));

    let outcome = Reconciler::new(LxdClient::new())
        .present(&spec, &conn(&server), false)
        .await
        .unwrap();

    assert_eq!(outcome.status(), OutcomeStatus::Success);
    assert_eq!(outcome.comment(), "2 changes");
}

#[tokio::test]
async fn present_dry_run_never_writes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.0/networks/net0"))
        .respond_with(sync_response(net0()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(sync_response(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let spec = DesiredSpec::new("net0").with_description("new");

    let outcome = Reconciler::new(LxdClient::new())
        .present(&spec, &conn(&server), true)
        .await
        .unwrap();

    assert_eq!(outcome.status(), OutcomeStatus::Pending);
    assert_eq!(outcome.comment(), "Network \"net0\" would get changed.");
}

#[tokio::test]
async fn present_update_rejected_by_daemon() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.0/networks/net0"))
        .respond_with(sync_response(net0()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/1.0/networks/net0"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "type": "error",
            "error": "Invalid option for network \"net0\" option \"ipv4.bogus\"",
            "error_code": 400
        })))
        .mount(&server)
        .await;

    let spec = DesiredSpec::new("net0")
        .with_description("old")
        .with_config(ConfigInput::from_pairs([("ipv4.bogus", "1")]));

    let outcome = Reconciler::new(LxdClient::new())
        .present(&spec, &conn(&server), false)
        .await
        .unwrap();

    assert!(outcome.is_failure());
    assert_eq!(
        outcome.comment(),
        "Invalid option for network \"net0\" option \"ipv4.bogus\" (HTTP 400)"
    );
}

#[tokio::test]
async fn absent_on_missing_network() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/1.0/networks/net0"))
        .respond_with(not_found())
        .expect(1)
        .mount(&server)
        .await;

    let outcome = Reconciler::new(LxdClient::new())
        .absent("net0", &conn(&server), false)
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.comment(), "Network \"net0\" not found.");
    assert!(outcome.changes().is_empty());
}

#[tokio::test]
async fn missing_local_socket_is_reported_as_failure() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("unix.socket");
    let conn = ConnectionParams::remote(socket.to_str().unwrap());

    let outcome = Reconciler::new(LxdClient::new())
        .present(&DesiredSpec::new("net0"), &conn, true)
        .await
        .unwrap();

    assert!(outcome.is_failure());
    assert!(outcome.comment().contains("unix socket"));
    assert!(outcome.comment().contains("unix.socket"));
}
