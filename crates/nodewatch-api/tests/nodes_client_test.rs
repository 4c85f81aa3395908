#![allow(clippy::unwrap_used)]
// Integration tests for `NodesClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nodewatch_api::{Error, NodesClient, NodesQuery, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, NodesClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = NodesClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

fn nodes_body() -> serde_json::Value {
    json!({
        "nodes": [
            {
                "pubkey": "Hx3kQ",
                "address": "1.1.1.1:9001",
                "status": "online",
                "last_seen": 100,
                "storage_capacity": 2048
            },
            {
                "pubkey": "Hx3kQ",
                "address": "2.2.2.2:9001",
                "status": "offline",
                "last_seen": "2024-06-15T10:30:00Z"
            }
        ],
        "pagination": { "total_items": 2, "total_pages": 1, "page": 1, "limit": 50 }
    })
}

// ── Node listing ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_nodes_sends_query_params() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .and(query_param("page", "3"))
        .and(query_param("limit", "25"))
        .and(query_param("status", "online"))
        .and(query_param("sort", "uptime"))
        .and(query_param("order", "desc"))
        .and(query_param("include_offline", "false"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nodes_body()))
        .expect(1)
        .mount(&server)
        .await;

    let query = NodesQuery {
        page: Some(3),
        limit: Some(25),
        status: Some("online".into()),
        sort: Some("uptime".into()),
        order: Some("desc".into()),
        include_offline: Some(false),
    };
    let resp = client.list_nodes(&query).await.unwrap();

    assert_eq!(resp.nodes.len(), 2);
    assert_eq!(resp.nodes[0].pubkey, "Hx3kQ");
    assert_eq!(resp.nodes[1].address.as_deref(), Some("2.2.2.2:9001"));
    assert_eq!(resp.pagination.total_items, 2);
    assert_eq!(resp.pagination.limit, 50);
}

#[tokio::test]
async fn test_list_nodes_without_params_has_no_query_string() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nodes_body()))
        .mount(&server)
        .await;

    client.list_nodes(&NodesQuery::default()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_list_nodes_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client.list_nodes(&NodesQuery::default()).await.unwrap_err();

    assert!(
        matches!(err, Error::Http { status: 502, .. }),
        "expected Http error, got: {err:?}"
    );
    assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    assert_eq!(err.endpoint(), Some("/api/nodes"));
}

#[tokio::test]
async fn test_list_nodes_malformed_payload() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let err = client.list_nodes(&NodesQuery::default()).await.unwrap_err();

    match err {
        Error::Deserialization { message, body } => {
            assert!(message.contains("nodes"), "message: {message}");
            assert_eq!(body, r#"{"items":[]}"#);
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Port 9 (discard) is never served by wiremock.
    let client = NodesClient::new(
        Url::parse("http://127.0.0.1:9").unwrap(),
        &TransportConfig::default(),
    )
    .unwrap();

    let err = client.list_nodes(&NodesQuery::default()).await.unwrap_err();

    assert!(
        matches!(err, Error::Transport { .. }),
        "expected Transport error, got: {err:?}"
    );
    assert!(err.to_string().starts_with("Failed to fetch /api/nodes"));
}

// ── Single node ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_node_encodes_pubkey() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes/abc%2Fdef"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pubkey": "abc/def",
            "status": "active"
        })))
        .mount(&server)
        .await;

    let node = client.get_node("abc/def").await.unwrap();
    assert_eq!(node.pubkey, "abc/def");
    assert_eq!(node.status, "active");
}

#[tokio::test]
async fn test_get_node_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.get_node("missing").await.unwrap_err();
    assert!(err.is_not_found(), "expected 404, got: {err:?}");
}

// ── Backend endpoints ───────────────────────────────────────────────

#[tokio::test]
async fn test_health_and_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "running",
            "version": "1.4.0",
            "uptime": 3600.5
        })))
        .mount(&server)
        .await;

    assert_eq!(client.health().await.unwrap().status, "ok");

    let status = client.backend_status().await.unwrap();
    assert_eq!(status.version.as_deref(), Some("1.4.0"));
    assert_eq!(status.uptime, Some(3600.5));
}

#[tokio::test]
async fn test_health_is_not_under_api_prefix() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/backend/", server.uri())).unwrap();
    let client = NodesClient::new(base_url, &TransportConfig::default()).unwrap();

    Mock::given(method("GET"))
        .and(path("/backend/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.health().await.unwrap().status, "ok");
}

#[tokio::test]
async fn test_network_stats() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "network_health": 97.2,
            "total_nodes": 120,
            "online_nodes": 110,
            "total_storage_bytes": 5.0e12,
            "used_storage_bytes": 1.25e12,
            "total_pods": 64,
            "last_updated": 1_700_000_000_000_i64,
            "total_public_nodes": 90
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stats = client.network_stats().await.unwrap();
    assert_eq!(stats.total_nodes, 120);
    assert_eq!(stats.online_nodes, 110);
    assert!((stats.network_health - 97.2).abs() < f64::EPSILON);
    assert_eq!(stats.total_pods, Some(64));
    assert_eq!(stats.last_updated, Some(json!(1_700_000_000_000_i64)));
    assert_eq!(stats.extra.get("total_public_nodes"), Some(&json!(90)));
}

#[tokio::test]
async fn test_network_stats_rejects_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_nodes": 3 })))
        .mount(&server)
        .await;

    let err = client.network_stats().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got {err:?}");
}
