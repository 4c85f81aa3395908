#![allow(clippy::unwrap_used)]
// Registry store driven end-to-end against a wiremock backend.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nodewatch_core::{
    ClientConfig, CoreError, NodeStatus, QueryUpdate, RefreshOutcome, RegistryStore, SortField,
    SortOrder, lookup_node,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ClientConfig) {
    let server = MockServer::start().await;
    let config = ClientConfig::new(Url::parse(&server.uri()).unwrap());
    (server, config)
}

fn listing(page: u32) -> serde_json::Value {
    json!({
        "nodes": [
            {
                "pubkey": "A",
                "address": "1.1.1.1:9001",
                "status": "online",
                "last_seen": 100,
                "storage_capacity": 4096,
                "version": "0.7.1"
            },
            {
                "pubkey": "B",
                "address": "",
                "status": "syncing",
                "last_seen": null
            },
            {
                "pubkey": "A",
                "address": "2.2.2.2:9001",
                "status": "offline",
                "last_seen": 50,
                "version": "0.6.0"
            }
        ],
        "pagination": { "total_items": 140, "total_pages": 3, "page": page, "limit": 50 }
    })
}

// ── Store over HTTP ─────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_reconciles_backend_listing() {
    let (server, config) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "50"))
        .and(query_param("include_offline", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(1)))
        .expect(1)
        .mount(&server)
        .await;

    let store = RegistryStore::with_query(config.build_client().unwrap(), config.initial_query());
    assert_eq!(store.fetch().await, RefreshOutcome::Published);

    let snap = store.snapshot();
    let keys: Vec<&str> = snap.records.iter().map(|r| r.pubkey.as_str()).collect();
    assert_eq!(keys, vec!["A", "B"]);

    let a = snap.find("A").unwrap();
    assert_eq!(a.addresses, vec!["1.1.1.1:9001", "2.2.2.2:9001"]);
    assert_eq!(a.status, NodeStatus::Online);
    assert_eq!(a.telemetry.version(), Some("0.7.1"));

    let b = snap.find("B").unwrap();
    assert!(b.addresses.is_empty());
    assert_eq!(b.last_seen, None);

    let pagination = snap.pagination.unwrap();
    assert_eq!(pagination.total_pages, 3);
    assert!(pagination.has_next());
}

#[tokio::test]
async fn test_set_filter_sends_new_parameters_from_page_one() {
    let (server, config) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .and(query_param("page", "1"))
        .and(query_param("status", "online"))
        .and(query_param("sort", "storage"))
        .and(query_param("order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(1)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(3)))
        .expect(1)
        .mount(&server)
        .await;

    let store = RegistryStore::new(config.build_client().unwrap());
    assert_eq!(store.set_page(3).await, RefreshOutcome::Published);
    assert_eq!(store.snapshot().pagination.unwrap().page, 3);

    let outcome = store
        .set_filter(
            QueryUpdate::new()
                .status(NodeStatus::Online)
                .sort(SortField::Storage)
                .order(SortOrder::Desc),
        )
        .await;
    assert_eq!(outcome, RefreshOutcome::Published);
    assert_eq!(store.query().page, 1);
}

#[tokio::test]
async fn test_server_error_clears_snapshot() {
    let (server, config) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(1)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = RegistryStore::new(config.build_client().unwrap());
    assert_eq!(store.fetch().await, RefreshOutcome::Published);
    assert_eq!(store.snapshot().len(), 2);

    let RefreshOutcome::Failed(err) = store.refresh().await else {
        panic!("expected failure");
    };
    assert_eq!(err.status(), Some(503));
    let snap = store.snapshot();
    assert_eq!(snap.error.as_deref(), Some("HTTP 503: Service Unavailable"));
    assert!(snap.is_empty());
    assert_eq!(snap.pagination, None);
    assert!(snap.last_updated.is_some());
}

#[tokio::test]
async fn test_malformed_listing_is_reported() {
    let (server, config) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let store = RegistryStore::new(config.build_client().unwrap());
    let RefreshOutcome::Failed(err) = store.fetch().await else {
        panic!("expected failure");
    };
    assert!(matches!(err, CoreError::MalformedPayload { .. }));
    let message = store.snapshot().error.clone().unwrap();
    assert!(message.starts_with("Malformed payload"), "got: {message}");
}

// ── Single-node lookup ──────────────────────────────────────────────

#[tokio::test]
async fn test_lookup_node_maps_404_to_not_found() {
    let (server, config) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = config.build_client().unwrap();
    let err = lookup_node(&client, "missing").await.unwrap_err();
    assert_eq!(
        err,
        CoreError::NodeNotFound {
            pubkey: "missing".into()
        }
    );
}

#[tokio::test]
async fn test_lookup_node_returns_record() {
    let (server, config) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/nodes/A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pubkey": "A",
            "address": "1.1.1.1:9001",
            "status": "delinquent",
            "last_seen": "2024-06-15T10:30:00Z",
            "credits": 42
        })))
        .mount(&server)
        .await;

    let client = config.build_client().unwrap();
    let record = lookup_node(&client, "A").await.unwrap();
    assert_eq!(record.status, NodeStatus::Delinquent);
    assert_eq!(record.primary_address(), Some("1.1.1.1:9001"));
    assert_eq!(record.telemetry.credits(), Some(42.0));
}
