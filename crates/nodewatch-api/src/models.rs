// Dashboard API wire types
//
// Raw request/response shapes as the backend speaks them. Node objects
// carry dozens of loosely-typed telemetry fields; only the ones the
// registry needs are modelled explicitly and everything else lands in
// `extra` untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Nodes ────────────────────────────────────────────────────────────

/// Query parameters for `GET /api/nodes`.
///
/// Absent fields are left out of the query string entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_offline: Option<bool>,
}

/// Paginated response from `GET /api/nodes`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodesResponse {
    pub nodes: Vec<RawNode>,
    pub pagination: PaginationMeta,
}

/// Pagination block attached to paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaginationMeta {
    pub total_items: u64,
    pub total_pages: u64,
    pub page: u32,
    pub limit: u32,
}

/// One node observation as reported by the backend.
///
/// The same `pubkey` may appear several times in one listing, once per
/// network address the node was seen at.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawNode {
    pub pubkey: String,
    #[serde(default)]
    pub address: Option<String>,
    pub status: String,
    /// Epoch milliseconds or an ISO-8601 string, depending on backend version.
    #[serde(default)]
    pub last_seen: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Backend ──────────────────────────────────────────────────────────

/// Response from `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Response from `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BackendStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Backend uptime in seconds.
    #[serde(default)]
    pub uptime: Option<f64>,
}

// ── Network stats ────────────────────────────────────────────────────

/// Response from `GET /api/stats`.
///
/// Only the headline aggregates are typed; averages and per-visibility
/// node counts stay in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NetworkStats {
    /// Percentage in `[0, 100]`.
    pub network_health: f64,
    pub total_nodes: u64,
    pub online_nodes: u64,
    pub total_storage_bytes: f64,
    pub used_storage_bytes: f64,
    #[serde(default)]
    pub total_pods: Option<u64>,
    /// Epoch milliseconds or an ISO-8601 string.
    #[serde(default)]
    pub last_updated: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
