// ── Node domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Operational status reported for a node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NodeStatus {
    Active,
    Inactive,
    Syncing,
    Online,
    Offline,
    Delinquent,
    Warning,
    /// A tag this client does not know about.
    #[serde(other)]
    Unknown,
}

impl NodeStatus {
    /// Serving normally.
    pub fn is_healthy(self) -> bool {
        matches!(self, Self::Online | Self::Active)
    }

    /// Reachable but not fully serving.
    pub fn is_degraded(self) -> bool {
        matches!(self, Self::Syncing | Self::Warning | Self::Delinquent)
    }

    pub fn is_offline(self) -> bool {
        matches!(self, Self::Offline | Self::Inactive)
    }
}

/// Telemetry attached to a node observation.
///
/// The field set varies by backend version, so it is kept as an open JSON
/// map and copied through untouched. Typed accessors cover the fields the
/// CLI displays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeTelemetry(Map<String, Value>);

impl NodeTelemetry {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric field, accepting JSON numbers only.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    pub fn version(&self) -> Option<&str> {
        self.text("version")
    }

    /// Total storage in bytes (`storage_capacity`, else `storage_capacity_gb`).
    pub fn storage_capacity_bytes(&self) -> Option<f64> {
        self.number("storage_capacity")
            .or_else(|| self.number("storage_capacity_gb").map(|gb| gb * GIB))
    }

    /// Used storage in bytes (`storage_used`, else `storage_used_gb`).
    pub fn storage_used_bytes(&self) -> Option<f64> {
        self.number("storage_used")
            .or_else(|| self.number("storage_used_gb").map(|gb| gb * GIB))
    }

    pub fn uptime_percentage(&self) -> Option<f64> {
        self.number("uptime_percentage")
    }

    pub fn latency_ms(&self) -> Option<f64> {
        self.number("latency_ms")
    }

    pub fn credits(&self) -> Option<f64> {
        self.number("credits")
    }

    pub fn performance_score(&self) -> Option<f64> {
        self.number("performance_score")
    }
}

impl From<Map<String, Value>> for NodeTelemetry {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// A single upstream report about a node, seen at one address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeObservation {
    pub pubkey: String,
    pub address: Option<String>,
    pub status: NodeStatus,
    /// `None` orders before every real instant.
    pub last_seen: Option<DateTime<Utc>>,
    pub telemetry: NodeTelemetry,
}

impl NodeObservation {
    pub fn new(pubkey: impl Into<String>, status: NodeStatus) -> Self {
        Self {
            pubkey: pubkey.into(),
            address: None,
            status,
            last_seen: None,
            telemetry: NodeTelemetry::default(),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_last_seen(mut self, last_seen: DateTime<Utc>) -> Self {
        self.last_seen = Some(last_seen);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.telemetry.insert(key, value.into());
        self
    }

    /// The address, unless it is missing or blank.
    pub(crate) fn usable_address(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.trim().is_empty())
    }
}

/// The merged view of every observation sharing one public key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub pubkey: String,
    /// Distinct non-blank addresses in first-seen order.
    pub addresses: Vec<String>,
    pub status: NodeStatus,
    pub last_seen: Option<DateTime<Utc>>,
    /// Telemetry of the first observation for this key.
    pub telemetry: NodeTelemetry,
}

impl NodeRecord {
    /// The address this node was first seen at.
    pub fn primary_address(&self) -> Option<&str> {
        self.addresses.first().map(String::as_str)
    }

    /// Expand back into one observation per address.
    ///
    /// A record with no addresses yields a single address-less observation.
    /// Reconciling the result reproduces this record.
    pub fn to_observations(&self) -> Vec<NodeObservation> {
        let base = NodeObservation {
            pubkey: self.pubkey.clone(),
            address: None,
            status: self.status,
            last_seen: self.last_seen,
            telemetry: self.telemetry.clone(),
        };

        if self.addresses.is_empty() {
            return vec![base];
        }

        self.addresses
            .iter()
            .map(|address| NodeObservation {
                address: Some(address.clone()),
                ..base.clone()
            })
            .collect()
    }
}

impl From<NodeObservation> for NodeRecord {
    fn from(obs: NodeObservation) -> Self {
        let addresses = obs.usable_address().map(str::to_owned).into_iter().collect();
        Self {
            pubkey: obs.pubkey,
            addresses,
            status: obs.status,
            last_seen: obs.last_seen,
            telemetry: obs.telemetry,
        }
    }
}
