// ── API-to-domain type conversions ──
//
// Bridges raw `nodewatch_api` wire types into `nodewatch_core::model`.
// Status tags become `NodeStatus`, timestamps become `DateTime<Utc>`, and
// every field the registry does not interpret moves into `NodeTelemetry`
// verbatim.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use nodewatch_api::{NodesQuery, PaginationMeta, RawNode};

use crate::model::{NodeObservation, NodeQuery, NodeStatus, NodeTelemetry, Pagination};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse a wire status tag. Unrecognised tags map to `Unknown`.
pub(crate) fn parse_status(raw: &str) -> NodeStatus {
    raw.trim().parse().unwrap_or(NodeStatus::Unknown)
}

/// Parse a wire `last_seen` value.
///
/// Numbers are epoch milliseconds; strings are ISO-8601, with or without
/// an offset (offset-less values are taken as UTC). Anything else is
/// treated as never seen.
pub(crate) fn parse_last_seen(raw: Option<&Value>) -> Option<DateTime<Utc>> {
    match raw? {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().and_then(f64_to_millis))?;
            DateTime::from_timestamp_millis(millis)
        }
        Value::String(s) => parse_iso(s),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn f64_to_millis(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.round() as i64)
}

fn parse_iso(raw: &str) -> Option<DateTime<Utc>> {
    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ── Nodes ──────────────────────────────────────────────────────────

impl From<RawNode> for NodeObservation {
    fn from(raw: RawNode) -> Self {
        Self {
            status: parse_status(&raw.status),
            last_seen: parse_last_seen(raw.last_seen.as_ref()),
            pubkey: raw.pubkey,
            address: raw.address,
            telemetry: NodeTelemetry::from(raw.extra),
        }
    }
}

impl From<PaginationMeta> for Pagination {
    fn from(meta: PaginationMeta) -> Self {
        Self {
            total_items: meta.total_items,
            total_pages: meta.total_pages,
            page: meta.page,
            limit: meta.limit,
        }
    }
}

impl From<&NodeQuery> for NodesQuery {
    fn from(query: &NodeQuery) -> Self {
        Self {
            page: Some(query.page),
            limit: Some(query.limit),
            status: query.status.map(|s| s.to_string()),
            sort: query.sort.map(|s| s.to_string()),
            order: query.order.map(|o| o.to_string()),
            include_offline: Some(query.include_offline),
        }
    }
}
