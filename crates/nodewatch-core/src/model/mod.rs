// ── Domain model ──
//
// Canonical node types produced by reconciliation, plus the query and
// pagination types that drive the registry store.

pub mod node;
pub mod query;

pub use node::{NodeObservation, NodeRecord, NodeStatus, NodeTelemetry};
pub use query::{
    DEFAULT_PAGE_LIMIT, NodeQuery, NodesPage, Pagination, QueryUpdate, SortField, SortOrder,
};
