//! Node registry reconciliation and reactive query store.
//!
//! This crate sits between `nodewatch-api` and its consumers (the CLI):
//!
//! - **[`reconcile()`]** folds a raw listing, where one node appears once
//!   per address it was seen at, into one [`NodeRecord`] per public key.
//!   Pure, deterministic and idempotent.
//!
//! - **[`RegistryStore`]** owns the [`NodeQuery`] (page, limit, filters),
//!   runs fetch cycles through a [`NodeFetcher`], and publishes immutable
//!   [`RegistrySnapshot`]s. Every fetch carries a sequence number; a
//!   completion that is no longer the latest issued is dropped.
//!
//! - **[`SnapshotStream`]** is the subscription handle vended by the
//!   store, with `current()` / `latest()` / `changed()` and a `Stream`
//!   adapter.
//!
//! - **[`AutoRefresh`]** re-runs the current query on a fixed period.
//!
//! `nodewatch_api::NodesClient` implements [`NodeFetcher`]; tests plug in
//! scripted fetchers instead.

pub mod config;
pub mod convert;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod reconcile;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ClientConfig;
pub use error::CoreError;
pub use fetcher::{NodeFetcher, lookup_node};
pub use reconcile::reconcile;
pub use store::{AutoRefresh, RefreshOutcome, RegistrySnapshot, RegistryStore};
pub use stream::{SnapshotStream, SnapshotWatchStream};

// Backend aggregates pass through unchanged
pub use nodewatch_api::NetworkStats;

pub use model::{
    DEFAULT_PAGE_LIMIT, NodeObservation, NodeQuery, NodeRecord, NodeStatus, NodeTelemetry,
    NodesPage, Pagination, QueryUpdate, SortField, SortOrder,
};
