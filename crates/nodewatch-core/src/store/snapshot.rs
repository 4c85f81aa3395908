// ── Published registry state ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{NodeQuery, NodeRecord, Pagination};

/// An immutable view of the registry, replaced wholesale on every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrySnapshot {
    /// A fetch is outstanding.
    pub loading: bool,
    /// Message of the last failed fetch, cleared by the next success.
    pub error: Option<String>,
    /// When a fetch last succeeded.
    pub last_updated: Option<DateTime<Utc>>,
    /// Reconciled records, one per public key.
    pub records: Arc<[NodeRecord]>,
    pub pagination: Option<Pagination>,
    /// The query in effect when this snapshot was published.
    pub query: NodeQuery,
}

impl RegistrySnapshot {
    pub(crate) fn empty(query: NodeQuery) -> Self {
        Self {
            loading: false,
            error: None,
            last_updated: None,
            records: Arc::from(Vec::new()),
            pagination: None,
            query,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look a record up by public key.
    pub fn find(&self, pubkey: &str) -> Option<&NodeRecord> {
        self.records.iter().find(|r| r.pubkey == pubkey)
    }
}
