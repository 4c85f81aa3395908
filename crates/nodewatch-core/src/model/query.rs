// ── Query and pagination types ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::node::{NodeObservation, NodeStatus};

pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Server-side sort key for node listings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortField {
    Storage,
    Uptime,
    Latency,
    Score,
    Credits,
    Performance,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    #[strum(to_string = "asc", serialize = "ascending")]
    Asc,
    #[serde(rename = "desc")]
    #[strum(to_string = "desc", serialize = "descending")]
    Desc,
}

/// The parameters the registry asks the backend for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size, at least 1.
    pub limit: u32,
    pub status: Option<NodeStatus>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
    pub include_offline: bool,
}

impl Default for NodeQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            status: None,
            sort: None,
            order: None,
            include_offline: true,
        }
    }
}

impl NodeQuery {
    /// Default query with a different page size.
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            ..Self::default()
        }
    }
}

/// A partial change to the filter part of a [`NodeQuery`].
///
/// Outer `None` leaves a field alone; `Some(None)` clears an optional one.
/// Applying an update always moves back to the first page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryUpdate {
    pub status: Option<Option<NodeStatus>>,
    pub sort: Option<Option<SortField>>,
    pub order: Option<Option<SortOrder>>,
    pub include_offline: Option<bool>,
    pub limit: Option<u32>,
}

impl QueryUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: impl Into<Option<NodeStatus>>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<Option<SortField>>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn order(mut self, order: impl Into<Option<SortOrder>>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn include_offline(mut self, include: bool) -> Self {
        self.include_offline = Some(include);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Merge into `query` and reset it to page 1.
    pub fn apply_to(self, query: &mut NodeQuery) {
        if let Some(status) = self.status {
            query.status = status;
        }
        if let Some(sort) = self.sort {
            query.sort = sort;
        }
        if let Some(order) = self.order {
            query.order = order;
        }
        if let Some(include) = self.include_offline {
            query.include_offline = include;
        }
        if let Some(limit) = self.limit {
            query.limit = limit.max(1);
        }
        query.page = 1;
    }
}

/// Pagination metadata for the page currently published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_items: u64,
    pub total_pages: u64,
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// One page of raw observations returned by a fetcher.
#[derive(Debug, Clone, PartialEq)]
pub struct NodesPage {
    pub nodes: Vec<NodeObservation>,
    pub pagination: Pagination,
}
