// ── Runtime client configuration ──
//
// Describes how to reach the dashboard backend and how the registry
// should page and refresh. Never touches disk: the CLI builds one from
// its config file and flags and hands it in.

use std::time::Duration;

use nodewatch_api::{NodesClient, TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;
use crate::model::{DEFAULT_PAGE_LIMIT, NodeQuery};

/// Connection and paging settings for one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL (e.g. `http://127.0.0.1:8000`).
    pub url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Auto-refresh period. Zero disables auto-refresh.
    pub refresh_interval: Duration,
    /// Page size of the initial query.
    pub page_limit: u32,
    /// Skip TLS certificate verification.
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: Duration::from_secs(30),
            refresh_interval: Duration::from_millis(7000),
            page_limit: DEFAULT_PAGE_LIMIT,
            accept_invalid_certs: false,
        }
    }

    fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: if self.accept_invalid_certs {
                TlsMode::DangerAcceptInvalid
            } else {
                TlsMode::System
            },
            timeout: self.timeout,
        }
    }

    /// Build the HTTP client this config describes.
    pub fn build_client(&self) -> Result<NodesClient, CoreError> {
        Ok(NodesClient::new(self.url.clone(), &self.transport())?)
    }

    /// The query a freshly constructed store should start from.
    pub fn initial_query(&self) -> NodeQuery {
        NodeQuery::with_limit(self.page_limit)
    }
}
