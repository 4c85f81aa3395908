// Node and backend endpoints
//
// Listing is paginated server-side; the client returns exactly one page
// and leaves deduplication to the caller.

use tracing::debug;

use crate::client::NodesClient;
use crate::error::Error;
use crate::models::{
    BackendStatus, HealthResponse, NetworkStats, NodesQuery, NodesResponse, RawNode,
};

impl NodesClient {
    /// List one page of node observations.
    ///
    /// `GET /api/nodes?page=&limit=&status=&sort=&order=&include_offline=`
    pub async fn list_nodes(&self, query: &NodesQuery) -> Result<NodesResponse, Error> {
        let url = self.api_url("nodes")?;
        debug!(?query, "listing nodes");
        self.get_with_query(url, query).await
    }

    /// Fetch a single node by public key.
    ///
    /// `GET /api/nodes/{pubkey}`. A 404 surfaces as an `Error::Http`
    /// for which [`Error::is_not_found`] is true.
    pub async fn get_node(&self, pubkey: &str) -> Result<RawNode, Error> {
        let mut url = self.api_url("nodes")?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(pubkey);
        debug!(pubkey, "fetching node");
        self.get(url).await
    }

    /// Backend liveness check.
    ///
    /// `GET /health`, served at the base root rather than under `/api`.
    pub async fn health(&self) -> Result<HealthResponse, Error> {
        let url = self.root_url("health")?;
        self.get(url).await
    }

    /// Backend version and uptime.
    ///
    /// `GET /api/status`
    pub async fn backend_status(&self) -> Result<BackendStatus, Error> {
        let url = self.api_url("status")?;
        self.get(url).await
    }

    /// Network-wide aggregates.
    ///
    /// `GET /api/stats`
    pub async fn network_stats(&self) -> Result<NetworkStats, Error> {
        let url = self.api_url("stats")?;
        debug!("fetching network stats");
        self.get(url).await
    }
}
