// ── Fetch collaborator ──
//
// The registry store never talks HTTP itself. It asks a `NodeFetcher` for
// one page of raw observations and reconciles whatever comes back.

use std::future::Future;

use nodewatch_api::{NodesClient, NodesQuery};
use tracing::debug;

use crate::error::CoreError;
use crate::model::{NodeObservation, NodeQuery, NodeRecord, NodesPage};

/// Source of raw node listings.
///
/// Implementations perform no retries: a failure is reported once and
/// the store surfaces it as-is.
pub trait NodeFetcher: Send + Sync + 'static {
    /// Fetch one page of observations matching `query`.
    fn fetch_nodes(
        &self,
        query: &NodeQuery,
    ) -> impl Future<Output = Result<NodesPage, CoreError>> + Send;
}

impl NodeFetcher for NodesClient {
    async fn fetch_nodes(&self, query: &NodeQuery) -> Result<NodesPage, CoreError> {
        let response = self.list_nodes(&NodesQuery::from(query)).await?;
        debug!(
            count = response.nodes.len(),
            page = response.pagination.page,
            total = response.pagination.total_items,
            "fetched node page"
        );
        Ok(NodesPage {
            nodes: response.nodes.into_iter().map(NodeObservation::from).collect(),
            pagination: response.pagination.into(),
        })
    }
}

/// Fetch a single node by public key, bypassing the registry.
///
/// A 404 from the backend becomes [`CoreError::NodeNotFound`].
pub async fn lookup_node(client: &NodesClient, pubkey: &str) -> Result<NodeRecord, CoreError> {
    match client.get_node(pubkey).await {
        Ok(raw) => Ok(NodeRecord::from(NodeObservation::from(raw))),
        Err(e) if e.is_not_found() => Err(CoreError::NodeNotFound {
            pubkey: pubkey.to_owned(),
        }),
        Err(e) => Err(e.into()),
    }
}
