// ── Query state and fetch cycles ──
//
// Every fetch is tagged with a sequence number when it is issued. Only the
// most recently issued fetch may publish; older completions are dropped so
// a slow response can never overwrite a newer one.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::watch;
use tracing::debug;

use super::snapshot::RegistrySnapshot;
use crate::error::CoreError;
use crate::fetcher::NodeFetcher;
use crate::model::{NodeQuery, NodeRecord, Pagination, QueryUpdate};
use crate::reconcile::reconcile;
use crate::stream::SnapshotStream;

const FALLBACK_ERROR: &str = "Failed to fetch node data";

/// How a single fetch cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Records and pagination were replaced.
    Published,
    /// The fetch failed; the snapshot now carries its message.
    Failed(CoreError),
    /// A newer fetch was issued meanwhile; nothing was published.
    Superseded,
}

/// Reactive, paginated view over the node registry.
///
/// Cheap to clone; clones share query state and subscribers. Every fetch
/// runs on its own tokio task, so the store settles even when the caller
/// drops the returned outcome future.
pub struct RegistryStore<F> {
    inner: Arc<StoreInner<F>>,
}

impl<F> Clone for RegistryStore<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct StoreInner<F> {
    fetcher: F,
    state: Mutex<StoreState>,
    snapshot: watch::Sender<Arc<RegistrySnapshot>>,
}

struct StoreState {
    query: NodeQuery,
    /// Sequence number of the most recently issued fetch.
    issued: u64,
}

/// An issued fetch: its sequence number and the query it runs with.
struct Ticket {
    seq: u64,
    query: NodeQuery,
}

type FetchResult = Result<(Vec<NodeRecord>, Pagination), CoreError>;

impl<F: NodeFetcher> RegistryStore<F> {
    /// Create a store with the default query (page 1, 50 per page).
    pub fn new(fetcher: F) -> Self {
        Self::with_query(fetcher, NodeQuery::default())
    }

    /// Create a store starting from `query`. Page and limit clamp to 1.
    pub fn with_query(fetcher: F, mut query: NodeQuery) -> Self {
        query.page = query.page.max(1);
        query.limit = query.limit.max(1);
        let (snapshot, _) = watch::channel(Arc::new(RegistrySnapshot::empty(query.clone())));
        Self {
            inner: Arc::new(StoreInner {
                fetcher,
                state: Mutex::new(StoreState { query, issued: 0 }),
                snapshot,
            }),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// The current query, including changes whose fetch is still running.
    pub fn query(&self) -> NodeQuery {
        self.inner.lock_state().query.clone()
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.inner.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.inner.snapshot.subscribe())
    }

    pub fn fetcher(&self) -> &F {
        &self.inner.fetcher
    }

    // ── Fetch cycles ─────────────────────────────────────────────────
    //
    // These publish `loading` and spawn the fetch before returning, so they
    // must be called from within a tokio runtime. Awaiting the returned
    // future is optional.

    /// Fetch with the current query.
    pub fn fetch(&self) -> impl Future<Output = RefreshOutcome> + Send + use<F> {
        let ticket = self.inner.begin(|_| {});
        StoreInner::spawn(&self.inner, ticket)
    }

    /// Re-fetch with the query unchanged.
    pub fn refresh(&self) -> impl Future<Output = RefreshOutcome> + Send + use<F> {
        self.fetch()
    }

    /// Move to `page` (0 is treated as 1) and fetch.
    pub fn set_page(&self, page: u32) -> impl Future<Output = RefreshOutcome> + Send + use<F> {
        let ticket = self.inner.begin(|query| query.page = page.max(1));
        StoreInner::spawn(&self.inner, ticket)
    }

    /// Merge `update` into the query, go back to page 1, and fetch.
    pub fn set_filter(
        &self,
        update: QueryUpdate,
    ) -> impl Future<Output = RefreshOutcome> + Send + use<F> {
        let ticket = self.inner.begin(|query| update.apply_to(query));
        StoreInner::spawn(&self.inner, ticket)
    }
}

impl<F: NodeFetcher> StoreInner<F> {
    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a query change, issue a new sequence number and publish
    /// `loading`, all under one lock.
    fn begin(&self, change: impl FnOnce(&mut NodeQuery)) -> Ticket {
        let mut state = self.lock_state();
        change(&mut state.query);
        state.issued += 1;
        let ticket = Ticket {
            seq: state.issued,
            query: state.query.clone(),
        };

        debug!(seq = ticket.seq, query = ?ticket.query, "fetch issued");
        self.snapshot.send_modify(|snap| {
            *snap = Arc::new(RegistrySnapshot {
                loading: true,
                query: ticket.query.clone(),
                ..RegistrySnapshot::clone(snap)
            });
        });
        ticket
    }

    /// Run `ticket` on a new task and return a future for its outcome.
    fn spawn(
        this: &Arc<Self>,
        ticket: Ticket,
    ) -> impl Future<Output = RefreshOutcome> + Send + use<F> {
        let handle = tokio::spawn(Arc::clone(this).run(ticket));
        async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                // Cancelled by runtime shutdown; nothing was published.
                Err(_) => RefreshOutcome::Superseded,
            }
        }
    }

    async fn run(self: Arc<Self>, ticket: Ticket) -> RefreshOutcome {
        let result = self
            .fetcher
            .fetch_nodes(&ticket.query)
            .await
            .map(|page| (reconcile(page.nodes), page.pagination));
        self.finish(&ticket, result)
    }

    fn finish(&self, ticket: &Ticket, result: FetchResult) -> RefreshOutcome {
        let state = self.lock_state();
        if ticket.seq != state.issued {
            debug!(seq = ticket.seq, latest = state.issued, "fetch superseded");
            return RefreshOutcome::Superseded;
        }

        let outcome = match result {
            Ok((records, pagination)) => {
                debug!(seq = ticket.seq, count = records.len(), "fetch published");
                self.publish(RegistrySnapshot {
                    loading: false,
                    error: None,
                    last_updated: Some(Utc::now()),
                    records: records.into(),
                    pagination: Some(pagination),
                    query: state.query.clone(),
                });
                RefreshOutcome::Published
            }
            Err(e) => {
                let mut message = e.to_string();
                if message.is_empty() {
                    FALLBACK_ERROR.clone_into(&mut message);
                }
                debug!(seq = ticket.seq, error = %message, "fetch failed");
                let last_updated = self.snapshot.borrow().last_updated;
                self.publish(RegistrySnapshot {
                    loading: false,
                    error: Some(message),
                    last_updated,
                    records: Arc::from(Vec::new()),
                    pagination: None,
                    query: state.query.clone(),
                });
                RefreshOutcome::Failed(e)
            }
        };
        drop(state);
        outcome
    }

    fn publish(&self, snapshot: RegistrySnapshot) {
        self.snapshot.send_replace(Arc::new(snapshot));
    }
}
