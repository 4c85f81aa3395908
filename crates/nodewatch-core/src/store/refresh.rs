// ── Periodic refresh ──
//
// Background task that re-runs the current query on a fixed period until
// cancelled.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::registry::{RefreshOutcome, RegistryStore};
use crate::fetcher::NodeFetcher;

/// Handle to a running auto-refresh task.
#[derive(Debug)]
pub struct AutoRefresh {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl AutoRefresh {
    /// Cancel the task and wait for it to exit.
    ///
    /// A refresh already in flight is allowed to finish first.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<F: NodeFetcher> RegistryStore<F> {
    /// Spawn a task calling [`refresh`](Self::refresh) every `period`.
    ///
    /// The first refresh happens one period from now. Returns `None`
    /// without spawning when `period` is zero. Must be called from within
    /// a tokio runtime.
    pub fn spawn_auto_refresh(
        &self,
        period: Duration,
        cancel: CancellationToken,
    ) -> Option<AutoRefresh> {
        if period.is_zero() {
            return None;
        }
        let handle = tokio::spawn(refresh_task(self.clone(), period, cancel.clone()));
        Some(AutoRefresh { cancel, handle })
    }
}

async fn refresh_task<F: NodeFetcher>(
    store: RegistryStore<F>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match store.refresh().await {
                    RefreshOutcome::Published => {}
                    RefreshOutcome::Failed(error) => warn!(%error, "periodic refresh failed"),
                    RefreshOutcome::Superseded => debug!("periodic refresh superseded"),
                }
            }
        }
    }
    debug!("auto-refresh stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::CoreError;
    use crate::model::{NodeQuery, NodesPage, Pagination};

    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
    }

    impl NodeFetcher for CountingFetcher {
        async fn fetch_nodes(&self, query: &NodeQuery) -> Result<NodesPage, CoreError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n % 2 == 1 {
                return Err(CoreError::Transport {
                    message: "connection refused".into(),
                    timed_out: false,
                });
            }
            Ok(NodesPage {
                nodes: Vec::new(),
                pagination: Pagination {
                    total_items: 0,
                    total_pages: 0,
                    page: query.page,
                    limit: query.limit,
                },
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_every_period_until_stopped() {
        let store = RegistryStore::new(CountingFetcher::default());
        let auto = store
            .spawn_auto_refresh(Duration::from_secs(7), CancellationToken::new())
            .unwrap();

        tokio::time::sleep(Duration::from_millis(6_900)).await;
        assert_eq!(store.fetcher().calls.load(Ordering::SeqCst), 0);

        // Failures on odd cycles do not stop the task.
        tokio::time::sleep(Duration::from_millis(14_500)).await;
        assert_eq!(store.fetcher().calls.load(Ordering::SeqCst), 3);
        assert!(!auto.is_finished());

        auto.stop().await;
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(store.fetcher().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_period_spawns_nothing() {
        let store = RegistryStore::new(CountingFetcher::default());
        assert!(
            store
                .spawn_auto_refresh(Duration::ZERO, CancellationToken::new())
                .is_none()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn external_cancel_ends_task() {
        let store = RegistryStore::new(CountingFetcher::default());
        let cancel = CancellationToken::new();
        let auto = store
            .spawn_auto_refresh(Duration::from_secs(1), cancel.clone())
            .unwrap();

        cancel.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(auto.is_finished());
        assert_eq!(store.fetcher().calls.load(Ordering::SeqCst), 0);
    }
}
