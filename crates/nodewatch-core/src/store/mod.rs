// ── Registry store ──
//
// Owns the query state, drives fetch cycles through a `NodeFetcher`, and
// publishes reconciled snapshots over a `watch` channel.

mod refresh;
mod registry;
mod snapshot;

pub use refresh::AutoRefresh;
pub use registry::{RefreshOutcome, RegistryStore};
pub use snapshot::RegistrySnapshot;
