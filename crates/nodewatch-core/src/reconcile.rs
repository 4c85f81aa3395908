// ── Observation reconciliation ──
//
// Folds a raw listing, where one node may appear once per address it was
// seen at, into one canonical record per public key.

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::trace;

use crate::model::{NodeObservation, NodeRecord};

/// Merge observations into one record per public key.
///
/// Records come out in the order their key was first seen. For a repeated
/// key:
///
/// - a non-blank address not yet on the record is appended, whatever the
///   observation's age;
/// - status and `last_seen` are replaced only when the observation is
///   strictly newer (a missing timestamp is older than any real one);
/// - telemetry stays that of the first observation.
///
/// Pure and idempotent: reconciling the expansion of a result (see
/// [`NodeRecord::to_observations`]) yields the same result.
pub fn reconcile<I>(observations: I) -> Vec<NodeRecord>
where
    I: IntoIterator<Item = NodeObservation>,
{
    let mut records: IndexMap<String, NodeRecord> = IndexMap::new();

    for obs in observations {
        match records.entry(obs.pubkey.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(NodeRecord::from(obs));
            }
            Entry::Occupied(mut slot) => merge(slot.get_mut(), &obs),
        }
    }

    records.into_values().collect()
}

fn merge(record: &mut NodeRecord, obs: &NodeObservation) {
    if let Some(address) = obs.usable_address() {
        if !record.addresses.iter().any(|known| known == address) {
            trace!(pubkey = %record.pubkey, address, "new address");
            record.addresses.push(address.to_owned());
        }
    }

    if obs.last_seen > record.last_seen {
        trace!(
            pubkey = %record.pubkey,
            from = %record.status,
            to = %obs.status,
            "newer observation"
        );
        record.status = obs.status;
        record.last_seen = obs.last_seen;
    }
}
