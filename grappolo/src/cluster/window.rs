//! The windowed neighbor-counting kernel.
//!
//! Pure over its inputs: one seed position in a center-sorted group, the
//! current window, and the clusters already produced in this pass. The
//! generator drives it left to right and acts on the returned decision,
//! which keeps the tricky scan logic independently testable.

use grappolo_types::{GroupId, ItemId, TemporalSpan};

use crate::cluster::item::ClusterItem;
use crate::entity::{ClusterCriteria, EntityRef};
use crate::error::GrappoloError;
use crate::store::ItemStore;

/// One group member as seen by the kernel: the item id plus the center the
/// group was sorted by.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GroupedItem {
    pub id: ItemId,
    pub center: f64,
}

/// Outcome of evaluating one seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MergeOutcome {
    /// The neighborhood is quiet; the seed stays unclustered.
    Standalone,
    /// The neighborhood is too crowded; take `take` consecutive members
    /// starting at the seed.
    Merge { take: usize },
}

/// Count the seed's neighborhood: itself, unclaimed members to its left,
/// members to its right (claimed or not — only the left scan excludes
/// already-claimed members), and same-group clusters already produced in
/// this pass.
pub(crate) fn count_neighbors(
    members: &[GroupedItem],
    seed: usize,
    window_millis: f64,
    criteria: &dyn ClusterCriteria,
    store: &ItemStore,
    produced: &[ClusterItem],
    group: &GroupId,
) -> Result<usize, GrappoloError> {
    let seed_item = store
        .get(&members[seed].id)
        .ok_or_else(|| stale(members[seed].id))?
        .data();
    let seed_center = members[seed].center;
    let half_window = window_millis / 2.0;
    let mut neighbors = 1usize;

    for left in members[..seed].iter().rev() {
        if seed_center - left.center >= half_window {
            break;
        }
        let entry = store.get(&left.id).ok_or_else(|| stale(left.id))?;
        if entry.cluster().is_none() && criteria.allow(seed_item, EntityRef::Item(entry.data())) {
            neighbors += 1;
        }
    }

    for right in &members[seed + 1..] {
        if right.center - seed_center >= half_window {
            break;
        }
        let entry = store.get(&right.id).ok_or_else(|| stale(right.id))?;
        if criteria.allow(seed_item, EntityRef::Item(entry.data())) {
            neighbors += 1;
        }
    }

    for cluster in produced.iter().rev() {
        if seed_center - cluster.center_millis() >= window_millis {
            break;
        }
        if cluster.group() == Some(group) && criteria.allow(seed_item, EntityRef::Cluster(cluster))
        {
            neighbors += 1;
        }
    }

    Ok(neighbors)
}

/// Turn a neighbor count into a merge decision.
pub(crate) const fn decide(neighbors: usize, max_items: usize) -> MergeOutcome {
    if neighbors > max_items {
        MergeOutcome::Merge {
            take: neighbors - max_items + 1,
        }
    } else {
        MergeOutcome::Standalone
    }
}

fn stale(id: ItemId) -> GrappoloError {
    GrappoloError::invariant(format!(
        "{id} vanished from the store without a data-change notification"
    ))
}
