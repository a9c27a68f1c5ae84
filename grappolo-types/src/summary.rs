//! Serialisable snapshots of engine output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::{ClusterId, GroupId, ItemId};

/// Snapshot of one cluster, suitable for host-side inspection or export.
///
/// Carries the derived span, the absolute bounds used by fit-to-range, and
/// the member ids in scan order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Engine-assigned cluster identifier.
    pub id: ClusterId,
    /// Group of the cluster's seed member.
    pub group: GroupId,
    /// Derived display label.
    pub label: String,
    /// Start of the derived span.
    pub start: DateTime<Utc>,
    /// End of the derived span; `None` when the cluster aggregates only
    /// point items.
    pub end: Option<DateTime<Utc>>,
    /// Absolute lower bound across all member spans.
    pub min: DateTime<Utc>,
    /// Absolute upper bound across all member spans.
    pub max: DateTime<Utc>,
    /// Member ids in scan order.
    pub items: Vec<ItemId>,
}

impl ClusterSummary {
    /// Number of members aggregated in the cluster.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }
}
