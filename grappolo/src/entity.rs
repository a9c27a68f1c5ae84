//! A uniform view over the two kinds of timeline entity.
//!
//! Raw items and clusters share one temporal-span capability; the merge
//! kernel and clustering criteria see both through [`EntityRef`] instead of
//! two parallel code paths.

use chrono::{DateTime, Utc};
use grappolo_types::{GroupId, TemporalSpan, TimelineItem};

use crate::cluster::item::ClusterItem;

/// Borrowed view of either a raw item or a cluster produced earlier in the
/// same aggregation pass.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    /// A raw timeline item.
    Item(&'a TimelineItem),
    /// An aggregate cluster.
    Cluster(&'a ClusterItem),
}

impl EntityRef<'_> {
    /// The entity's group; `None` only for a cluster already detached from
    /// its parent.
    #[must_use]
    pub fn group(&self) -> Option<&GroupId> {
        match self {
            Self::Item(item) => Some(&item.group),
            Self::Cluster(cluster) => cluster.group(),
        }
    }

    /// True for the cluster variant.
    #[must_use]
    pub const fn is_cluster(&self) -> bool {
        matches!(self, Self::Cluster(_))
    }
}

impl TemporalSpan for EntityRef<'_> {
    fn span_start(&self) -> DateTime<Utc> {
        match self {
            Self::Item(item) => item.span_start(),
            Self::Cluster(cluster) => cluster.span_start(),
        }
    }

    fn span_end(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Item(item) => item.span_end(),
            Self::Cluster(cluster) => cluster.span_end(),
        }
    }
}

/// Predicate gating whether a candidate entity may merge into the seed's
/// neighborhood.
///
/// Implemented for plain closures; when no criteria is supplied the engine
/// falls back to [`AllowAll`] rather than failing, so partially configured
/// hosts keep clustering.
pub trait ClusterCriteria {
    /// Judge one `(seed, candidate)` pair.
    fn allow(&self, seed: &TimelineItem, candidate: EntityRef<'_>) -> bool;
}

impl<F> ClusterCriteria for F
where
    F: Fn(&TimelineItem, EntityRef<'_>) -> bool,
{
    fn allow(&self, seed: &TimelineItem, candidate: EntityRef<'_>) -> bool {
        self(seed, candidate)
    }
}

/// The permissive default criteria: every candidate may merge.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl ClusterCriteria for AllowAll {
    fn allow(&self, _seed: &TimelineItem, _candidate: EntityRef<'_>) -> bool {
        true
    }
}
