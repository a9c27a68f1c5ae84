//! The aggregate cluster entity.

use chrono::{DateTime, Utc};
use grappolo_types::{
    ClusterId, ClusterSummary, FitRequest, GroupId, ItemId, TemporalSpan, VisibleRange,
};

use crate::error::GrappoloError;
use crate::render::{EventSink, GroupRegistry, TimeScale};
use crate::store::ItemStore;

/// An aggregate entity standing in for a crowded neighborhood of items.
///
/// Clusters are produced by the aggregation pass, cached per zoom level, and
/// destroyed wholesale when their level is invalidated; they are never
/// partially updated. Member items keep a back-reference to their owning
/// cluster, established by [`attach`](Self::attach) and broken by
/// [`detach`](Self::detach).
#[derive(Debug, Clone)]
pub struct ClusterItem {
    id: ClusterId,
    group: Option<GroupId>,
    items: Vec<ItemId>,
    label: String,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    min: DateTime<Utc>,
    max: DateTime<Utc>,
    attached: bool,
    rendered_width: f64,
}

impl ClusterItem {
    /// Build a cluster from its member items.
    ///
    /// The span derives from the members: if any member is a range, the
    /// cluster spans the absolute `[min, max]` bounds; otherwise it is a
    /// point at the arithmetic mean of the member centers (fractional
    /// milliseconds truncate). The label is `title_template` with its first
    /// `{count}` placeholder replaced by the member count.
    ///
    /// # Errors
    /// Returns `GrappoloError::InvalidArg` when `members` is empty or names
    /// an item that is not in the store.
    pub fn new(
        id: ClusterId,
        members: &[ItemId],
        store: &ItemStore,
        group: GroupId,
        title_template: &str,
    ) -> Result<Self, GrappoloError> {
        if members.is_empty() {
            return Err(GrappoloError::invalid_arg(format!(
                "members missing on construction of {id}"
            )));
        }

        let mut min = DateTime::<Utc>::MAX_UTC;
        let mut max = DateTime::<Utc>::MIN_UTC;
        let mut center_sum = 0.0;
        let mut any_range = false;
        for member in members {
            let entry = store.get(member).ok_or_else(|| {
                GrappoloError::invalid_arg(format!("{member} of {id} is not in the store"))
            })?;
            let data = entry.data();
            let lo = data.end.map_or(data.start, |end| data.start.min(end));
            let hi = data.end.map_or(data.start, |end| data.start.max(end));
            min = min.min(lo);
            max = max.max(hi);
            center_sum += entry.center();
            any_range |= data.is_range();
        }

        let (start, end) = if any_range {
            (min, Some(max))
        } else {
            let mean = center_sum / members.len() as f64;
            let start = DateTime::from_timestamp_millis(mean as i64).ok_or_else(|| {
                GrappoloError::invalid_arg(format!("derived span of {id} is unrepresentable"))
            })?;
            (start, None)
        };

        let count = members.len();
        let label = title_template.replacen("{count}", &count.to_string(), 1);

        Ok(Self {
            id,
            group: Some(group),
            items: members.to_vec(),
            label,
            start,
            end,
            min,
            max,
            attached: false,
            rendered_width: 0.0,
        })
    }

    /// Engine-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> ClusterId {
        self.id
    }

    /// The group of the seed member; `None` after detaching from the parent.
    #[must_use]
    pub const fn group(&self) -> Option<&GroupId> {
        self.group.as_ref()
    }

    /// Member ids in scan order.
    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Number of members.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Derived display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Start of the derived span.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the derived span; `None` for point clusters.
    #[must_use]
    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Absolute lower bound across all member spans.
    #[must_use]
    pub const fn min(&self) -> DateTime<Utc> {
        self.min
    }

    /// Absolute upper bound across all member spans.
    #[must_use]
    pub const fn max(&self) -> DateTime<Utc> {
        self.max
    }

    /// Whether member back-references currently point at this cluster.
    #[must_use]
    pub const fn attached(&self) -> bool {
        self.attached
    }

    /// Clusters are never individually editable.
    #[must_use]
    pub const fn editable(&self) -> bool {
        false
    }

    /// Point every member's back-reference at this cluster.
    ///
    /// # Errors
    /// Returns `GrappoloError::Invariant` when a member has vanished from
    /// the store — a caller sequencing bug, surfaced rather than recovered.
    pub fn attach(&mut self, store: &mut ItemStore) -> Result<(), GrappoloError> {
        for member in &self.items {
            if !store.set_cluster(member, self.id) {
                return Err(GrappoloError::invariant(format!(
                    "cannot attach {}: {member} vanished from the store",
                    self.id
                )));
            }
        }
        self.attached = true;
        Ok(())
    }

    /// Break every member's back-reference.
    ///
    /// No-op unless the cluster currently has attached members, which makes
    /// a second detach after invalidation harmless. Members already removed
    /// from the store are skipped silently. With `detach_from_parent`, the
    /// cluster also unregisters from its group and forgets it.
    pub fn detach(
        &mut self,
        store: &mut ItemStore,
        registry: &mut dyn GroupRegistry,
        detach_from_parent: bool,
    ) {
        if !self.has_items() {
            return;
        }

        for member in &self.items {
            store.clear_cluster(member);
        }
        self.attached = false;

        if detach_from_parent {
            if let Some(group) = self.group.take() {
                registry.unregister(&group, self.id);
            }
        }
    }

    /// True when the cluster has members and they are attached.
    #[must_use]
    pub fn has_items(&self) -> bool {
        !self.items.is_empty() && self.attached
    }

    /// Members whose back-reference still points at this cluster.
    ///
    /// After a cache rebuild reassigns some members to a newer cluster this
    /// is the subset that still belongs here; renderers probe it before
    /// trusting a cached cluster.
    #[must_use]
    pub fn live_members(&self, store: &ItemStore) -> Vec<ItemId> {
        self.items
            .iter()
            .copied()
            .filter(|member| store.cluster_of(member) == Some(self.id))
            .collect()
    }

    /// Whether the cluster should render within the given viewport.
    ///
    /// Ranged clusters are visible when overlapping the range; point
    /// clusters when their center ± half the rendered width does. Both
    /// additionally require live attached members, so a cluster whose
    /// members were reclaimed by a newer level never renders stale.
    #[must_use]
    pub fn is_visible(&self, range: &VisibleRange) -> bool {
        if let Some(end) = self.end {
            return self.start < range.end && end > range.start && self.has_items();
        }

        let width_millis = self.rendered_width * range.millis_per_pixel;
        let start_millis = self.start.timestamp_millis() as f64;
        start_millis + width_millis / 2.0 > range.start_millis() as f64
            && start_millis - width_millis / 2.0 < range.end_millis() as f64
            && self.has_items()
    }

    /// Record the width the host rendered this cluster at, in pixels.
    pub fn set_rendered_width(&mut self, px: f64) {
        self.rendered_width = px;
    }

    /// Width the host rendered this cluster at, in pixels.
    #[must_use]
    pub const fn rendered_width(&self) -> f64 {
        self.rendered_width
    }

    /// The fit-to-range payload for this cluster: its absolute bounds, with
    /// animation requested.
    #[must_use]
    pub const fn fit_request(&self) -> FitRequest {
        FitRequest {
            start: self.min,
            end: self.max,
            animation: true,
        }
    }

    /// Emit a fit-to-range notification for this cluster, the reaction to a
    /// host activation gesture such as a double-click.
    pub fn request_fit(&self, sink: &mut dyn EventSink) {
        sink.fit_to_range(self.fit_request());
    }

    /// Screen-space `(start, end)` of the span under the given conversion;
    /// the end is `None` for point clusters.
    #[must_use]
    pub fn pixel_span(&self, scale: &dyn TimeScale) -> (f64, Option<f64>) {
        let start = scale.to_screen(self.start);
        let end = self.end.map(|end| scale.to_screen(end));
        (start, end)
    }

    /// Serialisable snapshot of this cluster.
    #[must_use]
    pub fn summary(&self) -> ClusterSummary {
        ClusterSummary {
            id: self.id,
            group: self.group.clone().unwrap_or_default(),
            label: self.label.clone(),
            start: self.start,
            end: self.end,
            min: self.min,
            max: self.max,
            items: self.items.clone(),
        }
    }
}

impl TemporalSpan for ClusterItem {
    fn span_start(&self) -> DateTime<Utc> {
        self.start
    }

    fn span_end(&self) -> Option<DateTime<Utc>> {
        self.end
    }
}
