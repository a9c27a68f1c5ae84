//! Grouping, level-indexed caching, and the aggregation driver.

use std::collections::HashMap;

use grappolo_types::{ClusterConfig, ClusterId, DataChange, GroupId, ItemId};

use crate::cluster::item::ClusterItem;
use crate::cluster::level::ZoomLevel;
use crate::cluster::window::{self, GroupedItem, MergeOutcome};
use crate::entity::{AllowAll, ClusterCriteria};
use crate::error::GrappoloError;
use crate::render::GroupRegistry;
use crate::store::ItemStore;

/// Options for one cluster request: the declarative configuration plus the
/// optional merge predicate.
pub struct ClusterOptions {
    /// Maximum number of visible items a neighborhood may hold before it is
    /// collapsed; zero is coerced to one.
    pub max_items: usize,
    /// Label template with a `{count}` placeholder.
    pub title_template: String,
    /// Merge predicate; `None` falls back to [`AllowAll`].
    pub criteria: Option<Box<dyn ClusterCriteria>>,
}

impl ClusterOptions {
    /// Lift a declarative [`ClusterConfig`] into engine options with no
    /// merge predicate.
    #[must_use]
    pub fn from_config(config: &ClusterConfig) -> Self {
        Self {
            max_items: config.max_items,
            title_template: config.title_template.clone(),
            criteria: None,
        }
    }

    /// Attach a merge predicate, consuming and returning the options.
    #[must_use]
    pub fn with_criteria(mut self, criteria: impl ClusterCriteria + 'static) -> Self {
        self.criteria = Some(Box::new(criteria));
        self
    }
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self::from_config(&ClusterConfig::default())
    }
}

impl core::fmt::Debug for ClusterOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClusterOptions")
            .field("max_items", &self.max_items)
            .field("title_template", &self.title_template)
            .field("criteria", &self.criteria.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

/// Produces and caches the cluster sequence for each discrete zoom level.
///
/// The generator owns the grouping snapshot and the cache exclusively; the
/// item store stays with the host and is borrowed per call. Invalidation is
/// lazy: data changes only mark a dirty flag, and the rebuild happens on the
/// next cluster request that needs it.
#[derive(Debug)]
pub struct ClusterGenerator {
    groups: Vec<(GroupId, Vec<GroupedItem>)>,
    cache: HashMap<i64, Vec<ClusterItem>>,
    cache_level: i64,
    data_changed: bool,
    apply_on_changed_level: bool,
    next_cluster: u64,
}

impl Default for ClusterGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterGenerator {
    /// Create a generator with an empty grouping snapshot and a cache
    /// seeded at the base level.
    #[must_use]
    pub fn new() -> Self {
        let mut generator = Self {
            groups: Vec::new(),
            cache: HashMap::new(),
            cache_level: ZoomLevel::BASE,
            data_changed: false,
            apply_on_changed_level: true,
            next_cluster: 0,
        };
        generator.reset_cache();
        generator
    }

    /// Note that the underlying item set changed. Side-effect only; the
    /// rebuild is deferred to the next [`get_clusters`](Self::get_clusters)
    /// call, per the policy carried in `change`.
    pub fn mark_data_changed(&mut self, change: &DataChange) {
        self.data_changed = true;
        self.apply_on_changed_level = change.apply_on_changed_level.unwrap_or(true);
    }

    /// Drop the grouping snapshot and every cached level, reseeding the
    /// base level with an empty sequence.
    pub fn reset_cache(&mut self) {
        self.groups.clear();
        self.cache.clear();
        self.cache_level = ZoomLevel::BASE;
        self.cache.insert(ZoomLevel::BASE, Vec::new());
    }

    /// Rebuild the grouping snapshot from the store: partition items by
    /// group in insertion order, refresh their centers, and sort each group
    /// ascending by center (stable, so equal centers keep insertion order).
    /// Idempotent for a fixed store; clears the dirty flag.
    pub fn rebuild_groups(&mut self, store: &mut ItemStore) {
        store.recompute_centers();

        self.groups.clear();
        let mut slots: HashMap<GroupId, usize> = HashMap::new();
        for entry in store.iter() {
            let group = entry.data().group.clone();
            let slot = match slots.get(&group) {
                Some(&slot) => slot,
                None => {
                    self.groups.push((group.clone(), Vec::new()));
                    slots.insert(group, self.groups.len() - 1);
                    self.groups.len() - 1
                }
            };
            self.groups[slot].1.push(GroupedItem {
                id: entry.data().id,
                center: entry.center(),
            });
        }
        for (_, members) in &mut self.groups {
            members.sort_by(|a, b| a.center.total_cmp(&b.center));
        }

        self.data_changed = false;
        tracing::debug!(
            groups = self.groups.len(),
            items = store.len(),
            "rebuilt grouping snapshot"
        );
    }

    /// Produce (or return the cached) cluster sequence for a continuous
    /// scale factor.
    ///
    /// `scale >= 1` disables clustering outright and returns an empty slice
    /// without touching the cache or the remembered level. Otherwise the
    /// scale derives a discrete level; a cached level is returned unchanged
    /// (the same underlying sequence every time, until invalidated), and a
    /// miss runs the aggregation pass over the group snapshot.
    ///
    /// # Errors
    /// Returns `GrappoloError::Invariant` when the grouping snapshot names
    /// an item that no longer resolves in the store — items were removed
    /// without [`mark_data_changed`](Self::mark_data_changed).
    pub fn get_clusters(
        &mut self,
        store: &mut ItemStore,
        registry: &mut dyn GroupRegistry,
        scale: f64,
        options: &ClusterOptions,
    ) -> Result<&mut [ClusterItem], GrappoloError> {
        let Some(zoom) = ZoomLevel::from_scale(scale) else {
            return Ok(&mut []);
        };

        if self.data_changed {
            let level_changed = zoom.level != self.cache_level;
            let apply_now = if self.apply_on_changed_level {
                level_changed
            } else {
                true
            };
            if apply_now {
                self.reset_cache();
                self.rebuild_groups(store);
            }
        }

        self.cache_level = zoom.level;
        if self.cache.contains_key(&zoom.level) {
            tracing::trace!(level = zoom.level, "cluster cache hit");
        } else {
            let built = self.build_level(store, registry, zoom, options)?;
            tracing::debug!(
                level = zoom.level,
                window_millis = zoom.window_millis,
                clusters = built.len(),
                "built cluster level"
            );
            self.cache.insert(zoom.level, built);
        }

        Ok(self.cache.entry(zoom.level).or_default())
    }

    /// The discrete level of the most recent cluster request.
    #[must_use]
    pub const fn cached_level(&self) -> i64 {
        self.cache_level
    }

    /// One full aggregation pass over every group at the given level.
    fn build_level(
        &mut self,
        store: &mut ItemStore,
        registry: &mut dyn GroupRegistry,
        zoom: ZoomLevel,
        options: &ClusterOptions,
    ) -> Result<Vec<ClusterItem>, GrappoloError> {
        let criteria: &dyn ClusterCriteria = options.criteria.as_deref().unwrap_or(&AllowAll);
        let max_items = if options.max_items == 0 {
            1
        } else {
            options.max_items
        };

        let mut produced: Vec<ClusterItem> = Vec::new();
        for (group_id, members) in &self.groups {
            let mut i = 0;
            while i < members.len() {
                let neighbors = window::count_neighbors(
                    members,
                    i,
                    zoom.window_millis,
                    criteria,
                    store,
                    &produced,
                    group_id,
                )?;
                match window::decide(neighbors, max_items) {
                    MergeOutcome::Standalone => {
                        // A stale claim from a previous level ends here.
                        store.clear_cluster(&members[i].id);
                        i += 1;
                    }
                    MergeOutcome::Merge { take } => {
                        let end = (i + take).min(members.len());
                        let ids: Vec<ItemId> =
                            members[i..end].iter().map(|member| member.id).collect();

                        let id = ClusterId::new(self.next_cluster);
                        self.next_cluster += 1;
                        let cluster = ClusterItem::new(
                            id,
                            &ids,
                            store,
                            group_id.clone(),
                            &options.title_template,
                        )?;

                        registry.register(group_id, cluster.id());
                        for member in cluster.items() {
                            store.set_cluster(member, cluster.id());
                        }
                        produced.push(cluster);
                        i += take;
                    }
                }
            }
        }
        Ok(produced)
    }
}
