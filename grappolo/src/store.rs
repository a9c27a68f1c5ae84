//! The raw item set shared between the host and the clustering engine.

use std::collections::HashMap;

use grappolo_types::{ClusterId, ItemId, TemporalSpan, TimelineItem};

/// One raw item together with the engine-maintained derivations: the cached
/// temporal center and the cluster back-reference.
///
/// The back-reference is a foreign key, not an owning pointer; it is mutated
/// only by `attach`/`detach` and the aggregation pass.
#[derive(Debug, Clone)]
pub struct ItemEntry {
    data: TimelineItem,
    center: f64,
    cluster: Option<ClusterId>,
}

impl ItemEntry {
    fn new(data: TimelineItem) -> Self {
        let center = data.center_millis();
        Self {
            data,
            center,
            cluster: None,
        }
    }

    /// The raw item.
    #[must_use]
    pub fn data(&self) -> &TimelineItem {
        &self.data
    }

    /// Cached temporal center in epoch milliseconds.
    #[must_use]
    pub const fn center(&self) -> f64 {
        self.center
    }

    /// The cluster currently claiming this item, if any.
    #[must_use]
    pub const fn cluster(&self) -> Option<ClusterId> {
        self.cluster
    }
}

/// Insertion-ordered collection of raw timeline items.
///
/// Owned by the host; the engine borrows it mutably only for the operations
/// that may touch back-references. Iteration order is insertion order, which
/// is what makes group iteration — and therefore cluster output —
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    entries: Vec<ItemEntry>,
    index: HashMap<ItemId, usize>,
}

impl ItemStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated from an iterator of items.
    pub fn with_items(items: impl IntoIterator<Item = TimelineItem>) -> Self {
        let mut store = Self::new();
        for item in items {
            store.insert(item);
        }
        store
    }

    /// Insert or replace an item.
    ///
    /// Replacing keeps the item's insertion position and resets the
    /// cluster back-reference; the previous item is returned. The caller is
    /// responsible for notifying the generator via `mark_data_changed`.
    pub fn insert(&mut self, item: TimelineItem) -> Option<TimelineItem> {
        if let Some(&slot) = self.index.get(&item.id) {
            let old = std::mem::replace(&mut self.entries[slot], ItemEntry::new(item));
            return Some(old.data);
        }
        self.index.insert(item.id, self.entries.len());
        self.entries.push(ItemEntry::new(item));
        None
    }

    /// Remove an item, returning it if present. O(n): later entries shift
    /// down to preserve insertion order.
    pub fn remove(&mut self, id: &ItemId) -> Option<TimelineItem> {
        let slot = self.index.remove(id)?;
        let entry = self.entries.remove(slot);
        for moved in &self.entries[slot..] {
            if let Some(pos) = self.index.get_mut(&moved.data.id) {
                *pos -= 1;
            }
        }
        Some(entry.data)
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&ItemEntry> {
        self.index.get(id).map(|&slot| &self.entries[slot])
    }

    /// The cluster currently claiming an item, if any.
    #[must_use]
    pub fn cluster_of(&self, id: &ItemId) -> Option<ClusterId> {
        self.get(id).and_then(ItemEntry::cluster)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the store holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemEntry> {
        self.entries.iter()
    }

    /// Recompute every cached center from the current item data.
    /// Idempotent for a fixed item set.
    pub(crate) fn recompute_centers(&mut self) {
        for entry in &mut self.entries {
            entry.center = entry.data.center_millis();
        }
    }

    /// Point an item's back-reference at a cluster. Returns `false` when the
    /// item is not in the store.
    pub(crate) fn set_cluster(&mut self, id: &ItemId, cluster: ClusterId) -> bool {
        match self.index.get(id) {
            Some(&slot) => {
                self.entries[slot].cluster = Some(cluster);
                true
            }
            None => false,
        }
    }

    /// Clear an item's back-reference. No-op when the item is absent.
    pub(crate) fn clear_cluster(&mut self, id: &ItemId) {
        if let Some(&slot) = self.index.get(id) {
            self.entries[slot].cluster = None;
        }
    }
}
