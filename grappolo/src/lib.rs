//! grappolo
//!
//! Temporal clustering engine for timeline views. Groups nearby items into
//! aggregate clusters per discrete zoom level, caches each level, and keeps
//! the item/cluster lifecycle consistent as the underlying set changes.
//!
//! - `store`: the insertion-ordered raw item set shared with the host.
//! - `cluster`: level derivation, the windowed merge kernel, the aggregate
//!   cluster entity, and the caching generator.
//! - `entity`: the uniform item/cluster view and merge criteria.
//! - `render`: the seams toward the rendering host (conversion, events,
//!   group registration).
//!
//! The engine is single-threaded and synchronous: every operation runs to
//! completion before returning, and the host drives it from one event loop.
//!
//! ```
//! use chrono::DateTime;
//! use grappolo::{ClusterGenerator, ClusterOptions, GroupRoster, ItemStore};
//! use grappolo_types::{DataChange, ItemId, TimelineItem};
//!
//! let mut store = ItemStore::with_items((0..5u64).map(|n| {
//!     TimelineItem::point(
//!         ItemId::new(n),
//!         DateTime::from_timestamp_millis(n as i64 * 10).unwrap(),
//!     )
//! }));
//! let mut roster = GroupRoster::new();
//! let mut generator = ClusterGenerator::new();
//! generator.mark_data_changed(&DataChange::deferred());
//!
//! let clusters = generator
//!     .get_clusters(&mut store, &mut roster, 0.5, &ClusterOptions::default())
//!     .unwrap();
//! assert_eq!(clusters.len(), 1);
//! assert_eq!(clusters[0].count(), 5);
//! ```
#![warn(missing_docs)]

/// The clustering core: levels, kernel, cluster entity, generator.
pub mod cluster;
/// Uniform entity view and merge criteria.
pub mod entity;
/// Unified error type.
pub mod error;
/// Seams toward the rendering host.
pub mod render;
/// The raw item set.
pub mod store;

pub use cluster::generator::{ClusterGenerator, ClusterOptions};
pub use cluster::item::ClusterItem;
pub use cluster::level::ZoomLevel;
pub use entity::{AllowAll, ClusterCriteria, EntityRef};
pub use error::GrappoloError;
pub use render::{EventSink, GroupRegistry, GroupRoster, LinearTimeScale, TimeScale};
pub use store::{ItemEntry, ItemStore};

pub use grappolo_types::{
    ClusterConfig, ClusterId, ClusterSummary, DataChange, FitRequest, GroupId, ItemId,
    TemporalSpan, TimelineItem, VisibleRange,
};
