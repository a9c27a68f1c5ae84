//! Seams toward the rendering host.
//!
//! The engine never touches a screen; it consumes these collaborators only
//! as call contracts. `LinearTimeScale` and `GroupRoster` are concrete
//! implementations for tests and simple hosts.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use grappolo_types::{ClusterId, FitRequest, GroupId};

/// Conversion pair between timestamps and screen coordinates.
pub trait TimeScale {
    /// Map a timestamp to a horizontal pixel position.
    fn to_screen(&self, when: DateTime<Utc>) -> f64;
    /// Map a horizontal pixel position back to a timestamp.
    fn to_time(&self, px: f64) -> DateTime<Utc>;
}

/// Linear conversion anchored at an origin timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTimeScale {
    /// Timestamp rendered at pixel zero.
    pub origin: DateTime<Utc>,
    /// Temporal density of the viewport.
    pub millis_per_pixel: f64,
}

impl LinearTimeScale {
    /// Build a linear scale from its origin and density.
    #[must_use]
    pub const fn new(origin: DateTime<Utc>, millis_per_pixel: f64) -> Self {
        Self {
            origin,
            millis_per_pixel,
        }
    }
}

impl TimeScale for LinearTimeScale {
    fn to_screen(&self, when: DateTime<Utc>) -> f64 {
        let offset = (when - self.origin).num_milliseconds() as f64;
        if self.millis_per_pixel > 0.0 {
            offset / self.millis_per_pixel
        } else {
            0.0
        }
    }

    fn to_time(&self, px: f64) -> DateTime<Utc> {
        self.origin + Duration::milliseconds((px * self.millis_per_pixel) as i64)
    }
}

/// Sink for notifications the engine raises toward the host UI.
pub trait EventSink {
    /// Ask the host to move its viewport onto the given span.
    fn fit_to_range(&mut self, request: FitRequest);
}

/// Group lookup/registration capability of the host.
///
/// The aggregation pass registers every new cluster with its group; a
/// cluster detaching from its parent unregisters itself.
pub trait GroupRegistry {
    /// Record a cluster as belonging to a group.
    fn register(&mut self, group: &GroupId, cluster: ClusterId);
    /// Remove a cluster from a group.
    fn unregister(&mut self, group: &GroupId, cluster: ClusterId);
}

/// Plain bookkeeping implementation of [`GroupRegistry`].
#[derive(Debug, Clone, Default)]
pub struct GroupRoster {
    clusters: HashMap<GroupId, Vec<ClusterId>>,
}

impl GroupRoster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clusters currently registered under a group, in registration order.
    #[must_use]
    pub fn clusters_in(&self, group: &GroupId) -> &[ClusterId] {
        self.clusters.get(group).map_or(&[], Vec::as_slice)
    }
}

impl GroupRegistry for GroupRoster {
    fn register(&mut self, group: &GroupId, cluster: ClusterId) {
        self.clusters.entry(group.clone()).or_default().push(cluster);
    }

    fn unregister(&mut self, group: &GroupId, cluster: ClusterId) {
        if let Some(registered) = self.clusters.get_mut(group) {
            registered.retain(|&id| id != cluster);
        }
    }
}
