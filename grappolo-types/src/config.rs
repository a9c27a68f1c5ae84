//! Configuration types shared between the engine and its hosts.

use serde::{Deserialize, Serialize};

/// Declarative clustering configuration.
///
/// This is the serialisable half of the engine's options; the merge
/// predicate (a closure) is attached at the engine layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Maximum number of visible items a neighborhood may hold before it is
    /// collapsed into a cluster. Zero is coerced to one.
    pub max_items: usize,
    /// Label template for generated clusters; the first `{count}`
    /// placeholder is replaced by the member count.
    pub title_template: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_items: 1,
            title_template: String::new(),
        }
    }
}

/// Options accompanying a data-change notification.
///
/// `apply_on_changed_level` controls when the lazy invalidation actually
/// rebuilds: `true` (the default) defers the rebuild until the zoom level
/// crosses a threshold, `false` forces a rebuild on the next cluster
/// request regardless of level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataChange {
    /// Override for the deferred-invalidation policy; `None` resets it to
    /// the default (`true`).
    pub apply_on_changed_level: Option<bool>,
}

impl DataChange {
    /// A change notification keeping the default deferred policy.
    #[must_use]
    pub const fn deferred() -> Self {
        Self {
            apply_on_changed_level: None,
        }
    }

    /// A change notification forcing a rebuild on the next request.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            apply_on_changed_level: Some(false),
        }
    }
}
