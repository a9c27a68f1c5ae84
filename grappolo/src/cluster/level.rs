//! Discrete zoom level derivation.
//!
//! A continuous scale factor (pixels per millisecond) maps to a discrete
//! level indexing the cluster cache. Each level doubles the aggregation
//! window, so the practical zoom range produces a bounded number of cache
//! entries.

/// Base of the exponential window growth: one level out doubles the window.
const GRANULARITY: f64 = 2.0;

/// Numerator of the scale-to-level mapping; shifts the whole level ladder
/// so the smallest reachable window stays comfortably above one pixel.
const SCALE_REFERENCE: f64 = 100.0;

/// A discrete zoom tier and its aggregation window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLevel {
    /// Discrete tier indexing the cluster cache.
    pub level: i64,
    /// Aggregation radius for this tier, in milliseconds.
    pub window_millis: f64,
}

impl ZoomLevel {
    /// The sentinel tier used when clustering is inert (degenerate scale).
    pub const BASE: i64 = -1;

    /// The inert tier: no window, nothing aggregates.
    #[must_use]
    pub const fn base() -> Self {
        Self {
            level: Self::BASE,
            window_millis: 0.0,
        }
    }

    /// Derive the tier for a continuous scale factor.
    ///
    /// Returns `None` for `scale >= 1` (fully zoomed in — clustering is
    /// disabled outright). A degenerate `scale <= 0` maps to the base tier.
    #[must_use]
    pub fn from_scale(scale: f64) -> Option<Self> {
        if scale >= 1.0 {
            return None;
        }
        if scale <= 0.0 {
            return Some(Self::base());
        }
        let level = (SCALE_REFERENCE / scale)
            .log(GRANULARITY)
            .round()
            .abs() as i64;
        let window_millis = GRANULARITY.powi(level as i32).abs();
        Some(Self {
            level,
            window_millis,
        })
    }
}
