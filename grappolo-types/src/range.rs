//! Viewport range and fit-request payloads exchanged with the rendering host.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The window of time currently visible in the host viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleRange {
    /// Left edge of the viewport.
    pub start: DateTime<Utc>,
    /// Right edge of the viewport.
    pub end: DateTime<Utc>,
    /// Temporal density of the viewport, used to convert rendered widths
    /// back into time.
    pub millis_per_pixel: f64,
}

impl VisibleRange {
    /// Build a range from its edges and the rendered viewport width.
    #[must_use]
    pub fn from_width(start: DateTime<Utc>, end: DateTime<Utc>, width_px: f64) -> Self {
        let span = (end.timestamp_millis() - start.timestamp_millis()) as f64;
        let millis_per_pixel = if width_px > 0.0 { span / width_px } else { 0.0 };
        Self {
            start,
            end,
            millis_per_pixel,
        }
    }

    /// Left edge in epoch milliseconds.
    #[must_use]
    pub fn start_millis(&self) -> i64 {
        self.start.timestamp_millis()
    }

    /// Right edge in epoch milliseconds.
    #[must_use]
    pub fn end_millis(&self) -> i64 {
        self.end.timestamp_millis()
    }
}

/// Payload of a fit-to-range notification, asking the host to move its
/// viewport onto a span (typically a cluster's absolute bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitRequest {
    /// Target left edge.
    pub start: DateTime<Utc>,
    /// Target right edge.
    pub end: DateTime<Utc>,
    /// Whether the host should animate the transition.
    pub animation: bool,
}
