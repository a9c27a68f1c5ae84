//! Raw timeline items and the identifiers shared across crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Typed identifier for a raw timeline item.
///
/// Items are supplied by the host application; the engine never mints these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Construct a new typed item identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "item:{}", self.0)
    }
}

/// Typed identifier for a cluster produced by the engine.
///
/// Minted by a `ClusterGenerator`; unique within one generator instance and
/// stable across cache hits for the same level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterId(pub u64);

impl ClusterId {
    /// Construct a new typed cluster identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "cluster:{}", self.0)
    }
}

/// Logical group an item belongs to. The empty string is the ungrouped bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl GroupId {
    /// Construct a group id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The bucket items without an explicit group land in.
    #[must_use]
    pub const fn ungrouped() -> Self {
        Self(String::new())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the ungrouped bucket.
    #[must_use]
    pub fn is_ungrouped(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl core::fmt::Display for GroupId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_ungrouped() {
            f.write_str("(ungrouped)")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Shared span capability implemented by raw items and clusters alike.
///
/// The merge kernel reads temporal positions exclusively through this trait,
/// so items and already-built clusters can be scanned uniformly.
pub trait TemporalSpan {
    /// Start of the span.
    fn span_start(&self) -> DateTime<Utc>;

    /// End of the span; `None` for point entities.
    fn span_end(&self) -> Option<DateTime<Utc>>;

    /// Temporal center in milliseconds since the Unix epoch: the midpoint of
    /// `[start, end]` for ranged entities, else the start itself.
    fn center_millis(&self) -> f64 {
        let start = self.span_start().timestamp_millis() as f64;
        self.span_end()
            .map_or(start, |end| (start + end.timestamp_millis() as f64) / 2.0)
    }

    /// Absolute `(min, max)` bounds of the span in epoch milliseconds.
    fn bounds_millis(&self) -> (i64, i64) {
        let start = self.span_start().timestamp_millis();
        let end = self
            .span_end()
            .map_or(start, |end| end.timestamp_millis());
        (start.min(end), start.max(end))
    }
}

/// A raw item on the timeline, supplied and owned by the host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    /// Host-assigned identifier.
    pub id: ItemId,
    /// Start of the item.
    pub start: DateTime<Utc>,
    /// End of the item; `None` for point items (box/dot equivalents).
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    /// Logical group; defaults to the ungrouped bucket.
    #[serde(default)]
    pub group: GroupId,
    /// Display payload carried through untouched; clustering criteria may
    /// gate on it.
    #[serde(default)]
    pub content: String,
}

impl TimelineItem {
    /// Construct a point item.
    #[must_use]
    pub fn point(id: ItemId, start: DateTime<Utc>) -> Self {
        Self {
            id,
            start,
            end: None,
            group: GroupId::ungrouped(),
            content: String::new(),
        }
    }

    /// Construct a ranged item.
    #[must_use]
    pub fn range(id: ItemId, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id,
            start,
            end: Some(end),
            group: GroupId::ungrouped(),
            content: String::new(),
        }
    }

    /// Assign a group, consuming and returning the item.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<GroupId>) -> Self {
        self.group = group.into();
        self
    }

    /// Assign display content, consuming and returning the item.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// True when the item covers a range rather than a single instant.
    #[must_use]
    pub const fn is_range(&self) -> bool {
        self.end.is_some()
    }
}

impl From<String> for GroupId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl TemporalSpan for TimelineItem {
    fn span_start(&self) -> DateTime<Utc> {
        self.start
    }

    fn span_end(&self) -> Option<DateTime<Utc>> {
        self.end
    }
}
