#![allow(dead_code)]

use chrono::{DateTime, Utc};
use grappolo::{EventSink, ItemStore, TimelineItem};
use grappolo_types::{FitRequest, ItemId};

pub fn t(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).expect("valid timestamp")
}

pub fn point(id: u64, ms: i64, group: &str) -> TimelineItem {
    TimelineItem::point(ItemId::new(id), t(ms)).with_group(group)
}

pub fn range(id: u64, start: i64, end: i64, group: &str) -> TimelineItem {
    TimelineItem::range(ItemId::new(id), t(start), t(end)).with_group(group)
}

pub fn store_of(items: impl IntoIterator<Item = TimelineItem>) -> ItemStore {
    ItemStore::with_items(items)
}

/// Event sink recording every fit request it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub requests: Vec<FitRequest>,
}

impl EventSink for RecordingSink {
    fn fit_to_range(&mut self, request: FitRequest) {
        self.requests.push(request);
    }
}

/// Scale factors with known derived levels, for readable tests.
///
/// `0.5` derives level 8 (window 256 ms); `0.25` derives level 9 (512 ms).
pub const SCALE_L8: f64 = 0.5;
pub const SCALE_L9: f64 = 0.25;
