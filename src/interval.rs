use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A bounded time interval. Both endpoints are inclusive for conflict checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeInterval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Two intervals conflict unless one starts strictly after the other ends.
    /// Identical starts always conflict, whatever the stated ends.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        if self.start == other.start {
            return true;
        }
        !(self.start > other.end || other.start > self.end)
    }

    /// True if the interval's time-of-day lies within `[from, to]`.
    pub fn within_hours(&self, from: NaiveTime, to: NaiveTime) -> bool {
        self.start.time() >= from && self.end.time() <= to
    }
}
