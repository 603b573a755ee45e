//! Time-range arithmetic shared by every evaluator.
//!
//! All overlap, gap and day-boundary reasoning goes through [`TimeRange`], a
//! half-open interval `[start, end)`. Keeping a single abstraction means the
//! boundary instants (touching ranges, midnight) are handled identically
//! everywhere.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A half-open time interval `[start, end)`.
///
/// # Example
///
/// ```
/// use roster_compliance::timing::TimeRange;
/// use chrono::NaiveDateTime;
///
/// let dt = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let morning = TimeRange::new(dt("2026-01-15 07:00:00"), dt("2026-01-15 15:00:00")).unwrap();
/// let evening = TimeRange::new(dt("2026-01-15 15:00:00"), dt("2026-01-15 23:00:00")).unwrap();
///
/// // Touching ranges do not overlap.
/// assert!(!morning.overlaps(&evening));
/// assert_eq!(morning.gap_minutes(&evening), Some(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start instant.
    pub start: NaiveDateTime,
    /// Exclusive end instant.
    pub end: NaiveDateTime,
}

/// The portion of a [`TimeRange`] that falls on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySegment {
    /// The calendar day this segment belongs to.
    pub date: NaiveDate,
    /// The part of the range inside that day.
    pub range: TimeRange,
    /// Hours covered by the segment.
    pub hours: Decimal,
}

impl TimeRange {
    /// Creates a range, returning `None` unless the end is strictly after the start.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    /// Duration of the range in whole minutes.
    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Duration of the range in hours.
    pub fn hours(&self) -> Decimal {
        minutes_to_hours(self.minutes())
    }

    /// True iff the two half-open ranges share at least one instant.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True if `instant` lies inside the range.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Minutes between the earlier range's end and the later range's start.
    ///
    /// Returns `None` when the ranges overlap, since no gap exists.
    pub fn gap_minutes(&self, other: &TimeRange) -> Option<i64> {
        if self.overlaps(other) {
            return None;
        }
        let (earlier, later) = if self.start <= other.start {
            (self, other)
        } else {
            (other, self)
        };
        Some((later.start - earlier.end).num_minutes())
    }

    /// Hours shared by the two ranges, zero when disjoint.
    pub fn overlap_hours(&self, other: &TimeRange) -> Decimal {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if end <= start {
            return Decimal::ZERO;
        }
        minutes_to_hours((end - start).num_minutes())
    }

    /// Splits the range at midnight boundaries.
    ///
    /// Segments are returned chronologically; their hours sum to [`hours`](Self::hours).
    pub fn split_by_day(&self) -> Vec<DaySegment> {
        let mut segments = Vec::new();
        let mut current = self.start;

        while current < self.end {
            let next_midnight = current
                .date()
                .succ_opt()
                .and_then(|day| day.and_hms_opt(0, 0, 0))
                .unwrap_or(self.end);
            let segment_end = next_midnight.min(self.end);

            let range = TimeRange {
                start: current,
                end: segment_end,
            };
            let hours = range.hours();
            if hours > Decimal::ZERO {
                segments.push(DaySegment {
                    date: current.date(),
                    range,
                    hours,
                });
            }

            current = segment_end;
        }

        segments
    }

    /// Calendar days touched by the range (the end instant itself is excluded).
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.split_by_day().into_iter().map(|s| s.date).collect()
    }
}

/// Converts whole minutes to fractional hours.
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    Decimal::new(minutes, 0) / Decimal::new(60, 0)
}
