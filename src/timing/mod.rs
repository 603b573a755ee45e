//! Time arithmetic shared by the evaluators.
//!
//! This module provides the half-open [`TimeRange`] used for every overlap,
//! gap and day-boundary calculation, the rolling fortnightly hours
//! aggregator, and the per-worker timeline that merges batch shifts with
//! rostered history.

mod interval;
mod timeline;
mod worker_hours;

pub use interval::{DaySegment, TimeRange, minutes_to_hours};
pub use timeline::{TimelineEntry, WorkerTimeline, workers_in_batch};
pub use worker_hours::{
    FORTNIGHT_DAYS, HoursInfo, fortnight_window, fortnightly_hours, hours_in_window, hours_info,
    today,
};
