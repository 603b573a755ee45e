//! Per-worker view over batch and history shifts.
//!
//! Most checks reason about "this worker's shifts in time order", mixing the
//! proposed batch with shifts already rostered. [`WorkerTimeline`] builds that
//! view once, remembering which entries came from the batch so violations can
//! point back at batch indices.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{TimeRange, hours_in_window};
use crate::models::ShiftCandidate;

/// One shift on a worker's timeline.
#[derive(Debug, Clone, Copy)]
pub struct TimelineEntry<'a> {
    /// The shift itself.
    pub shift: &'a ShiftCandidate,
    /// Position in the submitted batch, `None` for history.
    pub batch_index: Option<usize>,
}

impl TimelineEntry<'_> {
    /// The shift's time range.
    pub fn range(&self) -> TimeRange {
        self.shift.range()
    }
}

/// A worker's shifts in chronological order.
#[derive(Debug, Clone)]
pub struct WorkerTimeline<'a> {
    worker_id: &'a str,
    entries: Vec<TimelineEntry<'a>>,
}

impl<'a> WorkerTimeline<'a> {
    /// Builds the timeline for `worker_id` from the batch and the worker's history.
    ///
    /// History shifts that carry the same id as a batch shift are dropped: the
    /// batch is re-validating that shift. History entries are taken as the
    /// worker's own without checking their assignment list.
    pub fn build(
        worker_id: &'a str,
        batch: &'a [ShiftCandidate],
        history: &'a [ShiftCandidate],
    ) -> Self {
        let mut entries: Vec<TimelineEntry<'a>> = batch
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_assigned_to(worker_id))
            .map(|(index, shift)| TimelineEntry {
                shift,
                batch_index: Some(index),
            })
            .collect();

        let batch_ids: Vec<&str> = entries
            .iter()
            .filter_map(|e| e.shift.id.as_deref())
            .collect();

        entries.extend(
            history
                .iter()
                .filter(|h| h.end_time > h.start_time)
                .filter(|h| h.id.as_deref().is_none_or(|id| !batch_ids.contains(&id)))
                .map(|shift| TimelineEntry {
                    shift,
                    batch_index: None,
                }),
        );

        entries.sort_by_key(|e| {
            (
                e.shift.start_time,
                e.shift.end_time,
                e.batch_index.is_none(),
                e.batch_index,
            )
        });

        Self { worker_id, entries }
    }

    /// The worker this timeline belongs to.
    pub fn worker_id(&self) -> &'a str {
        self.worker_id
    }

    /// All entries in chronological order.
    pub fn entries(&self) -> &[TimelineEntry<'a>] {
        &self.entries
    }

    /// Entries that came from the submitted batch.
    pub fn batch_entries(&self) -> impl Iterator<Item = &TimelineEntry<'a>> {
        self.entries.iter().filter(|e| e.batch_index.is_some())
    }

    /// Each entry paired with the earlier-starting entry that ends latest,
    /// keeping pairs where at least one side is from the batch.
    ///
    /// The rest before a shift runs from the latest end among the shifts
    /// started before it, so a short shift nested inside a long one never
    /// hides the gap after the long one. Overlapping pairs are included.
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (&TimelineEntry<'a>, &TimelineEntry<'a>)> {
        let mut entries = self.entries.iter();
        let first = entries.next();
        entries
            .scan(first, |latest, entry| {
                let previous = (*latest)?;
                if entry.shift.end_time > previous.shift.end_time {
                    *latest = Some(entry);
                }
                Some((previous, entry))
            })
            .filter(|(a, b)| a.batch_index.is_some() || b.batch_index.is_some())
    }

    /// Hours whose shift starts inside the fortnight ending on `reference_date`.
    pub fn fortnightly_hours(&self, reference_date: NaiveDate) -> Decimal {
        hours_in_window(self.entries.iter().map(|e| e.shift), reference_date)
    }
}

/// Worker ids in the order they first appear in the batch.
pub fn workers_in_batch(shifts: &[ShiftCandidate]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for worker_id in shifts.iter().flat_map(|s| s.worker_ids.iter()) {
        if !seen.contains(&worker_id.as_str()) {
            seen.push(worker_id);
        }
    }
    seen
}
