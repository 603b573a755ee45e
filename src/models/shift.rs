//! Shift candidate model.
//!
//! A [`ShiftCandidate`] is a proposed or existing shift presented for
//! validation. It is read-only input: the engine never mutates it.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::timing::TimeRange;

/// A proposed or existing shift assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftCandidate {
    /// Identifier of an already-persisted shift, absent for new proposals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The start time of the shift.
    pub start_time: NaiveDateTime,
    /// The end time of the shift (strictly after the start).
    pub end_time: NaiveDateTime,
    /// Workers assigned to the shift.
    #[serde(default)]
    pub worker_ids: Vec<String>,
    /// The client receiving support, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// The site the shift takes place at, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    /// Free-form shift type tag (e.g. "sleepover", "community_access").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_type: Option<String>,
}

impl ShiftCandidate {
    /// Creates an unassigned-location shift for the given workers.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_compliance::models::ShiftCandidate;
    /// use chrono::NaiveDateTime;
    /// use rust_decimal::Decimal;
    ///
    /// let shift = ShiftCandidate::new(
    ///     NaiveDateTime::parse_from_str("2026-01-15 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     NaiveDateTime::parse_from_str("2026-01-15 17:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     vec!["w_001".to_string()],
    /// );
    /// assert_eq!(shift.hours(), Decimal::new(80, 1)); // 8.0 hours
    /// ```
    pub fn new(start_time: NaiveDateTime, end_time: NaiveDateTime, worker_ids: Vec<String>) -> Self {
        Self {
            id: None,
            start_time,
            end_time,
            worker_ids,
            client_id: None,
            site_id: None,
            shift_type: None,
        }
    }

    /// Sets the client for the shift.
    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the site for the shift.
    pub fn with_site(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    /// Sets the shift type tag.
    pub fn with_shift_type(mut self, shift_type: impl Into<String>) -> Self {
        self.shift_type = Some(shift_type.into());
        self
    }

    /// Sets the persisted shift identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The shift's time range.
    ///
    /// Callers must have checked `end_time > start_time`; the orchestrator
    /// rejects batches that violate it before any range is built.
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Scheduled hours for the shift.
    pub fn hours(&self) -> Decimal {
        self.range().hours()
    }

    /// The calendar date the shift starts on.
    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date()
    }

    /// The weekday the shift starts on.
    pub fn day_of_week(&self) -> Weekday {
        self.start_time.weekday()
    }

    /// Returns true if the worker is assigned to this shift.
    pub fn is_assigned_to(&self, worker_id: &str) -> bool {
        self.worker_ids.iter().any(|id| id == worker_id)
    }

    /// Returns true if the shift type tag matches one of `types`.
    pub fn has_shift_type(&self, types: &[String]) -> bool {
        self.shift_type
            .as_ref()
            .is_some_and(|t| types.iter().any(|candidate| candidate == t))
    }
}
