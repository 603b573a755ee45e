//! Rolling fortnightly hour aggregation.
//!
//! The aggregator is shared by compliance evaluation (award hours) and the
//! read-only hours display, so it is pure and never rounds until
//! [`hours_info`] prepares values for presentation.

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{ShiftCandidate, WorkerProfile};

/// Days in the fortnightly window, including the reference date.
pub const FORTNIGHT_DAYS: u64 = 14;

/// The inclusive date window `[reference - 13 days, reference]`.
///
/// The start saturates at the earliest representable date.
pub fn fortnight_window(reference_date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from = reference_date
        .checked_sub_days(Days::new(FORTNIGHT_DAYS - 1))
        .unwrap_or(NaiveDate::MIN);
    (from, reference_date)
}

/// Today's date, the default anchor for the window.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Sums the hours of the given shifts whose start date falls inside the window.
///
/// Unlike [`fortnightly_hours`] no worker filter is applied; callers pass an
/// already-filtered collection.
pub fn hours_in_window<'a, I>(shifts: I, reference_date: NaiveDate) -> Decimal
where
    I: IntoIterator<Item = &'a ShiftCandidate>,
{
    let (from, to) = fortnight_window(reference_date);
    shifts
        .into_iter()
        .filter(|s| {
            let date = s.start_date();
            from <= date && date <= to
        })
        .map(ShiftCandidate::hours)
        .sum()
}

/// Scheduled hours for `worker_id` in the fortnight ending on `reference_date`.
///
/// The window defaults to the fortnight ending today. The result is not rounded.
///
/// # Example
///
/// ```
/// use roster_compliance::models::ShiftCandidate;
/// use roster_compliance::timing::fortnightly_hours;
/// use chrono::{NaiveDate, NaiveDateTime};
/// use rust_decimal::Decimal;
///
/// let dt = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let shifts = vec![
///     ShiftCandidate::new(dt("2026-01-12 09:00:00"), dt("2026-01-12 17:00:00"), vec!["w1".into()]),
///     ShiftCandidate::new(dt("2026-01-13 09:00:00"), dt("2026-01-13 13:30:00"), vec!["w1".into()]),
///     ShiftCandidate::new(dt("2026-01-13 09:00:00"), dt("2026-01-13 17:00:00"), vec!["w2".into()]),
/// ];
///
/// let reference = NaiveDate::from_ymd_opt(2026, 1, 20);
/// assert_eq!(fortnightly_hours(&shifts, "w1", reference), Decimal::new(125, 1));
/// ```
pub fn fortnightly_hours(
    shifts: &[ShiftCandidate],
    worker_id: &str,
    reference_date: Option<NaiveDate>,
) -> Decimal {
    let reference_date = reference_date.unwrap_or_else(today);
    hours_in_window(
        shifts.iter().filter(|s| s.is_assigned_to(worker_id)),
        reference_date,
    )
}

/// Presentation-ready view of a worker's fortnightly load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursInfo {
    /// Total hours, rounded to one decimal place.
    pub total_hours: Decimal,
    /// The worker's personal cap, if any.
    pub max_hours: Option<Decimal>,
    /// True if the total exceeds the cap; false when no cap is set.
    pub exceeds: bool,
    /// Total as a whole-number percentage of the cap; zero when no cap is set.
    pub percentage: Decimal,
}

/// Summarises `worker`'s fortnightly hours against their personal cap.
///
/// # Example
///
/// ```
/// use roster_compliance::models::{ShiftCandidate, WorkerProfile};
/// use roster_compliance::timing::hours_info;
/// use chrono::{Duration, NaiveDate};
/// use rust_decimal::Decimal;
///
/// let mut worker = WorkerProfile::new("w1");
/// worker.max_fortnightly_hours = Some(Decimal::new(76, 0));
///
/// let first = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
/// let shifts: Vec<ShiftCandidate> = (0..10)
///     .map(|i| {
///         let day = first + Duration::days(i);
///         ShiftCandidate::new(
///             day.and_hms_opt(8, 0, 0).unwrap(),
///             day.and_hms_opt(16, 0, 0).unwrap(),
///             vec!["w1".to_string()],
///         )
///     })
///     .collect();
///
/// let info = hours_info(&shifts, &worker, NaiveDate::from_ymd_opt(2026, 1, 20));
/// assert_eq!(info.total_hours, Decimal::new(80, 0));
/// assert!(info.exceeds);
/// assert_eq!(info.percentage, Decimal::new(105, 0));
/// ```
pub fn hours_info(
    shifts: &[ShiftCandidate],
    worker: &WorkerProfile,
    reference_date: Option<NaiveDate>,
) -> HoursInfo {
    let total = fortnightly_hours(shifts, &worker.id, reference_date);
    let total_hours = total.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    let max_hours = worker.max_fortnightly_hours;

    let (exceeds, percentage) = match max_hours {
        Some(max) if max > Decimal::ZERO => (
            total_hours > max,
            total_hours
                .checked_div(max)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .unwrap_or(Decimal::MAX)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        ),
        Some(max) => (total_hours > max, Decimal::ZERO),
        None => (false, Decimal::ZERO),
    };

    HoursInfo {
        total_hours,
        max_hours,
        exceeds,
        percentage,
    }
}
