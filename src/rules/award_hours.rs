//! Award hours evaluation.
//!
//! Checks labour-standard constraints on shift length, daily and fortnightly
//! hour caps, minimum rest between shifts, and double booking. Every finding
//! is a hard conflict.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EvaluationScope, RuleConfig, RuleEvaluator, config_mismatch, fmt_hours, non_negative};
use crate::error::EngineResult;
use crate::models::{RuleType, Severity, Violation, ViolationCode, WorkerProfile};
use crate::timing::{WorkerTimeline, fortnight_window, minutes_to_hours};

/// Thresholds for the award hours rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AwardHoursConfig {
    /// Minimum engagement per shift.
    pub min_shift_hours: Decimal,
    /// Maximum hours one worker may work on one calendar day.
    pub max_daily_hours: Decimal,
    /// Fortnightly cap, overridden by a worker's personal cap.
    pub max_fortnightly_hours: Decimal,
    /// Minimum rest between consecutive shifts.
    pub min_break_hours: Decimal,
}

impl Default for AwardHoursConfig {
    fn default() -> Self {
        Self {
            min_shift_hours: Decimal::new(2, 0),
            max_daily_hours: Decimal::new(10, 0),
            max_fortnightly_hours: Decimal::new(76, 0),
            min_break_hours: Decimal::new(10, 0),
        }
    }
}

impl AwardHoursConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        non_negative("min_shift_hours", self.min_shift_hours)?;
        non_negative("max_daily_hours", self.max_daily_hours)?;
        non_negative("max_fortnightly_hours", self.max_fortnightly_hours)?;
        non_negative("min_break_hours", self.min_break_hours)
    }
}

/// Evaluator for [`RuleType::AwardHours`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AwardHoursEvaluator;

impl RuleEvaluator for AwardHoursEvaluator {
    fn rule_type(&self) -> RuleType {
        RuleType::AwardHours
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        scope: &EvaluationScope<'_>,
    ) -> EngineResult<Vec<Violation>> {
        let RuleConfig::AwardHours(config) = config else {
            return Err(config_mismatch(self.rule_type(), config));
        };

        let mut violations = short_shifts(config, scope);

        for worker in scope.known_workers() {
            let timeline = scope.timeline(worker);
            violations.extend(daily_caps(config, &timeline));
            violations.extend(fortnightly_cap(config, worker, &timeline, scope.reference_date));
            violations.extend(double_bookings(&timeline));
            violations.extend(short_breaks(config, &timeline));
        }

        Ok(violations)
    }
}

fn violation(code: ViolationCode, message: String) -> Violation {
    Violation::new(RuleType::AwardHours, code, Severity::High, message)
}

fn short_shifts(config: &AwardHoursConfig, scope: &EvaluationScope<'_>) -> Vec<Violation> {
    scope
        .shifts
        .iter()
        .enumerate()
        .filter(|(_, shift)| shift.hours() < config.min_shift_hours)
        .map(|(index, shift)| {
            let mut v = violation(
                ViolationCode::ShiftTooShort,
                format!(
                    "Shift is {}h, below the {}h minimum engagement",
                    fmt_hours(shift.hours()),
                    fmt_hours(config.min_shift_hours)
                ),
            )
            .with_shift(index)
            .with_client(shift.client_id.as_deref());
            for worker_id in &shift.worker_ids {
                v = v.with_worker(worker_id.as_str());
            }
            v
        })
        .collect()
}

/// Hours per calendar day, split at midnight, for days touched by a batch shift.
fn daily_caps(config: &AwardHoursConfig, timeline: &WorkerTimeline<'_>) -> Vec<Violation> {
    let mut days: BTreeMap<NaiveDate, (Decimal, Vec<usize>)> = BTreeMap::new();

    for entry in timeline.entries() {
        for segment in entry.range().split_by_day() {
            let day = days.entry(segment.date).or_default();
            day.0 += segment.hours;
            if let Some(index) = entry.batch_index {
                day.1.push(index);
            }
        }
    }

    days.into_iter()
        .filter(|(_, (hours, indices))| !indices.is_empty() && *hours > config.max_daily_hours)
        .map(|(date, (hours, indices))| {
            violation(
                ViolationCode::DailyHoursExceeded,
                format!(
                    "{} is rostered for {}h on {}, above the {}h daily limit",
                    timeline.worker_id(),
                    fmt_hours(hours),
                    date,
                    fmt_hours(config.max_daily_hours)
                ),
            )
            .with_shifts(indices)
            .with_worker(timeline.worker_id())
        })
        .collect()
}

/// At most one finding per worker: the first window, in date order, over the cap.
fn fortnightly_cap(
    config: &AwardHoursConfig,
    worker: &WorkerProfile,
    timeline: &WorkerTimeline<'_>,
    reference_date: Option<NaiveDate>,
) -> Option<Violation> {
    let cap = worker
        .max_fortnightly_hours
        .unwrap_or(config.max_fortnightly_hours);

    let mut anchors: Vec<NaiveDate> = match reference_date {
        Some(date) => vec![date],
        None => timeline
            .batch_entries()
            .map(|e| e.shift.start_date())
            .collect(),
    };
    anchors.sort_unstable();
    anchors.dedup();

    anchors.into_iter().find_map(|anchor| {
        let total = timeline.fortnightly_hours(anchor);
        if total <= cap {
            return None;
        }
        let (from, to) = fortnight_window(anchor);
        let indices = timeline
            .batch_entries()
            .filter(|e| (from..=to).contains(&e.shift.start_date()))
            .filter_map(|e| e.batch_index);

        Some(
            violation(
                ViolationCode::FortnightlyHoursExceeded,
                format!(
                    "{} has {}h rostered in the fortnight {} to {}, above the {}h limit",
                    worker.id,
                    fmt_hours(total),
                    from,
                    to,
                    fmt_hours(cap)
                ),
            )
            .with_shifts(indices)
            .with_worker(worker.id.as_str()),
        )
    })
}

fn double_bookings(timeline: &WorkerTimeline<'_>) -> Vec<Violation> {
    let entries = timeline.entries();
    let mut violations = Vec::new();

    for (i, first) in entries.iter().enumerate() {
        for second in &entries[i + 1..] {
            if second.shift.start_time >= first.shift.end_time {
                break;
            }
            if first.batch_index.is_none() && second.batch_index.is_none() {
                continue;
            }
            let hours = first.range().overlap_hours(&second.range());
            violations.push(
                violation(
                    ViolationCode::OverlappingShifts,
                    format!(
                        "{} is booked on two shifts that overlap by {}h",
                        timeline.worker_id(),
                        fmt_hours(hours)
                    ),
                )
                .with_shifts(first.batch_index.into_iter().chain(second.batch_index))
                .with_worker(timeline.worker_id()),
            );
        }
    }

    violations
}

fn short_breaks(config: &AwardHoursConfig, timeline: &WorkerTimeline<'_>) -> Vec<Violation> {
    timeline
        .adjacent_pairs()
        .filter_map(|(earlier, later)| {
            let gap = earlier.range().gap_minutes(&later.range())?;
            (minutes_to_hours(gap) < config.min_break_hours).then(|| {
                violation(
                    ViolationCode::InsufficientBreak,
                    format!(
                        "{} has a {}h break between shifts, below the {}h minimum",
                        timeline.worker_id(),
                        fmt_hours(minutes_to_hours(gap)),
                        fmt_hours(config.min_break_hours)
                    ),
                )
                .with_shifts(earlier.batch_index.into_iter().chain(later.batch_index))
                .with_worker(timeline.worker_id())
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShiftCandidate;
    use crate::rules::EvaluationContext;
    use chrono::{Duration, NaiveDateTime};
    use std::str::FromStr;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn shift(start: (&str, &str), end: (&str, &str), worker: &str) -> ShiftCandidate {
        ShiftCandidate::new(
            make_datetime(start.0, start.1),
            make_datetime(end.0, end.1),
            vec![worker.to_string()],
        )
    }

    fn context_with(workers: &[&str]) -> EvaluationContext {
        EvaluationContext::new().with_workers(workers.iter().map(|w| WorkerProfile::new(*w)))
    }

    fn evaluate(shifts: &[ShiftCandidate], context: &EvaluationContext) -> Vec<Violation> {
        evaluate_with(AwardHoursConfig::default(), shifts, context)
    }

    fn evaluate_with(
        config: AwardHoursConfig,
        shifts: &[ShiftCandidate],
        context: &EvaluationContext,
    ) -> Vec<Violation> {
        let scope = EvaluationScope::new(shifts, context);
        AwardHoursEvaluator
            .evaluate(&RuleConfig::AwardHours(config), &scope)
            .unwrap()
    }

    fn codes(violations: &[Violation]) -> Vec<ViolationCode> {
        violations.iter().map(|v| v.code).collect()
    }

    // ==========================================================================
    // Minimum engagement
    // ==========================================================================

    #[test]
    fn test_shift_of_one_and_a_half_hours_is_one_violation() {
        let context = context_with(&["w1"]);
        let shifts = vec![shift(
            ("2026-01-15", "09:00:00"),
            ("2026-01-15", "10:30:00"),
            "w1",
        )];

        let violations = evaluate(&shifts, &context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ViolationCode::ShiftTooShort);
        assert_eq!(violations[0].severity, Severity::High);
        assert_eq!(violations[0].shift_indices, vec![0]);
        assert!(violations[0].message.contains("1.5h"));
    }

    #[test]
    fn test_shift_exactly_at_minimum_is_fine() {
        let context = context_with(&["w1"]);
        let shifts = vec![shift(
            ("2026-01-15", "09:00:00"),
            ("2026-01-15", "11:00:00"),
            "w1",
        )];
        assert!(evaluate(&shifts, &context).is_empty());
    }

    #[test]
    fn test_short_shift_reported_even_for_unknown_worker() {
        let context = EvaluationContext::new();
        let shifts = vec![shift(
            ("2026-01-15", "09:00:00"),
            ("2026-01-15", "10:00:00"),
            "ghost",
        )];
        assert_eq!(codes(&evaluate(&shifts, &context)), vec![ViolationCode::ShiftTooShort]);
    }

    // ==========================================================================
    // Daily cap
    // ==========================================================================

    #[test]
    fn test_eleven_hour_day_exceeds_daily_cap() {
        let context = context_with(&["w1"]);
        let shifts = vec![shift(
            ("2026-01-15", "07:00:00"),
            ("2026-01-15", "18:00:00"),
            "w1",
        )];

        let violations = evaluate(&shifts, &context);
        assert_eq!(codes(&violations), vec![ViolationCode::DailyHoursExceeded]);
        assert!(violations[0].message.contains("11h"));
    }

    #[test]
    fn test_overnight_shift_split_at_midnight_for_daily_cap() {
        // 18:00 to 06:00 is 12h but only 6h on each calendar day.
        let context = context_with(&["w1"]);
        let shifts = vec![shift(
            ("2026-01-15", "18:00:00"),
            ("2026-01-16", "06:00:00"),
            "w1",
        )];
        assert!(evaluate(&shifts, &context).is_empty());
    }

    #[test]
    fn test_daily_cap_counts_history() {
        let mut worker = WorkerProfile::new("w1");
        worker.history.push(shift(
            ("2026-01-15", "06:00:00"),
            ("2026-01-15", "09:00:00"),
            "w1",
        ));
        let context = EvaluationContext::new().with_workers([worker]);
        let config = AwardHoursConfig {
            min_break_hours: Decimal::ZERO,
            ..AwardHoursConfig::default()
        };
        let shifts = vec![shift(
            ("2026-01-15", "10:00:00"),
            ("2026-01-15", "18:00:00"),
            "w1",
        )];

        let violations = evaluate_with(config, &shifts, &context);
        assert_eq!(codes(&violations), vec![ViolationCode::DailyHoursExceeded]);
        assert_eq!(violations[0].shift_indices, vec![0]);
    }

    // ==========================================================================
    // Fortnightly cap
    // ==========================================================================

    fn ten_eight_hour_shifts(worker: &str) -> Vec<ShiftCandidate> {
        let first = make_date("2026-01-07");
        (0..10)
            .map(|i| {
                let day = first + Duration::days(i);
                ShiftCandidate::new(
                    day.and_hms_opt(8, 0, 0).unwrap(),
                    day.and_hms_opt(16, 0, 0).unwrap(),
                    vec![worker.to_string()],
                )
            })
            .collect()
    }

    #[test]
    fn test_eighty_hours_exceeds_default_fortnightly_cap_once() {
        let context = context_with(&["w1"]);
        let shifts = ten_eight_hour_shifts("w1");

        let violations = evaluate(&shifts, &context);
        assert_eq!(codes(&violations), vec![ViolationCode::FortnightlyHoursExceeded]);
        assert!(violations[0].message.contains("80h"));
        assert_eq!(violations[0].shift_indices, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_worker_cap_overrides_rule_cap() {
        let mut worker = WorkerProfile::new("w1");
        worker.max_fortnightly_hours = Some(dec("90"));
        let context = EvaluationContext::new().with_workers([worker]);
        assert!(evaluate(&ten_eight_hour_shifts("w1"), &context).is_empty());
    }

    #[test]
    fn test_reference_date_limits_fortnightly_window() {
        let context = context_with(&["w1"]);
        let shifts = ten_eight_hour_shifts("w1");
        // The window ending 2026-01-10 holds only four of the shifts.
        let scope = EvaluationScope::new(&shifts, &context)
            .with_reference_date(Some(make_date("2026-01-10")));
        let violations = AwardHoursEvaluator
            .evaluate(&RuleConfig::AwardHours(AwardHoursConfig::default()), &scope)
            .unwrap();
        assert!(violations.is_empty());
    }

    // ==========================================================================
    // Breaks and double booking
    // ==========================================================================

    #[test]
    fn test_quick_turnaround_is_insufficient_break() {
        let context = context_with(&["w1"]);
        let shifts = vec![
            shift(("2026-01-15", "14:00:00"), ("2026-01-15", "22:00:00"), "w1"),
            shift(("2026-01-16", "06:00:00"), ("2026-01-16", "14:00:00"), "w1"),
        ];

        let violations = evaluate(&shifts, &context);
        assert_eq!(codes(&violations), vec![ViolationCode::InsufficientBreak]);
        assert_eq!(violations[0].shift_indices, vec![0, 1]);
        assert!(violations[0].message.contains("8h break"));
    }

    #[test]
    fn test_break_against_history_shift() {
        let mut worker = WorkerProfile::new("w1");
        worker.history.push(shift(
            ("2026-01-14", "14:00:00"),
            ("2026-01-14", "23:00:00"),
            "w1",
        ));
        let context = EvaluationContext::new().with_workers([worker]);
        let shifts = vec![shift(
            ("2026-01-15", "07:00:00"),
            ("2026-01-15", "15:00:00"),
            "w1",
        )];

        let violations = evaluate(&shifts, &context);
        assert_eq!(codes(&violations), vec![ViolationCode::InsufficientBreak]);
        assert_eq!(violations[0].shift_indices, vec![0]);
    }

    #[test]
    fn test_break_is_measured_after_the_longest_earlier_shift() {
        let context = context_with(&["w1"]);
        let config = AwardHoursConfig {
            min_shift_hours: dec("1"),
            max_daily_hours: dec("24"),
            ..AwardHoursConfig::default()
        };
        let shifts = vec![
            shift(("2026-01-15", "08:00:00"), ("2026-01-15", "20:00:00"), "w1"),
            shift(("2026-01-15", "09:00:00"), ("2026-01-15", "10:00:00"), "w1"),
            shift(("2026-01-15", "21:00:00"), ("2026-01-15", "23:00:00"), "w1"),
        ];

        let violations = evaluate_with(config, &shifts, &context);
        assert_eq!(
            codes(&violations),
            vec![ViolationCode::OverlappingShifts, ViolationCode::InsufficientBreak]
        );
        assert_eq!(violations[1].shift_indices, vec![0, 2]);
        assert!(violations[1].message.contains("1h break"));
    }

    #[test]
    fn test_huge_break_threshold_flags_every_gap() {
        let context = context_with(&["w1"]);
        let config = AwardHoursConfig {
            min_break_hours: Decimal::MAX,
            ..AwardHoursConfig::default()
        };
        let shifts = vec![
            shift(("2026-01-15", "06:00:00"), ("2026-01-15", "09:00:00"), "w1"),
            shift(("2026-01-20", "06:00:00"), ("2026-01-20", "09:00:00"), "w1"),
        ];

        let violations = evaluate_with(config, &shifts, &context);
        assert_eq!(codes(&violations), vec![ViolationCode::InsufficientBreak]);
    }

    #[test]
    fn test_overlapping_shifts_are_double_booking() {
        let context = context_with(&["w1"]);
        let config = AwardHoursConfig {
            max_daily_hours: dec("24"),
            ..AwardHoursConfig::default()
        };
        let shifts = vec![
            shift(("2026-01-15", "09:00:00"), ("2026-01-15", "17:00:00"), "w1"),
            shift(("2026-01-15", "16:00:00"), ("2026-01-15", "20:00:00"), "w1"),
        ];

        let violations = evaluate_with(config, &shifts, &context);
        assert_eq!(codes(&violations), vec![ViolationCode::OverlappingShifts]);
        assert!(violations[0].message.contains("1h"));
    }

    #[test]
    fn test_different_workers_do_not_interact() {
        let context = context_with(&["w1", "w2"]);
        let shifts = vec![
            shift(("2026-01-15", "09:00:00"), ("2026-01-15", "17:00:00"), "w1"),
            shift(("2026-01-15", "09:00:00"), ("2026-01-15", "17:00:00"), "w2"),
        ];
        assert!(evaluate(&shifts, &context).is_empty());
    }

    #[test]
    fn test_negative_threshold_fails_validation() {
        let config = AwardHoursConfig {
            min_break_hours: dec("-1"),
            ..AwardHoursConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
