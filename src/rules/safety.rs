//! Work health and safety evaluation.
//!
//! Covers fatigue (hours inside any rolling 24-hour window), lone-worker
//! staffing on high-risk shifts, runs of consecutive working days, and the
//! travel buffer between distant back-to-back shifts.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EvaluationScope, RuleConfig, RuleEvaluator, config_mismatch, fmt_hours, non_negative};
use crate::error::EngineResult;
use crate::models::{RuleType, Severity, Violation, ViolationCode};
use crate::timing::{TimeRange, WorkerTimeline};

/// Thresholds for the safety rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SafetyConfig {
    /// Maximum scheduled hours inside any rolling 24-hour window.
    pub max_hours_per_24h: Decimal,
    /// Minimum workers on a high-risk shift.
    pub high_risk_min_workers: u32,
    /// Shift type tags that make a shift high risk.
    pub high_risk_shift_types: Vec<String>,
    /// Maximum run of consecutive working days.
    pub max_consecutive_days: u32,
    /// Distance above which two shift locations count as distant.
    pub distant_site_km: f64,
    /// Minimum gap between distant consecutive shifts.
    pub min_travel_buffer_minutes: i64,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            max_hours_per_24h: Decimal::new(14, 0),
            high_risk_min_workers: 2,
            high_risk_shift_types: Vec::new(),
            max_consecutive_days: 7,
            distant_site_km: 5.0,
            min_travel_buffer_minutes: 30,
        }
    }
}

impl SafetyConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        non_negative("max_hours_per_24h", self.max_hours_per_24h)?;
        non_negative("distant_site_km", self.distant_site_km)?;
        non_negative("min_travel_buffer_minutes", self.min_travel_buffer_minutes)
    }
}

/// Evaluator for [`RuleType::Safety`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyEvaluator;

impl RuleEvaluator for SafetyEvaluator {
    fn rule_type(&self) -> RuleType {
        RuleType::Safety
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        scope: &EvaluationScope<'_>,
    ) -> EngineResult<Vec<Violation>> {
        let RuleConfig::Safety(config) = config else {
            return Err(config_mismatch(self.rule_type(), config));
        };

        let mut violations = understaffed_high_risk(config, scope);

        for worker in scope.known_workers() {
            let timeline = scope.timeline(worker);
            violations.extend(fatigue(config, &timeline));
            violations.extend(consecutive_days(config, &timeline));
            violations.extend(travel_buffers(config, &timeline, scope));
        }

        Ok(violations)
    }
}

/// The busiest 24-hour window touching a batch shift, if it breaches the cap.
///
/// The hours inside a sliding window only peak when the window starts at a
/// shift start or ends at a shift end, so those are the only candidates.
fn fatigue(config: &SafetyConfig, timeline: &WorkerTimeline<'_>) -> Option<Violation> {
    let day = Duration::hours(24);
    let entries = timeline.entries();

    let candidates = entries
        .iter()
        .flat_map(|e| [Some(e.shift.start_time), e.shift.end_time.checked_sub_signed(day)])
        .flatten();

    let mut worst: Option<(Decimal, TimeRange)> = None;
    for start in candidates {
        let Some(end) = start.checked_add_signed(day) else {
            continue;
        };
        let window = TimeRange { start, end };
        if !timeline.batch_entries().any(|e| e.range().overlaps(&window)) {
            continue;
        }
        let hours: Decimal = entries
            .iter()
            .map(|e| e.range().overlap_hours(&window))
            .sum();
        if worst.is_none_or(|(max, _)| hours > max) {
            worst = Some((hours, window));
        }
    }

    let (hours, window) = worst.filter(|(hours, _)| *hours > config.max_hours_per_24h)?;
    let indices = timeline
        .batch_entries()
        .filter(|e| e.range().overlaps(&window))
        .filter_map(|e| e.batch_index);

    Some(
        Violation::new(
            RuleType::Safety,
            ViolationCode::FatigueLimitExceeded,
            Severity::High,
            format!(
                "{} has {}h scheduled within 24 hours of {}, above the {}h fatigue limit",
                timeline.worker_id(),
                fmt_hours(hours),
                window.start,
                fmt_hours(config.max_hours_per_24h)
            ),
        )
        .with_shifts(indices)
        .with_worker(timeline.worker_id()),
    )
}

fn understaffed_high_risk(config: &SafetyConfig, scope: &EvaluationScope<'_>) -> Vec<Violation> {
    scope
        .shifts
        .iter()
        .enumerate()
        .filter_map(|(index, shift)| {
            let client_high_risk = scope.context.client_for(shift).is_some_and(|c| c.high_risk);
            if !client_high_risk && !shift.has_shift_type(&config.high_risk_shift_types) {
                return None;
            }

            let staffed = shift.worker_ids.iter().collect::<BTreeSet<_>>().len();
            if staffed >= config.high_risk_min_workers as usize {
                return None;
            }

            let mut v = Violation::new(
                RuleType::Safety,
                ViolationCode::LoneWorkerHighRisk,
                Severity::High,
                format!(
                    "High-risk shift has {} worker(s), at least {} required",
                    staffed, config.high_risk_min_workers
                ),
            )
            .with_shift(index)
            .with_client(shift.client_id.as_deref());
            for worker_id in &shift.worker_ids {
                v = v.with_worker(worker_id.as_str());
            }
            Some(v)
        })
        .collect()
}

/// One finding per run of consecutive start dates that is too long and
/// includes a batch shift.
fn consecutive_days(config: &SafetyConfig, timeline: &WorkerTimeline<'_>) -> Vec<Violation> {
    let dates: BTreeSet<NaiveDate> = timeline
        .entries()
        .iter()
        .map(|e| e.shift.start_date())
        .collect();

    let mut runs: Vec<(NaiveDate, NaiveDate)> = Vec::new();
    for date in dates {
        match runs.last_mut() {
            Some((_, end)) if end.succ_opt() == Some(date) => *end = date,
            _ => runs.push((date, date)),
        }
    }

    runs.into_iter()
        .filter(|(first, last)| (*last - *first).num_days() + 1 > i64::from(config.max_consecutive_days))
        .filter_map(|(first, last)| {
            let indices: Vec<usize> = timeline
                .batch_entries()
                .filter(|e| (first..=last).contains(&e.shift.start_date()))
                .filter_map(|e| e.batch_index)
                .collect();
            if indices.is_empty() {
                return None;
            }
            Some(
                Violation::new(
                    RuleType::Safety,
                    ViolationCode::ConsecutiveDaysExceeded,
                    Severity::Medium,
                    format!(
                        "{} works {} consecutive days ({} to {}), above the limit of {}",
                        timeline.worker_id(),
                        (last - first).num_days() + 1,
                        first,
                        last,
                        config.max_consecutive_days
                    ),
                )
                .with_shifts(indices)
                .with_worker(timeline.worker_id()),
            )
        })
        .collect()
}

fn travel_buffers(
    config: &SafetyConfig,
    timeline: &WorkerTimeline<'_>,
    scope: &EvaluationScope<'_>,
) -> Vec<Violation> {
    timeline
        .adjacent_pairs()
        .filter_map(|(earlier, later)| {
            let gap = earlier.range().gap_minutes(&later.range())?;
            if gap >= config.min_travel_buffer_minutes {
                return None;
            }
            let from = scope.context.shift_location(earlier.shift)?;
            let to = scope.context.shift_location(later.shift)?;
            let km = from.distance_km(&to);
            if km <= config.distant_site_km {
                return None;
            }
            Some(
                Violation::new(
                    RuleType::Safety,
                    ViolationCode::InsufficientTravelTime,
                    Severity::Medium,
                    format!(
                        "{} has {} minutes to travel {:.1}km between shifts, at least {} minutes required",
                        timeline.worker_id(),
                        gap,
                        km,
                        config.min_travel_buffer_minutes
                    ),
                )
                .with_shifts(earlier.batch_index.into_iter().chain(later.batch_index))
                .with_worker(timeline.worker_id()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClientProfile, GeoPoint, ShiftCandidate, Site, WorkerProfile};
    use crate::rules::EvaluationContext;
    use chrono::NaiveDateTime;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn shift(start: (&str, &str), end: (&str, &str), workers: &[&str]) -> ShiftCandidate {
        ShiftCandidate::new(
            make_datetime(start.0, start.1),
            make_datetime(end.0, end.1),
            workers.iter().map(|w| w.to_string()).collect(),
        )
    }

    fn context_with(workers: &[&str]) -> EvaluationContext {
        EvaluationContext::new().with_workers(workers.iter().map(|w| WorkerProfile::new(*w)))
    }

    fn evaluate_with(
        config: SafetyConfig,
        shifts: &[ShiftCandidate],
        context: &EvaluationContext,
    ) -> Vec<Violation> {
        let scope = EvaluationScope::new(shifts, context);
        SafetyEvaluator
            .evaluate(&RuleConfig::Safety(config), &scope)
            .unwrap()
    }

    fn evaluate(shifts: &[ShiftCandidate], context: &EvaluationContext) -> Vec<Violation> {
        evaluate_with(SafetyConfig::default(), shifts, context)
    }

    // ==========================================================================
    // Fatigue
    // ==========================================================================

    #[test]
    fn test_fifteen_hours_in_rolling_window_is_fatigue() {
        // 8h evening then 7h the next morning: 15h inside 24h across midnight.
        let context = context_with(&["w1"]);
        let shifts = vec![
            shift(("2026-01-15", "14:00:00"), ("2026-01-15", "22:00:00"), &["w1"]),
            shift(("2026-01-16", "06:00:00"), ("2026-01-16", "13:00:00"), &["w1"]),
        ];

        let violations = evaluate(&shifts, &context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ViolationCode::FatigueLimitExceeded);
        assert_eq!(violations[0].severity, Severity::High);
        assert_eq!(violations[0].shift_indices, vec![0, 1]);
        assert!(violations[0].message.contains("15h"));
    }

    #[test]
    fn test_fourteen_hours_is_at_limit() {
        let context = context_with(&["w1"]);
        let shifts = vec![
            shift(("2026-01-15", "14:00:00"), ("2026-01-15", "22:00:00"), &["w1"]),
            shift(("2026-01-16", "06:00:00"), ("2026-01-16", "12:00:00"), &["w1"]),
        ];
        assert!(evaluate(&shifts, &context).is_empty());
    }

    #[test]
    fn test_fatigue_counts_history_once_per_worker() {
        let mut worker = WorkerProfile::new("w1");
        worker.history.push(shift(
            ("2026-01-15", "00:00:00"),
            ("2026-01-15", "08:00:00"),
            &["w1"],
        ));
        let context = EvaluationContext::new().with_workers([worker]);
        let shifts = vec![
            shift(("2026-01-15", "09:00:00"), ("2026-01-15", "13:00:00"), &["w1"]),
            shift(("2026-01-15", "14:00:00"), ("2026-01-15", "18:00:00"), &["w1"]),
        ];

        let violations = evaluate(&shifts, &context);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("16h"));
    }

    #[test]
    fn test_history_alone_never_triggers_fatigue() {
        let mut worker = WorkerProfile::new("w1");
        worker.history.push(shift(
            ("2026-01-10", "00:00:00"),
            ("2026-01-10", "20:00:00"),
            &["w1"],
        ));
        let context = EvaluationContext::new().with_workers([worker]);
        let shifts = vec![shift(
            ("2026-01-15", "09:00:00"),
            ("2026-01-15", "13:00:00"),
            &["w1"],
        )];
        assert!(evaluate(&shifts, &context).is_empty());
    }

    // ==========================================================================
    // High-risk staffing
    // ==========================================================================

    #[test]
    fn test_high_risk_client_needs_two_workers() {
        let mut client = ClientProfile::new("c1");
        client.high_risk = true;
        let context = context_with(&["w1", "w2"]).with_clients([client]);
        let shifts = vec![
            shift(("2026-01-15", "09:00:00"), ("2026-01-15", "13:00:00"), &["w1"]).with_client("c1"),
            shift(("2026-01-16", "09:00:00"), ("2026-01-16", "13:00:00"), &["w1", "w2"])
                .with_client("c1"),
        ];

        let violations = evaluate(&shifts, &context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ViolationCode::LoneWorkerHighRisk);
        assert_eq!(violations[0].shift_indices, vec![0]);
        assert_eq!(violations[0].client_id.as_deref(), Some("c1"));
    }

    #[test]
    fn test_high_risk_shift_type() {
        let context = context_with(&["w1"]);
        let config = SafetyConfig {
            high_risk_shift_types: vec!["community_access".to_string()],
            ..SafetyConfig::default()
        };
        let shifts = vec![
            shift(("2026-01-15", "09:00:00"), ("2026-01-15", "13:00:00"), &["w1"])
                .with_shift_type("community_access"),
        ];

        let violations = evaluate_with(config, &shifts, &context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ViolationCode::LoneWorkerHighRisk);
    }

    // ==========================================================================
    // Consecutive days
    // ==========================================================================

    #[test]
    fn test_eight_consecutive_days_is_medium_warning() {
        let context = context_with(&["w1"]);
        let shifts: Vec<ShiftCandidate> = (10..18)
            .map(|day| {
                let date = format!("2026-01-{}", day);
                shift((date.as_str(), "09:00:00"), (date.as_str(), "13:00:00"), &["w1"])
            })
            .collect();

        let violations = evaluate(&shifts, &context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ViolationCode::ConsecutiveDaysExceeded);
        assert_eq!(violations[0].severity, Severity::Medium);
        assert_eq!(violations[0].shift_indices.len(), 8);
    }

    #[test]
    fn test_seven_days_with_gap_is_fine() {
        let context = context_with(&["w1"]);
        let shifts: Vec<ShiftCandidate> = [10, 11, 12, 13, 15, 16, 17, 18]
            .iter()
            .map(|day| {
                let date = format!("2026-01-{}", day);
                shift((date.as_str(), "09:00:00"), (date.as_str(), "13:00:00"), &["w1"])
            })
            .collect();
        assert!(evaluate(&shifts, &context).is_empty());
    }

    // ==========================================================================
    // Travel buffer
    // ==========================================================================

    fn travel_context() -> EvaluationContext {
        context_with(&["w1"]).with_sites([
            Site {
                id: "cbd".to_string(),
                name: "City".to_string(),
                location: GeoPoint::new(-37.8136, 144.9631),
            },
            Site {
                id: "dandenong".to_string(),
                name: "Dandenong".to_string(),
                location: GeoPoint::new(-37.9875, 145.2149),
            },
            Site {
                id: "cbd_annex".to_string(),
                name: "City annex".to_string(),
                location: GeoPoint::new(-37.8140, 144.9640),
            },
        ])
    }

    #[test]
    fn test_back_to_back_distant_shifts_need_travel_time() {
        let context = travel_context();
        let shifts = vec![
            shift(("2026-01-15", "08:00:00"), ("2026-01-15", "12:00:00"), &["w1"]).with_site("cbd"),
            shift(("2026-01-15", "12:15:00"), ("2026-01-15", "16:00:00"), &["w1"])
                .with_site("dandenong"),
        ];

        let violations = evaluate(&shifts, &context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ViolationCode::InsufficientTravelTime);
        assert_eq!(violations[0].severity, Severity::Medium);
        assert!(violations[0].message.contains("15 minutes"));
    }

    #[test]
    fn test_travel_buffer_runs_from_the_longest_earlier_shift() {
        let context = travel_context();
        let shifts = vec![
            shift(("2026-01-15", "08:00:00"), ("2026-01-15", "16:00:00"), &["w1"]).with_site("cbd"),
            shift(("2026-01-15", "09:00:00"), ("2026-01-15", "10:00:00"), &["w1"]).with_site("cbd"),
            shift(("2026-01-15", "16:10:00"), ("2026-01-15", "18:00:00"), &["w1"])
                .with_site("dandenong"),
        ];

        let violations = evaluate(&shifts, &context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ViolationCode::InsufficientTravelTime);
        assert_eq!(violations[0].shift_indices, vec![0, 2]);
        assert!(violations[0].message.contains("10 minutes"));
    }

    #[test]
    fn test_nearby_sites_need_no_buffer() {
        let context = travel_context();
        let shifts = vec![
            shift(("2026-01-15", "08:00:00"), ("2026-01-15", "12:00:00"), &["w1"]).with_site("cbd"),
            shift(("2026-01-15", "12:00:00"), ("2026-01-15", "16:00:00"), &["w1"])
                .with_site("cbd_annex"),
        ];
        assert!(evaluate(&shifts, &context).is_empty());
    }

    #[test]
    fn test_missing_location_skips_travel_check() {
        let context = travel_context();
        let shifts = vec![
            shift(("2026-01-15", "08:00:00"), ("2026-01-15", "12:00:00"), &["w1"]).with_site("cbd"),
            shift(("2026-01-15", "12:05:00"), ("2026-01-15", "16:00:00"), &["w1"]),
        ];
        assert!(evaluate(&shifts, &context).is_empty());
    }
}
