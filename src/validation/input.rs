//! Request-level input checks.
//!
//! Malformed batches and rule filters are rejected with an [`EngineError`]
//! before any rule runs. Nothing in here produces violations.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDateTime, Timelike};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{RosteringRule, ShiftCandidate};

/// Calendar years a shift may start and end in.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1..=9999;

/// Checks the shift batch.
///
/// The batch must be non-empty and every shift must end after it starts and
/// name at least one worker, with no blank or repeated worker ids. Start and
/// end are whole minutes within [`SUPPORTED_YEARS`].
///
/// # Example
///
/// ```
/// use roster_compliance::error::EngineError;
/// use roster_compliance::validation::validate_batch;
///
/// assert!(matches!(validate_batch(&[]), Err(EngineError::EmptyShiftBatch)));
/// ```
pub fn validate_batch(shifts: &[ShiftCandidate]) -> EngineResult<()> {
    if shifts.is_empty() {
        return Err(EngineError::EmptyShiftBatch);
    }

    for (index, shift) in shifts.iter().enumerate() {
        let invalid = |message: &str| EngineError::InvalidShift {
            index,
            message: message.to_string(),
        };

        if shift.end_time <= shift.start_time {
            return Err(invalid("end time must be after start time"));
        }
        if !in_supported_years(shift.start_time) || !in_supported_years(shift.end_time) {
            return Err(invalid("shift dates must fall between years 1 and 9999"));
        }
        if !on_the_minute(shift.start_time) || !on_the_minute(shift.end_time) {
            return Err(invalid("start and end times must be whole minutes"));
        }
        if shift.worker_ids.is_empty() {
            return Err(invalid("at least one worker must be assigned"));
        }
        if shift.worker_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(invalid("worker ids must not be blank"));
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = shift.worker_ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(EngineError::InvalidShift {
                index,
                message: format!("worker {} is assigned more than once", duplicate),
            });
        }
    }

    Ok(())
}

fn in_supported_years(instant: NaiveDateTime) -> bool {
    SUPPORTED_YEARS.contains(&instant.year())
}

fn on_the_minute(instant: NaiveDateTime) -> bool {
    instant.second() == 0 && instant.nanosecond() == 0
}

/// Checks an explicit rule-id filter against the organisation's rules.
///
/// Blank or repeated entries are rejected. Ids that match no rule are
/// ignored with a warning.
pub fn validate_rule_filter(rule_ids: Option<&[String]>, rules: &[RosteringRule]) -> EngineResult<()> {
    let Some(rule_ids) = rule_ids else {
        return Ok(());
    };

    let mut seen = HashSet::new();
    for rule_id in rule_ids {
        if rule_id.trim().is_empty() {
            return Err(EngineError::InvalidRuleFilter {
                message: "rule ids must not be blank".to_string(),
            });
        }
        if !seen.insert(rule_id.as_str()) {
            return Err(EngineError::InvalidRuleFilter {
                message: format!("rule id {} is listed more than once", rule_id),
            });
        }
        if !rules.iter().any(|rule| &rule.id == rule_id) {
            warn!(rule_id = %rule_id, "Ignoring unknown rule id in filter");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleType;
    use chrono::{Duration, NaiveDate};
    use serde_json::json;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn shift(start: &str, end: &str, workers: &[&str]) -> ShiftCandidate {
        ShiftCandidate::new(
            make_datetime("2026-01-15", start),
            make_datetime("2026-01-15", end),
            workers.iter().map(|w| w.to_string()).collect(),
        )
    }

    fn expect_invalid_shift(shifts: &[ShiftCandidate]) -> (usize, String) {
        match validate_batch(shifts) {
            Err(EngineError::InvalidShift { index, message }) => (index, message),
            other => panic!("expected InvalidShift, got {:?}", other),
        }
    }

    #[test]
    fn test_well_formed_batch_passes() {
        let shifts = vec![
            shift("09:00:00", "17:00:00", &["w1"]),
            shift("18:00:00", "22:00:00", &["w1", "w2"]),
        ];
        assert!(validate_batch(&shifts).is_ok());
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        assert!(matches!(validate_batch(&[]), Err(EngineError::EmptyShiftBatch)));
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let shifts = vec![
            shift("09:00:00", "17:00:00", &["w1"]),
            shift("17:00:00", "09:00:00", &["w1"]),
        ];
        let (index, message) = expect_invalid_shift(&shifts);
        assert_eq!(index, 1);
        assert!(message.contains("end time"));
    }

    #[test]
    fn test_zero_length_shift_is_rejected() {
        let (index, _) = expect_invalid_shift(&[shift("09:00:00", "09:00:00", &["w1"])]);
        assert_eq!(index, 0);
    }

    #[test]
    fn test_dates_outside_supported_years_are_rejected() {
        let start = NaiveDate::MAX.and_hms_opt(9, 0, 0).unwrap();
        let far_future = ShiftCandidate::new(start, start + Duration::hours(3), vec!["w1".to_string()]);
        let (index, message) = expect_invalid_shift(&[far_future]);
        assert_eq!(index, 0);
        assert!(message.contains("years"));

        let start = NaiveDate::from_ymd_opt(-5, 6, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let far_past = ShiftCandidate::new(start, start + Duration::hours(3), vec!["w1".to_string()]);
        let (_, message) = expect_invalid_shift(&[far_past]);
        assert!(message.contains("years"));
    }

    #[test]
    fn test_sub_minute_times_are_rejected() {
        let (index, message) = expect_invalid_shift(&[
            shift("09:00:00", "17:00:00", &["w1"]),
            shift("09:00:00", "09:00:30", &["w1"]),
        ]);
        assert_eq!(index, 1);
        assert!(message.contains("whole minutes"));
    }

    #[test]
    fn test_missing_blank_and_duplicate_workers_are_rejected() {
        let (_, message) = expect_invalid_shift(&[shift("09:00:00", "17:00:00", &[])]);
        assert!(message.contains("at least one worker"));

        let (_, message) = expect_invalid_shift(&[shift("09:00:00", "17:00:00", &["w1", " "])]);
        assert!(message.contains("blank"));

        let (_, message) = expect_invalid_shift(&[shift("09:00:00", "17:00:00", &["w1", "w1"])]);
        assert!(message.contains("w1"));
    }

    #[test]
    fn test_rule_filter_checks() {
        let rules = vec![RosteringRule::new("r1", "Award", RuleType::AwardHours, json!({}))];

        assert!(validate_rule_filter(None, &rules).is_ok());
        assert!(validate_rule_filter(Some(&["r1".to_string()]), &rules).is_ok());
        // Unknown ids are only logged
        assert!(validate_rule_filter(Some(&["nope".to_string()]), &rules).is_ok());

        assert!(matches!(
            validate_rule_filter(Some(&["".to_string()]), &rules),
            Err(EngineError::InvalidRuleFilter { .. })
        ));
        assert!(matches!(
            validate_rule_filter(Some(&["r1".to_string(), "r1".to_string()]), &rules),
            Err(EngineError::InvalidRuleFilter { .. })
        ));
    }
}
