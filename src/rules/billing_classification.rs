//! Billing classification.
//!
//! Derives a billing tag for each shift from its start time. Precedence is
//! holiday, then weekend, then evening, then standard. The rule never produces
//! violations; the tags travel with the validation result as metadata.

use chrono::{Datelike, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::{EvaluationScope, RuleConfig, RuleEvaluator, config_mismatch};
use crate::error::EngineResult;
use crate::models::{BillingTag, HolidayCalendar, RuleType, ShiftCandidate, ShiftClassification, Violation};

/// Time-of-day boundaries for evening billing.
///
/// Times are written as `HH:MM` (or `HH:MM:SS`). A shift starting at or after
/// `evening_start`, or before `early_morning_end`, bills at the evening rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BillingClassificationConfig {
    /// Start of the evening band.
    pub evening_start: String,
    /// End of the overnight band.
    pub early_morning_end: String,
}

impl Default for BillingClassificationConfig {
    fn default() -> Self {
        Self {
            evening_start: "20:00".to_string(),
            early_morning_end: "06:00".to_string(),
        }
    }
}

impl BillingClassificationConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        self.boundaries().map(|_| ())
    }

    fn boundaries(&self) -> Result<(NaiveTime, NaiveTime), String> {
        Ok((
            parse_time("evening_start", &self.evening_start)?,
            parse_time("early_morning_end", &self.early_morning_end)?,
        ))
    }
}

fn parse_time(field: &str, value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| format!("{field} must be a time of day like 20:00, got {value:?}"))
}

/// Classifies one shift.
///
/// Configuration that fails to parse falls back to the default boundaries;
/// rule configs are validated before they reach here.
///
/// # Example
///
/// ```
/// use roster_compliance::models::{BillingTag, HolidayCalendar, ShiftCandidate};
/// use roster_compliance::rules::{BillingClassificationConfig, classify_shift};
/// use chrono::NaiveDate;
///
/// // 2026-01-17 is a Saturday
/// let date = NaiveDate::from_ymd_opt(2026, 1, 17).unwrap();
/// let shift = ShiftCandidate::new(
///     date.and_hms_opt(21, 0, 0).unwrap(),
///     date.and_hms_opt(23, 0, 0).unwrap(),
///     vec!["w_001".to_string()],
/// );
///
/// let classification = classify_shift(
///     &shift,
///     0,
///     &BillingClassificationConfig::default(),
///     &HolidayCalendar::default(),
/// );
/// assert_eq!(classification.tag, BillingTag::Weekend);
/// ```
pub fn classify_shift(
    shift: &ShiftCandidate,
    index: usize,
    config: &BillingClassificationConfig,
    holidays: &HolidayCalendar,
) -> ShiftClassification {
    let evening_band = config
        .boundaries()
        .or_else(|_| BillingClassificationConfig::default().boundaries())
        .ok();

    let date = shift.start_date();
    if let Some(holiday) = holidays.holiday_on(date) {
        return ShiftClassification {
            shift_index: index,
            tag: BillingTag::Holiday,
            holiday_name: Some(holiday.name.clone()),
        };
    }

    let start = shift.start_time.time();
    let tag = if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        BillingTag::Weekend
    } else if evening_band.is_some_and(|(evening_start, early_morning_end)| {
        start >= evening_start || start < early_morning_end
    }) {
        BillingTag::Evening
    } else {
        BillingTag::Standard
    };

    ShiftClassification {
        shift_index: index,
        tag,
        holiday_name: None,
    }
}

/// Classifies every shift in the batch, in input order.
pub fn classify_shifts(
    shifts: &[ShiftCandidate],
    config: &BillingClassificationConfig,
    holidays: &HolidayCalendar,
) -> Vec<ShiftClassification> {
    shifts
        .iter()
        .enumerate()
        .map(|(index, shift)| classify_shift(shift, index, config, holidays))
        .collect()
}

/// Evaluator for [`RuleType::BillingClassification`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BillingClassificationEvaluator;

impl RuleEvaluator for BillingClassificationEvaluator {
    fn rule_type(&self) -> RuleType {
        RuleType::BillingClassification
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        _scope: &EvaluationScope<'_>,
    ) -> EngineResult<Vec<Violation>> {
        match config {
            RuleConfig::BillingClassification(_) => Ok(Vec::new()),
            other => Err(config_mismatch(self.rule_type(), other)),
        }
    }
}
