//! Validation orchestration.
//!
//! Runs every selected rule against a batch and merges the findings into a
//! single, deterministically ordered list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::classifier::classify;
use super::input::{validate_batch, validate_rule_filter};
use crate::error::EngineResult;
use crate::models::{
    RosteringRule, RuleType, Severity, ShiftCandidate, ValidationResult, Violation, ViolationCode,
};
use crate::rules::{
    BillingClassificationConfig, EvaluationContext, EvaluationScope, RuleConfig, classify_shifts,
    evaluator_for,
};

/// Per-call switches for a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Keep medium and low findings. When false only conflicts are returned.
    pub include_warnings: bool,
    /// Evaluate only these rules. `None` means every active rule.
    pub rule_ids: Option<Vec<String>>,
    /// Anchor for fortnightly hour windows.
    pub reference_date: Option<NaiveDate>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            include_warnings: true,
            rule_ids: None,
            reference_date: None,
        }
    }
}

struct Evaluation {
    violations: Vec<Violation>,
    billing: Option<BillingClassificationConfig>,
}

/// Validates a batch of shifts against a set of rules.
///
/// Input problems are returned as errors before any rule runs. Each active
/// rule that passes the id filter is parsed and handed to its evaluator; a
/// rule whose configuration is malformed contributes one configuration-error
/// conflict and the other rules still run. Shift assignments naming a worker
/// with no profile are reported once per shift and worker.
///
/// The result is sorted by first offending shift and then rule id, keeping
/// each rule's own emission order.
///
/// # Example
///
/// ```
/// use roster_compliance::models::{RosteringRule, RuleType, ShiftCandidate, WorkerProfile};
/// use roster_compliance::rules::EvaluationContext;
/// use roster_compliance::validation::{ValidationOptions, validate_shifts};
/// use chrono::NaiveDate;
/// use serde_json::json;
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let shifts = vec![ShiftCandidate::new(
///     date.and_hms_opt(9, 0, 0).unwrap(),
///     date.and_hms_opt(10, 0, 0).unwrap(),
///     vec!["w_001".to_string()],
/// )];
/// let rules = vec![RosteringRule::new("award", "Award hours", RuleType::AwardHours, json!({}))];
/// let context = EvaluationContext::new().with_workers([WorkerProfile::new("w_001")]);
///
/// let violations = validate_shifts(&shifts, &rules, &context, &ValidationOptions::default()).unwrap();
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].rule_id.as_deref(), Some("award"));
/// ```
pub fn validate_shifts(
    shifts: &[ShiftCandidate],
    rules: &[RosteringRule],
    context: &EvaluationContext,
    options: &ValidationOptions,
) -> EngineResult<Vec<Violation>> {
    evaluate(shifts, rules, context, options).map(|evaluation| evaluation.violations)
}

/// Validates a batch and builds the full [`ValidationResult`].
///
/// Billing tags are attached when a billing classification rule was
/// selected and its configuration is valid.
pub fn validate_roster(
    shifts: &[ShiftCandidate],
    rules: &[RosteringRule],
    context: &EvaluationContext,
    options: &ValidationOptions,
) -> EngineResult<ValidationResult> {
    let evaluation = evaluate(shifts, rules, context, options)?;
    let classifications = evaluation
        .billing
        .map(|config| classify_shifts(shifts, &config, &context.holidays))
        .unwrap_or_default();

    Ok(classify(evaluation.violations, shifts.len(), classifications))
}

fn evaluate(
    shifts: &[ShiftCandidate],
    rules: &[RosteringRule],
    context: &EvaluationContext,
    options: &ValidationOptions,
) -> EngineResult<Evaluation> {
    validate_batch(shifts)?;
    let filter = options.rule_ids.as_deref();
    validate_rule_filter(filter, rules)?;

    let scope = EvaluationScope::new(shifts, context).with_reference_date(options.reference_date);
    let mut violations = unknown_workers(shifts, context);
    let mut billing = None;

    for rule in rules.iter().filter(|rule| rule.is_selected(filter)) {
        debug!(rule_id = %rule.id, rule_type = rule.rule_type.code(), "Evaluating rule");

        let outcome = RuleConfig::from_rule(rule).and_then(|config| {
            let found = evaluator_for(rule.rule_type).evaluate(&config, &scope)?;
            Ok((config, found))
        });

        match outcome {
            Ok((config, found)) => {
                if let RuleConfig::BillingClassification(config) = config {
                    billing.get_or_insert(config);
                }
                violations.extend(found.into_iter().map(|v| v.for_rule(rule.id.as_str())));
            }
            Err(err) => {
                warn!(rule_id = %rule.id, error = %err, "Rule configuration is invalid");
                violations.push(Violation::configuration_error(
                    &rule.id,
                    rule.rule_type,
                    err.to_string(),
                ));
            }
        }
    }

    if !options.include_warnings {
        violations.retain(Violation::is_conflict);
    }

    violations.sort_by(|a, b| {
        a.primary_shift()
            .cmp(&b.primary_shift())
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });

    Ok(Evaluation { violations, billing })
}

fn unknown_workers(shifts: &[ShiftCandidate], context: &EvaluationContext) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (index, shift) in shifts.iter().enumerate() {
        for worker_id in shift
            .worker_ids
            .iter()
            .filter(|id| context.worker(id).is_none())
        {
            violations.push(
                Violation::new(
                    RuleType::Qualification,
                    ViolationCode::UnknownWorker,
                    Severity::High,
                    format!("No profile found for worker {}", worker_id),
                )
                .with_shift(index)
                .with_worker(worker_id.as_str())
                .with_client(shift.client_id.as_deref()),
            );
        }
    }
    violations
}
