//! Organisational policy evaluation.
//!
//! Policies an organisation sets for itself rather than ones imposed by an
//! award or a client: honouring declared availability, conflict-of-interest
//! pairings, keeping the workload balanced across the team and keeping
//! shifts within each worker's travel radius.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::{EvaluationScope, RuleConfig, RuleEvaluator, config_mismatch, fmt_hours, non_negative};
use crate::error::EngineResult;
use crate::models::{RuleType, Severity, ShiftCandidate, Violation, ViolationCode, WorkerProfile};

/// A worker who must not be rostered with a particular client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConflictOfInterest {
    /// The worker.
    pub worker_id: String,
    /// The client.
    pub client_id: String,
    /// Why the pairing is declared, shown in the violation message.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Settings for the organisational policy rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrganizationalPolicyConfig {
    /// Flag shifts outside a worker's declared availability.
    pub enforce_availability: bool,
    /// Declared conflict-of-interest pairings.
    pub conflict_of_interest: Vec<ConflictOfInterest>,
    /// How far, in percent, a worker's batch load may stray from the team mean.
    pub max_load_deviation_percent: Decimal,
    /// Flag shifts beyond a worker's travel radius.
    pub enforce_proximity: bool,
    /// Radius for workers who have not set their own.
    pub default_radius_km: Option<f64>,
}

impl Default for OrganizationalPolicyConfig {
    fn default() -> Self {
        Self {
            enforce_availability: true,
            conflict_of_interest: Vec::new(),
            max_load_deviation_percent: Decimal::new(50, 0),
            enforce_proximity: true,
            default_radius_km: None,
        }
    }
}

impl OrganizationalPolicyConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        non_negative("max_load_deviation_percent", self.max_load_deviation_percent)?;
        if let Some(radius) = self.default_radius_km {
            non_negative("default_radius_km", radius)?;
        }
        Ok(())
    }

    fn conflict_between(&self, worker_id: &str, client_id: &str) -> Option<&ConflictOfInterest> {
        self.conflict_of_interest
            .iter()
            .find(|c| c.worker_id == worker_id && c.client_id == client_id)
    }
}

/// Evaluator for [`RuleType::OrganizationalPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganizationalPolicyEvaluator;

impl RuleEvaluator for OrganizationalPolicyEvaluator {
    fn rule_type(&self) -> RuleType {
        RuleType::OrganizationalPolicy
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        scope: &EvaluationScope<'_>,
    ) -> EngineResult<Vec<Violation>> {
        let RuleConfig::OrganizationalPolicy(config) = config else {
            return Err(config_mismatch(self.rule_type(), config));
        };

        let mut violations = Vec::new();

        for (index, shift) in scope.shifts.iter().enumerate() {
            for worker in scope.assigned_workers(shift) {
                if config.enforce_availability {
                    violations.extend(availability(index, shift, worker));
                }
                violations.extend(conflict_of_interest(config, index, shift, worker));
                if config.enforce_proximity {
                    violations.extend(proximity(config, index, shift, worker, scope));
                }
            }
        }

        violations.extend(load_imbalance(config, scope));

        Ok(violations)
    }
}

fn violation(
    code: ViolationCode,
    severity: Severity,
    message: String,
    index: usize,
    shift: &ShiftCandidate,
    worker: &WorkerProfile,
) -> Violation {
    Violation::new(RuleType::OrganizationalPolicy, code, severity, message)
        .with_shift(index)
        .with_worker(worker.id.as_str())
        .with_client(shift.client_id.as_deref())
}

fn availability(index: usize, shift: &ShiftCandidate, worker: &WorkerProfile) -> Option<Violation> {
    if worker.is_available_for(&shift.range()) {
        return None;
    }
    Some(violation(
        ViolationCode::OutsideAvailability,
        Severity::High,
        format!(
            "{} is not available from {} to {}",
            worker.id, shift.start_time, shift.end_time
        ),
        index,
        shift,
        worker,
    ))
}

fn conflict_of_interest(
    config: &OrganizationalPolicyConfig,
    index: usize,
    shift: &ShiftCandidate,
    worker: &WorkerProfile,
) -> Option<Violation> {
    let client_id = shift.client_id.as_deref()?;
    let conflict = config.conflict_between(&worker.id, client_id)?;
    let message = match &conflict.reason {
        Some(reason) => format!(
            "{} has a declared conflict of interest with {}: {}",
            worker.id, client_id, reason
        ),
        None => format!(
            "{} has a declared conflict of interest with {}",
            worker.id, client_id
        ),
    };
    Some(violation(
        ViolationCode::ConflictOfInterest,
        Severity::High,
        message,
        index,
        shift,
        worker,
    ))
}

fn proximity(
    config: &OrganizationalPolicyConfig,
    index: usize,
    shift: &ShiftCandidate,
    worker: &WorkerProfile,
    scope: &EvaluationScope<'_>,
) -> Option<Violation> {
    let radius = worker.max_travel_km.or(config.default_radius_km)?;
    let home = worker.home_location?;
    let site = scope.context.shift_location(shift)?;
    let km = home.distance_km(&site);
    if km <= radius {
        return None;
    }
    Some(violation(
        ViolationCode::OutsideTravelRadius,
        Severity::Medium,
        format!(
            "Shift is {:.1}km from {}'s home, beyond their {}km radius",
            km, worker.id, radius
        ),
        index,
        shift,
        worker,
    ))
}

/// Batch hours per worker compared with the team mean; needs two or more workers.
fn load_imbalance(config: &OrganizationalPolicyConfig, scope: &EvaluationScope<'_>) -> Vec<Violation> {
    let workers = scope.known_workers();
    if workers.len() < 2 {
        return Vec::new();
    }

    let loads: Vec<(&WorkerProfile, Decimal, Vec<usize>)> = workers
        .into_iter()
        .map(|worker| {
            let (hours, indices) = scope
                .shifts
                .iter()
                .enumerate()
                .filter(|(_, s)| s.is_assigned_to(&worker.id))
                .fold((Decimal::ZERO, Vec::new()), |(hours, mut indices), (i, s)| {
                    indices.push(i);
                    (hours + s.hours(), indices)
                });
            (worker, hours, indices)
        })
        .collect();

    let total: Decimal = loads.iter().map(|(_, hours, _)| *hours).sum();
    let mean = total / Decimal::from(loads.len());
    if mean.is_zero() {
        return Vec::new();
    }

    loads
        .into_iter()
        .filter_map(|(worker, hours, indices)| {
            let deviation = ((hours - mean).abs() / mean) * Decimal::ONE_HUNDRED;
            if deviation <= config.max_load_deviation_percent {
                return None;
            }
            let direction = if hours > mean { "above" } else { "below" };
            Some(
                Violation::new(
                    RuleType::OrganizationalPolicy,
                    ViolationCode::LoadImbalance,
                    Severity::Low,
                    format!(
                        "{} has {}h in this roster, {}% {} the team mean of {}h",
                        worker.id,
                        fmt_hours(hours),
                        deviation.round().to_i64().unwrap_or_default(),
                        direction,
                        fmt_hours(mean)
                    ),
                )
                .with_shifts(indices)
                .with_worker(worker.id.as_str()),
            )
        })
        .collect()
}
