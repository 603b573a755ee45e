//! Support compliance evaluation.
//!
//! Care-delivery constraints that come from the client's profile: banned
//! workers, gender preferences, minimum staffing ratios, behaviour support
//! credentials and preferred workers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{EvaluationScope, RuleConfig, RuleEvaluator, config_mismatch};
use crate::error::EngineResult;
use crate::models::{
    ClientProfile, RuleType, Severity, ShiftCandidate, Violation, ViolationCode, WorkerProfile,
};

/// Switches for the support compliance rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupportComplianceConfig {
    /// Credential a worker needs to support a client with a behaviour support plan.
    pub behaviour_support_credential: String,
    /// Check workers against client gender preferences.
    pub enforce_gender_preference: bool,
    /// Warn when a client's preferred worker was available but not rostered.
    pub check_preferred_workers: bool,
}

impl Default for SupportComplianceConfig {
    fn default() -> Self {
        Self {
            behaviour_support_credential: "behaviour_support".to_string(),
            enforce_gender_preference: true,
            check_preferred_workers: true,
        }
    }
}

impl SupportComplianceConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.behaviour_support_credential.trim().is_empty() {
            return Err("behaviour_support_credential must not be blank".to_string());
        }
        Ok(())
    }
}

/// Evaluator for [`RuleType::SupportCompliance`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SupportComplianceEvaluator;

impl RuleEvaluator for SupportComplianceEvaluator {
    fn rule_type(&self) -> RuleType {
        RuleType::SupportCompliance
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        scope: &EvaluationScope<'_>,
    ) -> EngineResult<Vec<Violation>> {
        let RuleConfig::SupportCompliance(config) = config else {
            return Err(config_mismatch(self.rule_type(), config));
        };

        let mut violations = Vec::new();

        for (index, shift) in scope.shifts.iter().enumerate() {
            let Some(client) = scope.context.client_for(shift) else {
                continue;
            };

            for worker in scope.assigned_workers(shift) {
                violations.extend(check_worker(config, index, shift, client, worker));
            }

            violations.extend(staffing_ratio(index, shift, client));

            if config.check_preferred_workers {
                violations.extend(overlooked_preference(index, shift, client, scope));
            }
        }

        Ok(violations)
    }
}

fn violation(
    code: ViolationCode,
    severity: Severity,
    message: String,
    index: usize,
    client: &ClientProfile,
) -> Violation {
    Violation::new(RuleType::SupportCompliance, code, severity, message)
        .with_shift(index)
        .with_client(Some(client.id.as_str()))
}

fn check_worker(
    config: &SupportComplianceConfig,
    index: usize,
    shift: &ShiftCandidate,
    client: &ClientProfile,
    worker: &WorkerProfile,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if client.bans(&worker.id) {
        violations.push(
            violation(
                ViolationCode::BannedWorker,
                Severity::High,
                format!("{} is banned from supporting {}", worker.id, client.id),
                index,
                client,
            )
            .with_worker(worker.id.as_str()),
        );
    }

    let mismatch = client
        .gender_preference
        .filter(|p| config.enforce_gender_preference && worker.gender != Some(p.gender));
    if let Some(preference) = mismatch {
        let (severity, kind) = if preference.strict {
            (Severity::High, "requires")
        } else {
            (Severity::Low, "prefers")
        };
        let recorded = worker
            .gender
            .map_or_else(|| "not recorded".to_string(), |g| g.to_string());
        violations.push(
            violation(
                ViolationCode::GenderPreferenceMismatch,
                severity,
                format!(
                    "{} {} a {} worker; {} is {}",
                    client.id, kind, preference.gender, worker.id, recorded
                ),
                index,
                client,
            )
            .with_worker(worker.id.as_str()),
        );
    }

    if client.behaviour_support_plan {
        let credential = &config.behaviour_support_credential;
        let status = worker.credential_status(credential, shift.start_date(), 0);
        if status.is_unusable() {
            violations.push(
                violation(
                    ViolationCode::BehaviourSupportCredentialMissing,
                    Severity::High,
                    format!(
                        "{} has a behaviour support plan; {} has no current {} credential",
                        client.id, worker.id, credential
                    ),
                    index,
                    client,
                )
                .with_worker(worker.id.as_str()),
            );
        }
    }

    violations
}

fn staffing_ratio(index: usize, shift: &ShiftCandidate, client: &ClientProfile) -> Option<Violation> {
    let required = client.min_workers?;
    let staffed = shift.worker_ids.iter().collect::<BTreeSet<_>>().len();
    if staffed >= required as usize {
        return None;
    }

    let mut v = violation(
        ViolationCode::StaffingRatioNotMet,
        Severity::High,
        format!(
            "{} requires {} workers per shift, {} rostered",
            client.id, required, staffed
        ),
        index,
        client,
    );
    for worker_id in &shift.worker_ids {
        v = v.with_worker(worker_id.as_str());
    }
    Some(v)
}

/// A preferred worker who could have taken the shift but none was rostered.
///
/// Candidates are taken in the client's preference order; a candidate must
/// have a profile, not be banned, be available for the shift and have no
/// other batch or history shift overlapping it.
fn overlooked_preference(
    index: usize,
    shift: &ShiftCandidate,
    client: &ClientProfile,
    scope: &EvaluationScope<'_>,
) -> Option<Violation> {
    if shift.worker_ids.iter().any(|id| client.prefers(id)) {
        return None;
    }

    let range = shift.range();
    let candidate = client
        .preferred_worker_ids
        .iter()
        .filter(|id| !client.bans(id))
        .filter_map(|id| scope.context.worker(id))
        .find(|worker| {
            let busy_in_batch = scope
                .shifts
                .iter()
                .any(|s| s.is_assigned_to(&worker.id) && s.range().overlaps(&range));
            let busy_in_history = worker.history.iter().any(|s| s.range().overlaps(&range));
            !busy_in_batch && !busy_in_history && worker.is_available_for(&range)
        })?;

    let mut v = violation(
        ViolationCode::PreferredWorkerOverlooked,
        Severity::Low,
        format!(
            "{} prefers {}, who is available for this shift",
            client.id, candidate.id
        ),
        index,
        client,
    );
    for worker_id in &shift.worker_ids {
        v = v.with_worker(worker_id.as_str());
    }
    Some(v)
}
