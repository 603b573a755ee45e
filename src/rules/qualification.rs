//! Credential presence and expiry evaluation.
//!
//! The credentials a worker needs for a shift are the union of the rule's
//! global list, the list for the shift's type, the client's own requirements
//! and, for clients with a behaviour support plan, the behaviour support
//! credential. Expiry is judged against the shift's start date.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{EvaluationScope, RuleConfig, RuleEvaluator, config_mismatch, non_negative};
use crate::error::EngineResult;
use crate::models::{
    CredentialStatus, RuleType, Severity, ShiftCandidate, Violation, ViolationCode, WorkerProfile,
};

/// Credential requirements for the qualification rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualificationConfig {
    /// Credentials every worker needs on every shift.
    pub required_credentials: Vec<String>,
    /// Extra credentials keyed by shift type tag.
    pub shift_type_requirements: BTreeMap<String, Vec<String>>,
    /// Credentials expiring within this many days of the shift raise a warning.
    pub expiry_warning_days: i64,
    /// Credential required for clients with a behaviour support plan.
    pub behaviour_support_credential: String,
}

impl Default for QualificationConfig {
    fn default() -> Self {
        Self {
            required_credentials: Vec::new(),
            shift_type_requirements: BTreeMap::new(),
            expiry_warning_days: 30,
            behaviour_support_credential: "behaviour_support".to_string(),
        }
    }
}

impl QualificationConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        non_negative("expiry_warning_days", self.expiry_warning_days)?;
        let blank = self
            .required_credentials
            .iter()
            .chain(self.shift_type_requirements.values().flatten())
            .chain(std::iter::once(&self.behaviour_support_credential))
            .any(|c| c.trim().is_empty());
        if blank {
            return Err("credential types must not be blank".to_string());
        }
        Ok(())
    }
}

/// Evaluator for [`RuleType::Qualification`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QualificationEvaluator;

impl RuleEvaluator for QualificationEvaluator {
    fn rule_type(&self) -> RuleType {
        RuleType::Qualification
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        scope: &EvaluationScope<'_>,
    ) -> EngineResult<Vec<Violation>> {
        let RuleConfig::Qualification(config) = config else {
            return Err(config_mismatch(self.rule_type(), config));
        };

        let mut violations = Vec::new();
        for (index, shift) in scope.shifts.iter().enumerate() {
            let required = required_credentials(config, shift, scope);
            for worker in scope.assigned_workers(shift) {
                violations.extend(
                    required
                        .iter()
                        .filter_map(|credential| check(config, index, shift, worker, credential)),
                );
            }
        }

        Ok(violations)
    }
}

/// Required credential types for a shift, deduplicated, in first-seen order.
fn required_credentials<'a>(
    config: &'a QualificationConfig,
    shift: &ShiftCandidate,
    scope: &EvaluationScope<'a>,
) -> Vec<&'a str> {
    let client = scope.context.client_for(shift);

    let by_shift_type = shift
        .shift_type
        .as_ref()
        .and_then(|t| config.shift_type_requirements.get(t))
        .into_iter()
        .flatten();
    let by_client = client.into_iter().flat_map(|c| c.required_credentials.iter());
    let behaviour_support = client
        .filter(|c| c.behaviour_support_plan)
        .map(|_| &config.behaviour_support_credential);

    let mut required: Vec<&str> = Vec::new();
    for credential in config
        .required_credentials
        .iter()
        .chain(by_shift_type)
        .chain(by_client)
        .chain(behaviour_support)
    {
        if !required.contains(&credential.as_str()) {
            required.push(credential);
        }
    }
    required
}

fn check(
    config: &QualificationConfig,
    index: usize,
    shift: &ShiftCandidate,
    worker: &WorkerProfile,
    credential: &str,
) -> Option<Violation> {
    let shift_date = shift.start_date();
    let (code, severity, message) =
        match worker.credential_status(credential, shift_date, config.expiry_warning_days) {
            CredentialStatus::Valid => return None,
            CredentialStatus::Missing => (
                ViolationCode::CredentialMissing,
                Severity::High,
                format!("{} does not hold the required {} credential", worker.id, credential),
            ),
            CredentialStatus::Expired { expires_on } => (
                ViolationCode::CredentialExpired,
                Severity::High,
                format!(
                    "{}'s {} credential expired on {}, before the shift on {}",
                    worker.id, credential, expires_on, shift_date
                ),
            ),
            CredentialStatus::ExpiringSoon {
                expires_on,
                days_remaining,
            } => (
                ViolationCode::CredentialExpiringSoon,
                Severity::Medium,
                format!(
                    "{}'s {} credential expires on {}, {} days after the shift",
                    worker.id, credential, expires_on, days_remaining
                ),
            ),
        };

    Some(
        Violation::new(RuleType::Qualification, code, severity, message)
            .with_shift(index)
            .with_worker(worker.id.as_str())
            .with_client(shift.client_id.as_deref()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClientProfile, Credential, ViolationCategory};
    use crate::rules::EvaluationContext;
    use chrono::{NaiveDate, NaiveDateTime};

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn shift(worker: &str) -> ShiftCandidate {
        ShiftCandidate::new(
            make_datetime("2026-01-15", "09:00:00"),
            make_datetime("2026-01-15", "17:00:00"),
            vec![worker.to_string()],
        )
    }

    fn worker_holding(id: &str, credential: &str, expires_on: Option<&str>) -> WorkerProfile {
        let mut worker = WorkerProfile::new(id);
        worker.credentials.push(Credential {
            credential_type: credential.to_string(),
            expires_on: expires_on.map(make_date),
        });
        worker
    }

    fn bsp_client() -> ClientProfile {
        let mut client = ClientProfile::new("c1");
        client.behaviour_support_plan = true;
        client
    }

    fn evaluate_with(
        config: QualificationConfig,
        shifts: &[ShiftCandidate],
        context: &EvaluationContext,
    ) -> Vec<Violation> {
        let scope = EvaluationScope::new(shifts, context);
        QualificationEvaluator
            .evaluate(&RuleConfig::Qualification(config), &scope)
            .unwrap()
    }

    fn evaluate(shifts: &[ShiftCandidate], context: &EvaluationContext) -> Vec<Violation> {
        evaluate_with(QualificationConfig::default(), shifts, context)
    }

    #[test]
    fn test_bsp_client_with_unqualified_worker_is_one_conflict() {
        let context = EvaluationContext::new()
            .with_workers([WorkerProfile::new("w1")])
            .with_clients([bsp_client()]);

        let violations = evaluate(&[shift("w1").with_client("c1")], &context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ViolationCode::CredentialMissing);
        assert_eq!(violations[0].severity, Severity::High);
        assert_eq!(violations[0].category, ViolationCategory::ComplianceIssue);
    }

    #[test]
    fn test_credential_expiring_in_twenty_days_is_one_medium_warning() {
        let context = EvaluationContext::new()
            .with_workers([worker_holding(
                "w1",
                "behaviour_support",
                Some("2026-02-04"),
            )])
            .with_clients([bsp_client()]);

        let violations = evaluate(&[shift("w1").with_client("c1")], &context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ViolationCode::CredentialExpiringSoon);
        assert_eq!(violations[0].severity, Severity::Medium);
        assert!(!violations[0].is_conflict());
        assert!(violations[0].message.contains("20 days"));
    }

    #[test]
    fn test_expired_credential_is_conflict() {
        let context = EvaluationContext::new().with_workers([worker_holding(
            "w1",
            "first_aid",
            Some("2026-01-14"),
        )]);
        let config = QualificationConfig {
            required_credentials: vec!["first_aid".to_string()],
            ..QualificationConfig::default()
        };

        let violations = evaluate_with(config, &[shift("w1")], &context);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ViolationCode::CredentialExpired);
    }

    #[test]
    fn test_requirements_are_unioned_and_deduplicated() {
        let mut client = ClientProfile::new("c1");
        client.required_credentials = vec!["first_aid".to_string(), "manual_handling".to_string()];
        let context = EvaluationContext::new()
            .with_workers([WorkerProfile::new("w1")])
            .with_clients([client]);

        let mut by_type = BTreeMap::new();
        by_type.insert("sleepover".to_string(), vec!["first_aid".to_string()]);
        let config = QualificationConfig {
            required_credentials: vec!["police_check".to_string()],
            shift_type_requirements: by_type,
            ..QualificationConfig::default()
        };

        let shifts = vec![shift("w1").with_client("c1").with_shift_type("sleepover")];
        let violations = evaluate_with(config, &shifts, &context);
        let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(violations.len(), 3);
        assert!(messages[0].contains("police_check"));
        assert!(messages[1].contains("first_aid"));
        assert!(messages[2].contains("manual_handling"));
    }

    #[test]
    fn test_no_requirements_no_violations() {
        let context = EvaluationContext::new().with_workers([WorkerProfile::new("w1")]);
        assert!(evaluate(&[shift("w1")], &context).is_empty());
    }

    #[test]
    fn test_unknown_worker_is_left_to_orchestrator() {
        let context = EvaluationContext::new().with_clients([bsp_client()]);
        assert!(evaluate(&[shift("ghost").with_client("c1")], &context).is_empty());
    }

    #[test]
    fn test_blank_credential_fails_validation() {
        let config = QualificationConfig {
            required_credentials: vec!["  ".to_string()],
            ..QualificationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
