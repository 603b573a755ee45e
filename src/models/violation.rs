//! Violation model.
//!
//! Every evaluator reports its findings as [`Violation`] values. Severity
//! alone decides whether a violation is a conflict (`high`) or a warning;
//! the [`ViolationCategory`] decides which summary counter it feeds.

use serde::{Deserialize, Serialize};

use super::RuleType;

/// How serious a violation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Advisory only.
    Low,
    /// Needs attention but does not block the roster.
    Medium,
    /// Blocks the roster.
    High,
}

impl Severity {
    /// Returns true if a violation of this severity is a hard conflict.
    pub fn is_conflict(&self) -> bool {
        *self == Severity::High
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Which kind of breach a violation represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    /// Breach of an award-hours, safety or support-compliance rule.
    RuleViolation,
    /// Credential problem, including unknown workers.
    ComplianceIssue,
    /// Organisational policy breach.
    PolicyViolation,
    /// A rule could not be evaluated because its configuration is malformed.
    ConfigurationError,
}

impl From<RuleType> for ViolationCategory {
    fn from(rule_type: RuleType) -> Self {
        match rule_type {
            RuleType::AwardHours | RuleType::Safety | RuleType::SupportCompliance => {
                ViolationCategory::RuleViolation
            }
            RuleType::Qualification => ViolationCategory::ComplianceIssue,
            RuleType::OrganizationalPolicy | RuleType::BillingClassification => {
                ViolationCategory::PolicyViolation
            }
        }
    }
}

/// Machine-readable identifier for each kind of finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// Shift shorter than the minimum engagement.
    ShiftTooShort,
    /// Worker exceeds the daily hour cap.
    DailyHoursExceeded,
    /// Worker exceeds the fortnightly hour cap.
    FortnightlyHoursExceeded,
    /// Rest between consecutive shifts is below the minimum break.
    InsufficientBreak,
    /// Worker is booked on two shifts at once.
    OverlappingShifts,
    /// Too many hours inside a rolling 24-hour window.
    FatigueLimitExceeded,
    /// High-risk shift without enough co-assigned workers.
    LoneWorkerHighRisk,
    /// Too many consecutive working days.
    ConsecutiveDaysExceeded,
    /// Not enough time to travel between distant shifts.
    InsufficientTravelTime,
    /// Worker is banned by the client.
    BannedWorker,
    /// Worker does not match the client's gender preference.
    GenderPreferenceMismatch,
    /// Fewer workers than the client's required ratio.
    StaffingRatioNotMet,
    /// Worker lacks the behaviour support credential.
    BehaviourSupportCredentialMissing,
    /// A preferred worker was available but not rostered.
    PreferredWorkerOverlooked,
    /// Shift references a worker with no profile.
    UnknownWorker,
    /// Required credential not held.
    CredentialMissing,
    /// Required credential expired before the shift.
    CredentialExpired,
    /// Required credential expires soon after the shift.
    CredentialExpiringSoon,
    /// Shift falls outside the worker's declared availability.
    OutsideAvailability,
    /// Worker and client are a configured conflict-of-interest pairing.
    ConflictOfInterest,
    /// Worker's load deviates too far from the team mean.
    LoadImbalance,
    /// Shift is further away than the worker will travel.
    OutsideTravelRadius,
    /// The rule's configuration payload is malformed.
    InvalidRuleConfiguration,
}

/// A single finding against the submitted roster.
///
/// # Example
///
/// ```
/// use roster_compliance::models::{RuleType, Severity, Violation, ViolationCode};
///
/// let violation = Violation::new(
///     RuleType::AwardHours,
///     ViolationCode::ShiftTooShort,
///     Severity::High,
///     "Shift is 1.5h, below the 2h minimum engagement",
/// )
/// .for_rule("rule_award")
/// .with_shift(0)
/// .with_worker("w_001");
///
/// assert!(violation.is_conflict());
/// assert_eq!(violation.primary_shift(), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// The rule that produced the violation, absent for engine-level checks.
    pub rule_id: Option<String>,
    /// The rule category the violation belongs to.
    pub rule_type: RuleType,
    /// The summary bucket the violation counts towards.
    pub category: ViolationCategory,
    /// Machine-readable code.
    pub code: ViolationCode,
    /// How serious the violation is.
    pub severity: Severity,
    /// Human-readable explanation.
    pub message: String,
    /// Indices of the offending shifts in the submitted batch.
    pub shift_indices: Vec<usize>,
    /// Workers involved.
    pub worker_ids: Vec<String>,
    /// Client involved, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl Violation {
    /// Creates a violation whose category follows from its rule type.
    pub fn new(
        rule_type: RuleType,
        code: ViolationCode,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: None,
            rule_type,
            category: rule_type.into(),
            code,
            severity,
            message: message.into(),
            shift_indices: Vec::new(),
            worker_ids: Vec::new(),
            client_id: None,
        }
    }

    /// Creates the synthetic conflict reported for a malformed rule.
    pub fn configuration_error(rule_id: &str, rule_type: RuleType, message: impl Into<String>) -> Self {
        Self {
            rule_id: Some(rule_id.to_string()),
            rule_type,
            category: ViolationCategory::ConfigurationError,
            code: ViolationCode::InvalidRuleConfiguration,
            severity: Severity::High,
            message: message.into(),
            shift_indices: Vec::new(),
            worker_ids: Vec::new(),
            client_id: None,
        }
    }

    /// Attributes the violation to a rule.
    pub fn for_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    /// Adds one offending shift.
    pub fn with_shift(mut self, index: usize) -> Self {
        if !self.shift_indices.contains(&index) {
            self.shift_indices.push(index);
        }
        self
    }

    /// Adds several offending shifts, keeping them sorted and unique.
    pub fn with_shifts(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.shift_indices.extend(indices);
        self.shift_indices.sort_unstable();
        self.shift_indices.dedup();
        self
    }

    /// Adds an involved worker.
    pub fn with_worker(mut self, worker_id: impl Into<String>) -> Self {
        let worker_id = worker_id.into();
        if !self.worker_ids.contains(&worker_id) {
            self.worker_ids.push(worker_id);
        }
        self
    }

    /// Sets the involved client.
    pub fn with_client(mut self, client_id: Option<&str>) -> Self {
        self.client_id = client_id.map(str::to_string);
        self
    }

    /// Returns true if the violation blocks the roster.
    pub fn is_conflict(&self) -> bool {
        self.severity.is_conflict()
    }

    /// The earliest offending shift, used for deterministic ordering.
    pub fn primary_shift(&self) -> Option<usize> {
        self.shift_indices.iter().copied().min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_high_is_conflict() {
        assert!(Severity::High.is_conflict());
        assert!(!Severity::Medium.is_conflict());
        assert!(!Severity::Low.is_conflict());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_category_follows_rule_type() {
        let v = Violation::new(
            RuleType::Qualification,
            ViolationCode::CredentialMissing,
            Severity::High,
            "missing",
        );
        assert_eq!(v.category, ViolationCategory::ComplianceIssue);

        let v = Violation::new(
            RuleType::Safety,
            ViolationCode::FatigueLimitExceeded,
            Severity::High,
            "tired",
        );
        assert_eq!(v.category, ViolationCategory::RuleViolation);
    }

    #[test]
    fn test_configuration_error_is_high() {
        let v = Violation::configuration_error("r1", RuleType::Safety, "bad config");
        assert!(v.is_conflict());
        assert_eq!(v.category, ViolationCategory::ConfigurationError);
        assert_eq!(v.rule_id.as_deref(), Some("r1"));
        assert_eq!(v.primary_shift(), None);
    }

    #[test]
    fn test_with_shifts_sorts_and_dedups() {
        let v = Violation::new(
            RuleType::AwardHours,
            ViolationCode::InsufficientBreak,
            Severity::High,
            "break",
        )
        .with_shifts([4, 1, 4]);
        assert_eq!(v.shift_indices, vec![1, 4]);
        assert_eq!(v.primary_shift(), Some(1));
    }

    #[test]
    fn test_violation_serializes_camel_case() {
        let v = Violation::new(
            RuleType::SupportCompliance,
            ViolationCode::BannedWorker,
            Severity::High,
            "banned",
        )
        .for_rule("r1")
        .with_shift(0)
        .with_worker("w_001")
        .with_client(Some("c_001"));

        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["ruleId"], "r1");
        assert_eq!(json["ruleType"], "support_compliance");
        assert_eq!(json["category"], "rule_violation");
        assert_eq!(json["code"], "banned_worker");
        assert_eq!(json["severity"], "high");
        assert_eq!(json["shiftIndices"][0], 0);
        assert_eq!(json["clientId"], "c_001");
    }
}
