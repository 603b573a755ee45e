//! Splits violations into conflicts and warnings and counts them.

use crate::models::{
    RuleType, ShiftClassification, ValidationResult, ValidationSummary, Violation,
    ViolationCategory,
};

/// Builds the final [`ValidationResult`].
///
/// High-severity violations are conflicts and everything else is a warning;
/// input order is kept within each bucket.
///
/// # Example
///
/// ```
/// use roster_compliance::models::{RuleType, Severity, Violation, ViolationCode};
/// use roster_compliance::validation::classify;
///
/// let violations = vec![
///     Violation::new(RuleType::Qualification, ViolationCode::CredentialMissing, Severity::High, "missing"),
///     Violation::new(RuleType::Qualification, ViolationCode::CredentialExpiringSoon, Severity::Medium, "soon"),
/// ];
///
/// let result = classify(violations, 3, Vec::new());
/// assert!(!result.is_valid);
/// assert_eq!(result.conflicts.len(), 1);
/// assert_eq!(result.warnings.len(), 1);
/// assert_eq!(result.validation_summary.total_shifts_validated, 3);
/// assert_eq!(result.validation_summary.compliance_issues, 2);
/// assert_eq!(result.validation_summary.hard_constraint_violations, 0);
/// ```
pub fn classify(
    violations: Vec<Violation>,
    total_shifts: usize,
    shift_classifications: Vec<ShiftClassification>,
) -> ValidationResult {
    let (conflicts, warnings): (Vec<_>, Vec<_>) =
        violations.into_iter().partition(Violation::is_conflict);

    let validation_summary = ValidationSummary {
        total_shifts_validated: total_shifts,
        hard_constraint_violations: conflicts
            .iter()
            .filter(|v| v.category == ViolationCategory::RuleViolation)
            .count(),
        soft_preference_warnings: warnings.len(),
        compliance_issues: conflicts
            .iter()
            .chain(&warnings)
            .filter(|v| v.rule_type == RuleType::Qualification)
            .count(),
    };

    ValidationResult {
        is_valid: conflicts.is_empty(),
        conflicts,
        warnings,
        validation_summary,
        shift_classifications,
    }
}
