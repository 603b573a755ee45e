//! Validation result models.
//!
//! This module contains the [`ValidationResult`] type and the structures it
//! carries: the conflict/warning partition, the summary counters and the
//! informational billing tags.

use serde::{Deserialize, Serialize};

use super::Violation;

/// Aggregate counts over one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Number of shifts in the submitted batch.
    pub total_shifts_validated: usize,
    /// Conflicts that breach a hard rule (award hours, safety, support compliance).
    pub hard_constraint_violations: usize,
    /// Number of warnings returned.
    pub soft_preference_warnings: usize,
    /// Qualification findings, conflicts and warnings alike.
    pub compliance_issues: usize,
}

/// Billing tag derived for one shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingTag {
    /// Weekday daytime.
    Standard,
    /// Weekday evening or overnight start.
    Evening,
    /// Saturday or Sunday.
    Weekend,
    /// Public holiday.
    Holiday,
}

impl std::fmt::Display for BillingTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingTag::Standard => write!(f, "standard"),
            BillingTag::Evening => write!(f, "evening"),
            BillingTag::Weekend => write!(f, "weekend"),
            BillingTag::Holiday => write!(f, "holiday"),
        }
    }
}

/// Billing metadata for one shift in the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftClassification {
    /// Index of the shift in the submitted batch.
    pub shift_index: usize,
    /// The derived billing tag.
    pub tag: BillingTag,
    /// Name of the public holiday, for holiday shifts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday_name: Option<String>,
}

/// The outcome of validating a roster batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True when there are no conflicts.
    pub is_valid: bool,
    /// High-severity violations.
    pub conflicts: Vec<Violation>,
    /// Medium and low severity violations.
    pub warnings: Vec<Violation>,
    /// Aggregate counts.
    pub validation_summary: ValidationSummary,
    /// Billing tags, present only when a billing rule was evaluated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shift_classifications: Vec<ShiftClassification>,
}
