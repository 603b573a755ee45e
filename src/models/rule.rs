//! Rostering rule definitions.
//!
//! A [`RosteringRule`] is stored per organisation with a raw configuration
//! payload. The payload is only turned into a typed
//! [`RuleConfig`](crate::rules::RuleConfig) at evaluation time, so one
//! malformed rule cannot prevent the rest of a rule set from loading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The six rule categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    /// Shift length, daily/fortnightly caps and minimum breaks.
    AwardHours,
    /// Fatigue, lone-worker staffing and travel buffers.
    Safety,
    /// Client bans, preferences, ratios and behaviour support plans.
    SupportCompliance,
    /// Credential presence and expiry.
    Qualification,
    /// Availability, conflicts of interest, load balance and proximity.
    OrganizationalPolicy,
    /// Derives billing tags; never produces violations.
    BillingClassification,
}

impl RuleType {
    /// All rule categories in declaration order.
    pub const ALL: [RuleType; 6] = [
        RuleType::AwardHours,
        RuleType::Safety,
        RuleType::SupportCompliance,
        RuleType::Qualification,
        RuleType::OrganizationalPolicy,
        RuleType::BillingClassification,
    ];

    /// The snake_case code used on the wire and in configuration files.
    pub fn code(&self) -> &'static str {
        match self {
            RuleType::AwardHours => "award_hours",
            RuleType::Safety => "safety",
            RuleType::SupportCompliance => "support_compliance",
            RuleType::Qualification => "qualification",
            RuleType::OrganizationalPolicy => "organizational_policy",
            RuleType::BillingClassification => "billing_classification",
        }
    }

    /// Parses a snake_case rule type code.
    pub fn from_code(code: &str) -> Option<RuleType> {
        RuleType::ALL.into_iter().find(|t| t.code() == code)
    }
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleType::AwardHours => write!(f, "Award Hours"),
            RuleType::Safety => write!(f, "Safety"),
            RuleType::SupportCompliance => write!(f, "Support Compliance"),
            RuleType::Qualification => write!(f, "Qualification"),
            RuleType::OrganizationalPolicy => write!(f, "Organizational Policy"),
            RuleType::BillingClassification => write!(f, "Billing Classification"),
        }
    }
}

fn default_active() -> bool {
    true
}

/// A configurable rostering rule belonging to one organisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosteringRule {
    /// Unique identifier for the rule.
    pub id: String,
    /// The organisation that owns the rule.
    #[serde(default)]
    pub organisation_id: String,
    /// Display name.
    pub name: String,
    /// Longer description shown to rule authors.
    #[serde(default)]
    pub description: String,
    /// The category, which determines the shape of `config`.
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    /// Raw configuration payload.
    #[serde(default)]
    pub config: serde_json::Value,
    /// Inactive rules are never evaluated.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// When the rule was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the rule was last changed.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RosteringRule {
    /// Creates an active rule with the given raw configuration.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rule_type: RuleType,
        config: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            organisation_id: String::new(),
            name: name.into(),
            description: String::new(),
            rule_type,
            config,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns true if the rule should be evaluated under the given id filter.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_compliance::models::{RosteringRule, RuleType};
    ///
    /// let rule = RosteringRule::new("r1", "Award hours", RuleType::AwardHours, serde_json::json!({}));
    /// assert!(rule.is_selected(None));
    /// assert!(rule.is_selected(Some(&["r1".to_string()])));
    /// assert!(!rule.is_selected(Some(&["r2".to_string()])));
    /// ```
    pub fn is_selected(&self, rule_ids: Option<&[String]>) -> bool {
        self.is_active && rule_ids.is_none_or(|ids| ids.iter().any(|id| id == &self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_inactive_rule_never_selected() {
        let mut rule = RosteringRule::new("r1", "Safety", RuleType::Safety, json!({}));
        rule.is_active = false;
        assert!(!rule.is_selected(None));
        assert!(!rule.is_selected(Some(&["r1".to_string()])));
    }

    #[test]
    fn test_rule_type_codes_round_trip() {
        for rule_type in RuleType::ALL {
            assert_eq!(RuleType::from_code(rule_type.code()), Some(rule_type));
            assert_eq!(
                serde_json::to_string(&rule_type).unwrap(),
                format!("\"{}\"", rule_type.code())
            );
        }
        assert_eq!(RuleType::from_code("payroll"), None);
    }

    #[test]
    fn test_deserialize_rule_with_defaults() {
        let json = r#"{
            "id": "rule_award",
            "name": "SCHADS award hours",
            "type": "award_hours",
            "config": { "min_shift_hours": 2 }
        }"#;
        let rule: RosteringRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.rule_type, RuleType::AwardHours);
        assert!(rule.is_active);
        assert_eq!(rule.config["min_shift_hours"], json!(2));
        assert!(rule.created_at.is_none());
    }

    #[test]
    fn test_rule_type_display() {
        assert_eq!(RuleType::SupportCompliance.to_string(), "Support Compliance");
    }
}
