//! Rule evaluators for the roster compliance engine.
//!
//! Each rule category has one evaluator implementing [`RuleEvaluator`]. The
//! orchestrator never matches on rule categories itself: it parses a rule's
//! raw payload into a [`RuleConfig`] and asks [`evaluator_for`] for the
//! evaluator registered for that category.
//!
//! Evaluators are pure. Everything they need (worker, client and site
//! profiles, the holiday calendar) is resolved up front into an
//! [`EvaluationContext`], and the batch plus context are handed over as an
//! [`EvaluationScope`].

mod award_hours;
mod billing_classification;
mod organizational_policy;
mod qualification;
mod safety;
mod support_compliance;

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    ClientProfile, GeoPoint, HolidayCalendar, RosteringRule, RuleType, ShiftCandidate, Site,
    Violation, WorkerProfile,
};
use crate::timing::{WorkerTimeline, workers_in_batch};

pub use award_hours::{AwardHoursConfig, AwardHoursEvaluator};
pub use billing_classification::{
    BillingClassificationConfig, BillingClassificationEvaluator, classify_shift, classify_shifts,
};
pub use organizational_policy::{
    ConflictOfInterest, OrganizationalPolicyConfig, OrganizationalPolicyEvaluator,
};
pub use qualification::{QualificationConfig, QualificationEvaluator};
pub use safety::{SafetyConfig, SafetyEvaluator};
pub use support_compliance::{SupportComplianceConfig, SupportComplianceEvaluator};

/// The typed configuration of one rule, one variant per category.
///
/// The serialized form is adjacently tagged so it lines up with the
/// `type`/`config` pair on a [`RosteringRule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "snake_case")]
pub enum RuleConfig {
    /// Award hours thresholds.
    AwardHours(AwardHoursConfig),
    /// Safety thresholds.
    Safety(SafetyConfig),
    /// Support compliance switches.
    SupportCompliance(SupportComplianceConfig),
    /// Credential requirements.
    Qualification(QualificationConfig),
    /// Organisational policy settings.
    OrganizationalPolicy(OrganizationalPolicyConfig),
    /// Billing time boundaries.
    BillingClassification(BillingClassificationConfig),
}

impl RuleConfig {
    /// Parses and checks the raw configuration of `rule`.
    ///
    /// A missing or `null` payload means "all defaults". Unknown fields,
    /// wrong types and negative thresholds are reported as
    /// [`EngineError::InvalidRuleConfig`].
    ///
    /// # Example
    ///
    /// ```
    /// use roster_compliance::models::{RosteringRule, RuleType};
    /// use roster_compliance::rules::RuleConfig;
    /// use rust_decimal::Decimal;
    /// use serde_json::json;
    ///
    /// let rule = RosteringRule::new("r1", "Award", RuleType::AwardHours, json!({ "max_daily_hours": 12 }));
    /// let RuleConfig::AwardHours(config) = RuleConfig::from_rule(&rule).unwrap() else {
    ///     panic!("wrong variant");
    /// };
    /// assert_eq!(config.max_daily_hours, Decimal::new(12, 0));
    ///
    /// let bad = RosteringRule::new("r2", "Award", RuleType::AwardHours, json!({ "max_daly_hours": 12 }));
    /// assert!(RuleConfig::from_rule(&bad).is_err());
    /// ```
    pub fn from_rule(rule: &RosteringRule) -> EngineResult<Self> {
        let invalid = |message: String| EngineError::InvalidRuleConfig {
            rule_id: rule.id.clone(),
            message,
        };

        let payload = if rule.config.is_null() {
            json!({})
        } else {
            rule.config.clone()
        };

        let config: RuleConfig =
            serde_json::from_value(json!({ "type": rule.rule_type, "config": payload }))
                .map_err(|e| invalid(e.to_string()))?;
        config.validate().map_err(invalid)?;
        Ok(config)
    }

    /// The category this configuration belongs to.
    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleConfig::AwardHours(_) => RuleType::AwardHours,
            RuleConfig::Safety(_) => RuleType::Safety,
            RuleConfig::SupportCompliance(_) => RuleType::SupportCompliance,
            RuleConfig::Qualification(_) => RuleType::Qualification,
            RuleConfig::OrganizationalPolicy(_) => RuleType::OrganizationalPolicy,
            RuleConfig::BillingClassification(_) => RuleType::BillingClassification,
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            RuleConfig::AwardHours(c) => c.validate(),
            RuleConfig::Safety(c) => c.validate(),
            RuleConfig::SupportCompliance(c) => c.validate(),
            RuleConfig::Qualification(c) => c.validate(),
            RuleConfig::OrganizationalPolicy(c) => c.validate(),
            RuleConfig::BillingClassification(c) => c.validate(),
        }
    }
}

/// Error for a configuration handed to the wrong evaluator.
pub(crate) fn config_mismatch(expected: RuleType, config: &RuleConfig) -> EngineError {
    EngineError::InvalidRuleConfig {
        rule_id: String::new(),
        message: format!(
            "expected {} configuration, found {}",
            expected,
            config.rule_type()
        ),
    }
}

/// Reference data resolved before evaluation, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    /// Worker profiles, including shift history.
    pub workers: HashMap<String, WorkerProfile>,
    /// Client profiles.
    pub clients: HashMap<String, ClientProfile>,
    /// Sites.
    pub sites: HashMap<String, Site>,
    /// Public holidays observed by the organisation.
    pub holidays: HolidayCalendar,
}

impl EvaluationContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds worker profiles.
    pub fn with_workers(mut self, workers: impl IntoIterator<Item = WorkerProfile>) -> Self {
        self.workers
            .extend(workers.into_iter().map(|w| (w.id.clone(), w)));
        self
    }

    /// Adds client profiles.
    pub fn with_clients(mut self, clients: impl IntoIterator<Item = ClientProfile>) -> Self {
        self.clients
            .extend(clients.into_iter().map(|c| (c.id.clone(), c)));
        self
    }

    /// Adds sites.
    pub fn with_sites(mut self, sites: impl IntoIterator<Item = Site>) -> Self {
        self.sites
            .extend(sites.into_iter().map(|s| (s.id.clone(), s)));
        self
    }

    /// Sets the holiday calendar.
    pub fn with_holidays(mut self, holidays: HolidayCalendar) -> Self {
        self.holidays = holidays;
        self
    }

    /// Looks up a worker profile.
    pub fn worker(&self, worker_id: &str) -> Option<&WorkerProfile> {
        self.workers.get(worker_id)
    }

    /// The client a shift is for, if it names one with a profile.
    pub fn client_for(&self, shift: &ShiftCandidate) -> Option<&ClientProfile> {
        shift.client_id.as_deref().and_then(|id| self.clients.get(id))
    }

    /// Where a shift takes place: the site's location, else the client's.
    pub fn shift_location(&self, shift: &ShiftCandidate) -> Option<GeoPoint> {
        shift
            .site_id
            .as_deref()
            .and_then(|id| self.sites.get(id))
            .map(|site| site.location)
            .or_else(|| self.client_for(shift).and_then(|c| c.location))
    }
}

/// Everything one evaluator call looks at.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationScope<'a> {
    /// The submitted batch.
    pub shifts: &'a [ShiftCandidate],
    /// Resolved reference data.
    pub context: &'a EvaluationContext,
    /// Fixed anchor for fortnightly windows. When absent each shift's own
    /// start date anchors the window, so a roster proposed weeks ahead is
    /// checked against the fortnight it falls in rather than the one ending today.
    pub reference_date: Option<NaiveDate>,
}

impl<'a> EvaluationScope<'a> {
    /// Creates a scope without a fixed reference date.
    pub fn new(shifts: &'a [ShiftCandidate], context: &'a EvaluationContext) -> Self {
        Self {
            shifts,
            context,
            reference_date: None,
        }
    }

    /// Pins the fortnightly window to `reference_date`.
    pub fn with_reference_date(mut self, reference_date: Option<NaiveDate>) -> Self {
        self.reference_date = reference_date;
        self
    }

    /// Workers in the batch that have a profile, in order of first appearance.
    pub fn known_workers(&self) -> Vec<&'a WorkerProfile> {
        let context = self.context;
        workers_in_batch(self.shifts)
            .into_iter()
            .filter_map(|id| context.worker(id))
            .collect()
    }

    /// The batch-plus-history timeline for a worker with a profile.
    pub fn timeline(&self, worker: &'a WorkerProfile) -> WorkerTimeline<'a> {
        WorkerTimeline::build(&worker.id, self.shifts, &worker.history)
    }

    /// Assigned workers of a shift that have a profile, duplicates removed.
    pub fn assigned_workers(&self, shift: &'a ShiftCandidate) -> Vec<&'a WorkerProfile> {
        let mut workers: Vec<&WorkerProfile> = Vec::new();
        for worker in shift.worker_ids.iter().filter_map(|id| self.context.worker(id)) {
            if !workers.iter().any(|w| w.id == worker.id) {
                workers.push(worker);
            }
        }
        workers
    }
}

/// One evaluator per rule category.
///
/// Implementations receive the typed configuration for their own category;
/// any other variant is a configuration error.
pub trait RuleEvaluator: Send + Sync {
    /// The category this evaluator handles.
    fn rule_type(&self) -> RuleType;

    /// Checks the batch against one rule's configuration.
    ///
    /// Returned violations are not yet attributed to a rule id; the
    /// orchestrator does that.
    fn evaluate(&self, config: &RuleConfig, scope: &EvaluationScope<'_>)
    -> EngineResult<Vec<Violation>>;
}

static AWARD_HOURS: AwardHoursEvaluator = AwardHoursEvaluator;
static SAFETY: SafetyEvaluator = SafetyEvaluator;
static SUPPORT_COMPLIANCE: SupportComplianceEvaluator = SupportComplianceEvaluator;
static QUALIFICATION: QualificationEvaluator = QualificationEvaluator;
static ORGANIZATIONAL_POLICY: OrganizationalPolicyEvaluator = OrganizationalPolicyEvaluator;
static BILLING_CLASSIFICATION: BillingClassificationEvaluator = BillingClassificationEvaluator;

/// The evaluator registered for a rule category.
pub fn evaluator_for(rule_type: RuleType) -> &'static dyn RuleEvaluator {
    match rule_type {
        RuleType::AwardHours => &AWARD_HOURS,
        RuleType::Safety => &SAFETY,
        RuleType::SupportCompliance => &SUPPORT_COMPLIANCE,
        RuleType::Qualification => &QUALIFICATION,
        RuleType::OrganizationalPolicy => &ORGANIZATIONAL_POLICY,
        RuleType::BillingClassification => &BILLING_CLASSIFICATION,
    }
}

/// Formats hours for messages: at most two decimals, no trailing zeros.
pub(crate) fn fmt_hours(hours: rust_decimal::Decimal) -> String {
    hours.round_dp(2).normalize().to_string()
}

/// Ensures a threshold is not negative.
pub(crate) fn non_negative<T>(field: &str, value: T) -> Result<(), String>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value < T::default() {
        Err(format!("{} must not be negative, got {}", field, value))
    } else {
        Ok(())
    }
}
