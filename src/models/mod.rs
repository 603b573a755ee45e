//! Core data models for the roster compliance engine.
//!
//! Inputs (shifts, workers, clients, sites, rules, holidays) are read-only
//! and rebuilt per validation call; the engine only creates violations and
//! results.

mod client;
mod holiday;
mod location;
mod rule;
mod shift;
mod validation_result;
mod violation;
mod worker;

pub use client::{ClientProfile, GenderPreference};
pub use holiday::{HolidayCalendar, NATIONAL_REGION, PublicHoliday};
pub use location::{GeoPoint, Site};
pub use rule::{RosteringRule, RuleType};
pub use shift::ShiftCandidate;
pub use validation_result::{BillingTag, ShiftClassification, ValidationResult, ValidationSummary};
pub use violation::{Severity, Violation, ViolationCategory, ViolationCode};
pub use worker::{AvailabilityWindow, Credential, CredentialStatus, Gender, WorkerProfile};
