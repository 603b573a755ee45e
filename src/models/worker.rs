//! Worker profile and credential types.
//!
//! A [`WorkerProfile`] carries everything the evaluators need to know about
//! a support worker: credentials, hour caps, declared availability, travel
//! limits and prior shift history.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{GeoPoint, ShiftCandidate};
use crate::timing::TimeRange;

/// Self-identified gender, used for client gender preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Female.
    Female,
    /// Male.
    Male,
    /// Non-binary.
    NonBinary,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Female => write!(f, "female"),
            Gender::Male => write!(f, "male"),
            Gender::NonBinary => write!(f, "non-binary"),
        }
    }
}

/// A credential held by a worker (e.g. first aid, working-with-children check).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The credential type code.
    pub credential_type: String,
    /// The last day the credential is valid, absent if it never expires.
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
}

/// The state of one credential relative to a shift date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    /// The worker does not hold the credential at all.
    Missing,
    /// The credential expired before the date.
    Expired {
        /// The expiry date.
        expires_on: NaiveDate,
    },
    /// The credential is valid but expires within the warning window.
    ExpiringSoon {
        /// The expiry date.
        expires_on: NaiveDate,
        /// Days between the reference date and expiry.
        days_remaining: i64,
    },
    /// The credential is valid beyond the warning window.
    Valid,
}

impl CredentialStatus {
    /// Returns true if the credential cannot be relied on for the shift.
    pub fn is_unusable(&self) -> bool {
        matches!(self, CredentialStatus::Missing | CredentialStatus::Expired { .. })
    }
}

/// A recurring weekly availability window.
///
/// A window whose `end` is not after its `start` runs past midnight into the
/// following day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    /// The weekday the window starts on.
    pub weekday: Weekday,
    /// Start of the window.
    pub start: NaiveTime,
    /// End of the window.
    pub end: NaiveTime,
}

impl AvailabilityWindow {
    /// Returns true if `range` starts on this window's weekday and fits inside it.
    fn covers(&self, range: &TimeRange) -> bool {
        let date = range.start.date();
        if date.weekday() != self.weekday {
            return false;
        }
        let window_start = date.and_time(self.start);
        let window_end = if self.end > self.start {
            date.and_time(self.end)
        } else {
            match date.succ_opt() {
                Some(next) => next.and_time(self.end),
                None => return false,
            }
        };
        window_start <= range.start && range.end <= window_end
    }
}

/// Represents a support worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerProfile {
    /// Unique identifier for the worker.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Credentials currently on file.
    #[serde(default)]
    pub credentials: Vec<Credential>,
    /// Personal fortnightly hour cap, overriding the rule default when set.
    #[serde(default)]
    pub max_fortnightly_hours: Option<Decimal>,
    /// Self-identified gender, if recorded.
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Declared weekly availability. Empty means available at any time.
    #[serde(default)]
    pub availability: Vec<AvailabilityWindow>,
    /// Specific dates the worker cannot work (leave, appointments).
    #[serde(default)]
    pub unavailable_dates: Vec<NaiveDate>,
    /// Where the worker travels from.
    #[serde(default)]
    pub home_location: Option<GeoPoint>,
    /// The furthest the worker has agreed to travel, in kilometres.
    #[serde(default)]
    pub max_travel_km: Option<f64>,
    /// Shifts already rostered outside the batch being validated.
    #[serde(default)]
    pub history: Vec<ShiftCandidate>,
}

impl WorkerProfile {
    /// Creates a profile with no credentials, limits or history.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            credentials: Vec::new(),
            max_fortnightly_hours: None,
            gender: None,
            availability: Vec::new(),
            unavailable_dates: Vec::new(),
            home_location: None,
            max_travel_km: None,
            history: Vec::new(),
        }
    }

    /// Status of `credential_type` on `on_date`.
    ///
    /// When several credentials of the same type are on file, the one that
    /// lasts longest wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_compliance::models::{Credential, CredentialStatus, WorkerProfile};
    /// use chrono::NaiveDate;
    ///
    /// let mut worker = WorkerProfile::new("w_001");
    /// worker.credentials.push(Credential {
    ///     credential_type: "first_aid".to_string(),
    ///     expires_on: Some(NaiveDate::from_ymd_opt(2026, 2, 4).unwrap()),
    /// });
    ///
    /// let shift_date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    /// assert_eq!(
    ///     worker.credential_status("first_aid", shift_date, 30),
    ///     CredentialStatus::ExpiringSoon {
    ///         expires_on: NaiveDate::from_ymd_opt(2026, 2, 4).unwrap(),
    ///         days_remaining: 20,
    ///     }
    /// );
    /// assert_eq!(
    ///     worker.credential_status("police_check", shift_date, 30),
    ///     CredentialStatus::Missing
    /// );
    /// ```
    pub fn credential_status(
        &self,
        credential_type: &str,
        on_date: NaiveDate,
        warning_days: i64,
    ) -> CredentialStatus {
        let best = self
            .credentials
            .iter()
            .filter(|c| c.credential_type == credential_type)
            .max_by_key(|c| c.expires_on.unwrap_or(NaiveDate::MAX));

        let Some(credential) = best else {
            return CredentialStatus::Missing;
        };

        match credential.expires_on {
            None => CredentialStatus::Valid,
            Some(expires_on) if expires_on < on_date => CredentialStatus::Expired { expires_on },
            Some(expires_on) => {
                let days_remaining = (expires_on - on_date).num_days();
                if days_remaining <= warning_days {
                    CredentialStatus::ExpiringSoon {
                        expires_on,
                        days_remaining,
                    }
                } else {
                    CredentialStatus::Valid
                }
            }
        }
    }

    /// Returns true if the worker has declared availability covering `range`.
    pub fn is_available_for(&self, range: &TimeRange) -> bool {
        if range
            .dates()
            .iter()
            .any(|date| self.unavailable_dates.contains(date))
        {
            return false;
        }
        self.availability.is_empty() || self.availability.iter().any(|w| w.covers(range))
    }
}
