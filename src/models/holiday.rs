//! Public holiday calendar.
//!
//! The calendar feeds billing classification: a shift starting on a public
//! holiday observed in the organisation's region is tagged as a holiday shift.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The region code for holidays observed everywhere.
pub const NATIONAL_REGION: &str = "national";

/// Represents a public holiday.
///
/// Public holidays are tracked per region to support state-specific
/// holidays in Australia.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// The date of the public holiday.
    pub date: NaiveDate,
    /// The name of the public holiday (e.g., "Australia Day").
    pub name: String,
    /// The region where this holiday applies (e.g., "national", "VIC", "NSW").
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    NATIONAL_REGION.to_string()
}

/// The set of public holidays observed by one organisation.
///
/// # Example
///
/// ```
/// use roster_compliance::models::{HolidayCalendar, PublicHoliday};
/// use chrono::NaiveDate;
///
/// let calendar = HolidayCalendar {
///     region: Some("VIC".to_string()),
///     holidays: vec![
///         PublicHoliday {
///             date: NaiveDate::from_ymd_opt(2026, 1, 26).unwrap(),
///             name: "Australia Day".to_string(),
///             region: "national".to_string(),
///         },
///         PublicHoliday {
///             date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
///             name: "Labour Day".to_string(),
///             region: "VIC".to_string(),
///         },
///         PublicHoliday {
///             date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///             name: "Labour Day".to_string(),
///             region: "WA".to_string(),
///         },
///     ],
/// };
///
/// assert!(calendar.is_public_holiday(NaiveDate::from_ymd_opt(2026, 1, 26).unwrap()));
/// assert!(calendar.is_public_holiday(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()));
/// assert!(!calendar.is_public_holiday(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    /// The organisation's region. When absent only national holidays apply.
    #[serde(default)]
    pub region: Option<String>,
    /// Known holidays across all regions.
    #[serde(default)]
    pub holidays: Vec<PublicHoliday>,
}

impl HolidayCalendar {
    /// Returns the holiday observed on `date`, if any.
    pub fn holiday_on(&self, date: NaiveDate) -> Option<&PublicHoliday> {
        self.holidays
            .iter()
            .filter(|h| h.date == date)
            .find(|h| self.observes(&h.region))
    }

    /// Checks if a given date is a public holiday observed in this calendar's region.
    pub fn is_public_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_on(date).is_some()
    }

    fn observes(&self, region: &str) -> bool {
        region.eq_ignore_ascii_case(NATIONAL_REGION)
            || self
                .region
                .as_deref()
                .is_some_and(|own| own.eq_ignore_ascii_case(region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holiday(date: NaiveDate, name: &str, region: &str) -> PublicHoliday {
        PublicHoliday {
            date,
            name: name.to_string(),
            region: region.to_string(),
        }
    }

    fn christmas_calendar(region: Option<&str>) -> HolidayCalendar {
        HolidayCalendar {
            region: region.map(str::to_string),
            holidays: vec![
                holiday(
                    NaiveDate::from_ymd_opt(2026, 12, 25).unwrap(),
                    "Christmas Day",
                    "national",
                ),
                holiday(
                    NaiveDate::from_ymd_opt(2026, 12, 24).unwrap(),
                    "Christmas Eve (part day)",
                    "SA",
                ),
            ],
        }
    }

    #[test]
    fn test_national_holiday_observed_without_region() {
        let calendar = christmas_calendar(None);
        assert!(calendar.is_public_holiday(NaiveDate::from_ymd_opt(2026, 12, 25).unwrap()));
        assert!(!calendar.is_public_holiday(NaiveDate::from_ymd_opt(2026, 12, 24).unwrap()));
    }

    #[test]
    fn test_regional_holiday_observed_in_matching_region() {
        let calendar = christmas_calendar(Some("sa"));
        let holiday = calendar
            .holiday_on(NaiveDate::from_ymd_opt(2026, 12, 24).unwrap())
            .unwrap();
        assert_eq!(holiday.name, "Christmas Eve (part day)");
    }

    #[test]
    fn test_ordinary_day_is_not_holiday() {
        let calendar = christmas_calendar(Some("SA"));
        assert!(!calendar.is_public_holiday(NaiveDate::from_ymd_opt(2026, 12, 23).unwrap()));
    }

    #[test]
    fn test_deserialize_holiday_defaults_to_national() {
        let json = r#"{ "date": "2026-01-26", "name": "Australia Day" }"#;
        let holiday: PublicHoliday = serde_json::from_str(json).unwrap();
        assert_eq!(holiday.region, NATIONAL_REGION);
    }
}
