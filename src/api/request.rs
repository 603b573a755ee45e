//! Request types for the roster compliance API.
//!
//! This module defines the JSON request bodies and query strings accepted by
//! the HTTP endpoints. Wire names are camelCase.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::ShiftCandidate;
use crate::validation::ValidationOptions;

/// Request body for `POST /rostering/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    /// The proposed shifts, in the order findings should refer to them.
    pub shifts: Vec<ShiftRequest>,
    /// Evaluate only these rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_ids: Option<Vec<String>>,
    /// Return warnings as well as conflicts. Defaults to true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_warnings: Option<bool>,
    /// Anchor date for fortnightly hour windows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,
}

impl ValidationRequest {
    /// The engine options carried by this request.
    pub fn options(&self) -> ValidationOptions {
        ValidationOptions {
            include_warnings: self.include_warnings.unwrap_or(true),
            rule_ids: self.rule_ids.clone(),
            reference_date: self.reference_date,
        }
    }
}

/// One proposed shift in a validation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRequest {
    /// Identifier of an existing shift being re-validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Assigned workers.
    pub worker_ids: Vec<String>,
    /// The start time of the shift.
    pub start_time: NaiveDateTime,
    /// The end time of the shift.
    pub end_time: NaiveDateTime,
    /// The client being supported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// The site the shift takes place at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    /// Free-form shift type tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_type: Option<String>,
}

impl From<ShiftRequest> for ShiftCandidate {
    fn from(req: ShiftRequest) -> Self {
        ShiftCandidate {
            id: req.id,
            start_time: req.start_time,
            end_time: req.end_time,
            worker_ids: req.worker_ids,
            client_id: req.client_id,
            site_id: req.site_id,
            shift_type: req.shift_type,
        }
    }
}

/// Query string for `GET /rostering/rules`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesQuery {
    /// Limit the listing to one rule category, by its snake_case code.
    #[serde(rename = "type")]
    pub rule_type: Option<String>,
}

/// Query string for `GET /workers/:id/hours`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursQuery {
    /// Last day of the fortnight. Defaults to today.
    pub reference_date: Option<NaiveDate>,
}
