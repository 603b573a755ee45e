//! Response types for the roster compliance API.
//!
//! This module defines the success bodies, the error response structure and
//! the mapping from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{RosteringRule, RuleType, ValidationResult};
use crate::timing::HoursInfo;

/// Body of a successful `POST /rostering/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    /// The validation outcome.
    #[serde(flatten)]
    pub result: ValidationResult,
    /// Identifier of this validation run, also used as the log correlation id.
    pub validation_id: Uuid,
    /// When the validation ran.
    pub validated_at: DateTime<Utc>,
    /// Version of the engine that produced the result.
    pub engine_version: String,
}

/// One rule in the rule listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSummary {
    /// Rule id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description for rule authors.
    pub description: String,
    /// Rule category.
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    /// Raw configuration as stored.
    pub config: serde_json::Value,
    /// Whether the rule is evaluated.
    pub is_active: bool,
}

impl From<RosteringRule> for RuleSummary {
    fn from(rule: RosteringRule) -> Self {
        Self {
            id: rule.id,
            name: rule.name,
            description: rule.description,
            rule_type: rule.rule_type,
            config: rule.config,
            is_active: rule.is_active,
        }
    }
}

/// Body of `GET /rostering/rules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesResponse {
    /// The organisation the rules belong to.
    pub organisation_id: String,
    /// Active rules in evaluation order.
    pub rules: Vec<RuleSummary>,
}

/// Body of `GET /workers/:id/hours`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerHoursResponse {
    /// The worker.
    pub worker_id: String,
    /// Last day of the fortnight the totals cover.
    pub reference_date: NaiveDate,
    /// Fortnightly totals.
    #[serde(flatten)]
    pub hours: HoursInfo,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an unknown rule type error response.
    pub fn unknown_rule_type(code: &str) -> Self {
        Self::with_details(
            "VALIDATION_ERROR",
            format!("Unknown rule type: {}", code),
            format!(
                "Expected one of: {}",
                RuleType::ALL.map(|t| t.code()).join(", ")
            ),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::EmptyShiftBatch => ApiErrorResponse::bad_request(ApiError::new(
                "EMPTY_SHIFT_BATCH",
                "At least one shift is required for validation",
            )),
            EngineError::InvalidShift { index, message } => {
                ApiErrorResponse::bad_request(ApiError::with_details(
                    "INVALID_SHIFT",
                    format!("Invalid shift at index {}: {}", index, message),
                    "The shift data contains invalid information",
                ))
            }
            EngineError::InvalidRuleFilter { message } => {
                ApiErrorResponse::bad_request(ApiError::with_details(
                    "INVALID_RULE_FILTER",
                    format!("Invalid rule filter: {}", message),
                    "ruleIds must be distinct, non-blank rule ids",
                ))
            }
            EngineError::InvalidRuleConfig { rule_id, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "INVALID_RULE_CONFIG",
                    format!("Rule '{}' has an invalid configuration", rule_id),
                    message,
                ),
            },
            EngineError::WorkerNotFound { worker_id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new(
                    "WORKER_NOT_FOUND",
                    format!("Worker not found: {}", worker_id),
                ),
            },
        }
    }
}
