//! HTTP request handlers for the roster compliance API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{RuleType, ShiftCandidate, ValidationResult};
use crate::store::{RuleStore, load_context};
use crate::timing::{hours_info, today};
use crate::validation::{ValidationOptions, validate_roster};

use super::request::{HoursQuery, RulesQuery, ValidationRequest};
use super::response::{
    ApiError, ApiErrorResponse, RuleSummary, RulesResponse, ValidationResponse,
    WorkerHoursResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/rostering/validate", post(validate_handler))
        .route("/rostering/rules", get(rules_handler))
        .route("/workers/:id/hours", get(worker_hours_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

/// Maps a body extraction failure to a 400 error.
fn json_rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

fn query_rejection_error(rejection: QueryRejection) -> ApiErrorResponse {
    ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
}

/// Handler for POST /rostering/validate.
///
/// Validates a batch of proposed shifts against the organisation's active
/// rules and returns conflicts, warnings and billing tags.
async fn validate_handler(
    State(state): State<AppState>,
    payload: Result<Json<ValidationRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing validation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = json_rejection_error(correlation_id, rejection);
            return ApiErrorResponse::bad_request(error).into_response();
        }
    };

    let options = request.options();
    let shifts: Vec<ShiftCandidate> = request.shifts.into_iter().map(Into::into).collect();

    let start_time = Instant::now();
    match run_validation(&state, &shifts, &options) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                shifts_count = shifts.len(),
                conflicts = result.conflicts.len(),
                warnings = result.warnings.len(),
                is_valid = result.is_valid,
                duration_us = start_time.elapsed().as_micros(),
                "Validation completed"
            );
            json_response(
                StatusCode::OK,
                ValidationResponse {
                    result,
                    validation_id: correlation_id,
                    validated_at: Utc::now(),
                    engine_version: env!("CARGO_PKG_VERSION").to_string(),
                },
            )
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Validation rejected"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

fn run_validation(
    state: &AppState,
    shifts: &[ShiftCandidate],
    options: &ValidationOptions,
) -> EngineResult<ValidationResult> {
    let config = state.config();
    let rules = config.list_active_rules(state.organisation_id(), None)?;
    let context = load_context(config, shifts)?;
    validate_roster(shifts, &rules, &context, options)
}

/// Handler for GET /rostering/rules.
///
/// Lists the organisation's active rules, optionally for one category.
async fn rules_handler(
    State(state): State<AppState>,
    query: Result<Query<RulesQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_rejection_error(rejection).into_response(),
    };

    let rule_type = match query.rule_type.as_deref() {
        None => None,
        Some(code) => match RuleType::from_code(code) {
            Some(rule_type) => Some(rule_type),
            None => {
                return ApiErrorResponse::bad_request(ApiError::unknown_rule_type(code))
                    .into_response();
            }
        },
    };

    match state
        .config()
        .list_active_rules(state.organisation_id(), rule_type)
    {
        Ok(rules) => json_response(
            StatusCode::OK,
            RulesResponse {
                organisation_id: state.organisation_id().to_string(),
                rules: rules.into_iter().map(RuleSummary::from).collect(),
            },
        ),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for GET /workers/:id/hours.
///
/// Returns the worker's rostered hours over the fortnight ending on the
/// reference date.
async fn worker_hours_handler(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
    query: Result<Query<HoursQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_rejection_error(rejection).into_response(),
    };

    let worker = match state.config().worker(&worker_id) {
        Ok(worker) => worker,
        Err(err) => {
            warn!(worker_id = %worker_id, "Hours requested for unknown worker");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let reference_date = query.reference_date.unwrap_or_else(today);
    json_response(
        StatusCode::OK,
        WorkerHoursResponse {
            worker_id: worker.id.clone(),
            reference_date,
            hours: hours_info(&worker.history, worker, Some(reference_date)),
        },
    )
}
