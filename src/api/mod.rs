//! HTTP API module for the roster compliance engine.
//!
//! This module provides the REST endpoints for validating proposed rosters,
//! listing an organisation's rules and reporting a worker's fortnightly hours.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{HoursQuery, RulesQuery, ShiftRequest, ValidationRequest};
pub use response::{
    ApiError, ApiErrorResponse, RuleSummary, RulesResponse, ValidationResponse,
    WorkerHoursResponse,
};
pub use state::AppState;
