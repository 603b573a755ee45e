//! Error types for the roster compliance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Input problems are reported through [`EngineError`] and never as
//! violations; per-rule configuration problems are converted into synthetic
//! violations by the orchestrator and only surface here transiently.

use thiserror::Error;

/// The main error type for the roster compliance engine.
///
/// # Example
///
/// ```
/// use roster_compliance::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/rules.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/rules.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The validation request contained no shifts.
    #[error("At least one shift is required for validation")]
    EmptyShiftBatch,

    /// A shift in the batch was invalid or contained inconsistent data.
    #[error("Invalid shift at index {index}: {message}")]
    InvalidShift {
        /// The position of the shift in the submitted batch.
        index: usize,
        /// A description of what made the shift invalid.
        message: String,
    },

    /// The explicit rule-id filter was malformed.
    #[error("Invalid rule filter: {message}")]
    InvalidRuleFilter {
        /// A description of the problem with the filter.
        message: String,
    },

    /// A rule's configuration payload does not match the shape implied by its type.
    #[error("Invalid configuration for rule '{rule_id}': {message}")]
    InvalidRuleConfig {
        /// The ID of the offending rule.
        rule_id: String,
        /// A description of the mismatch.
        message: String,
    },

    /// A worker was requested that has no profile.
    #[error("Worker not found: {worker_id}")]
    WorkerNotFound {
        /// The worker ID that was not found.
        worker_id: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Returns true for errors caused by the caller's input rather than configuration.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            EngineError::EmptyShiftBatch
                | EngineError::InvalidShift { .. }
                | EngineError::InvalidRuleFilter { .. }
        )
    }
}
