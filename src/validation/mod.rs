//! Validation pipeline for the roster compliance engine.
//!
//! [`validate_shifts`] is the library entry point: it checks the input,
//! dispatches every selected rule to its evaluator and returns the merged
//! violations. [`validate_roster`] additionally classifies them into
//! conflicts and warnings and attaches billing tags.

mod classifier;
mod input;
mod orchestrator;

pub use classifier::classify;
pub use input::{validate_batch, validate_rule_filter};
pub use orchestrator::{ValidationOptions, validate_roster, validate_shifts};
