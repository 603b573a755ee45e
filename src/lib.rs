//! Roster compliance validation engine.
//!
//! This crate checks proposed care-coordination shifts against an
//! organisation's rostering rules (award hours, safety, support
//! compliance, qualifications, organisational policy) and tags each shift
//! with a billing classification. Findings are split into blocking
//! conflicts and advisory warnings.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod rules;
pub mod store;
pub mod timing;
pub mod validation;
