//! Configuration loading for the roster compliance engine.
//!
//! This module loads one organisation's rules and reference data (workers,
//! clients, sites and public holidays) from a directory of YAML files.
//!
//! # Example
//!
//! ```no_run
//! use roster_compliance::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/demo_org").unwrap();
//! println!("Loaded organisation: {}", config.organisation().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{ClientsFile, HolidaysFile, OrganisationMetadata, RulesFile, SitesFile, WorkersFile};
