//! Configuration file shapes.
//!
//! Each YAML file in an organisation directory deserializes into one of
//! these wrappers; the loader unpacks them into lookup maps.

use serde::Deserialize;

use crate::models::{ClientProfile, PublicHoliday, RosteringRule, Site, WorkerProfile};

/// Metadata about the organisation (`organisation.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct OrganisationMetadata {
    /// The organisation's identifier; rules are scoped to it.
    pub id: String,
    /// The human-readable name of the organisation.
    pub name: String,
    /// State or territory code used to pick regional public holidays.
    #[serde(default)]
    pub region: Option<String>,
}

/// `rules.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RulesFile {
    /// Rule definitions in evaluation order.
    pub rules: Vec<RosteringRule>,
}

/// `workers.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkersFile {
    /// Worker profiles.
    pub workers: Vec<WorkerProfile>,
}

/// `clients.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientsFile {
    /// Client profiles.
    pub clients: Vec<ClientProfile>,
}

/// `sites.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SitesFile {
    /// Sites.
    #[serde(default)]
    pub sites: Vec<Site>,
}

/// `holidays.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidaysFile {
    /// Public holidays across all regions.
    #[serde(default)]
    pub holidays: Vec<PublicHoliday>,
}
