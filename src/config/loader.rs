//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading an
//! organisation's rules and reference data from YAML files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{ClientProfile, HolidayCalendar, RosteringRule, RuleType, Site, WorkerProfile};
use crate::rules::RuleConfig;
use crate::store::{ClientStore, HolidayStore, RuleStore, SiteStore, WorkerStore};

use super::types::{ClientsFile, HolidaysFile, OrganisationMetadata, RulesFile, SitesFile, WorkersFile};

/// Loads and provides access to one organisation's configuration.
///
/// The `ConfigLoader` reads YAML files from a directory and serves them
/// through the [`store`](crate::store) traits.
///
/// # Directory Structure
///
/// ```text
/// config/demo_org/
/// ├── organisation.yaml  # Organisation id, name and region
/// ├── rules.yaml         # Rostering rules
/// ├── workers.yaml       # Worker profiles with credentials and history
/// ├── clients.yaml       # Client profiles
/// ├── sites.yaml         # Sites
/// └── holidays.yaml      # Public holidays across regions
/// ```
///
/// # Example
///
/// ```no_run
/// use roster_compliance::config::ConfigLoader;
/// use roster_compliance::store::RuleStore;
///
/// let loader = ConfigLoader::load("./config/demo_org").unwrap();
/// let rules = loader.list_active_rules(&loader.organisation().id, None).unwrap();
/// println!("{} active rules", rules.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    organisation: OrganisationMetadata,
    rules: Vec<RosteringRule>,
    workers: HashMap<String, WorkerProfile>,
    clients: HashMap<String, ClientProfile>,
    sites: HashMap<String, Site>,
    holidays: HolidayCalendar,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing ([`EngineError::ConfigNotFound`])
    /// - Any file contains invalid YAML or a duplicated id
    ///   ([`EngineError::ConfigParseError`])
    ///
    /// Rule payloads are parsed up front and malformed ones logged, but they
    /// are kept: such a rule surfaces as a configuration-error violation each
    /// time it is evaluated.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let organisation = Self::load_yaml::<OrganisationMetadata>(&path.join("organisation.yaml"))?;

        let mut rules = Self::load_yaml::<RulesFile>(&path.join("rules.yaml"))?.rules;
        for rule in rules.iter_mut().filter(|r| r.organisation_id.is_empty()) {
            rule.organisation_id = organisation.id.clone();
        }
        for rule in rules.iter().filter(|r| r.is_active) {
            if let Err(err) = RuleConfig::from_rule(rule) {
                warn!(rule_id = %rule.id, error = %err, "Active rule has a malformed configuration");
            }
        }

        let workers_path = path.join("workers.yaml");
        let mut workers = Self::load_yaml::<WorkersFile>(&workers_path)?.workers;
        for worker in &mut workers {
            for shift in worker.history.iter_mut().filter(|s| s.worker_ids.is_empty()) {
                shift.worker_ids.push(worker.id.clone());
            }
        }
        let workers = Self::index(&workers_path, workers, |w| &w.id)?;

        let clients_path = path.join("clients.yaml");
        let clients = Self::load_yaml::<ClientsFile>(&clients_path)?.clients;
        let clients = Self::index(&clients_path, clients, |c| &c.id)?;

        let sites_path = path.join("sites.yaml");
        let sites = Self::load_yaml::<SitesFile>(&sites_path)?.sites;
        let sites = Self::index(&sites_path, sites, |s| &s.id)?;

        let holidays = HolidayCalendar {
            region: organisation.region.clone(),
            holidays: Self::load_yaml::<HolidaysFile>(&path.join("holidays.yaml"))?.holidays,
        };

        Ok(Self {
            organisation,
            rules,
            workers,
            clients,
            sites,
            holidays,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Builds an id lookup, rejecting duplicate ids.
    fn index<T>(
        path: &Path,
        items: Vec<T>,
        id_of: impl Fn(&T) -> &String,
    ) -> EngineResult<HashMap<String, T>> {
        let mut map = HashMap::with_capacity(items.len());
        for item in items {
            let id = id_of(&item).clone();
            if map.contains_key(&id) {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!("duplicate id '{}'", id),
                });
            }
            map.insert(id, item);
        }
        Ok(map)
    }

    /// Returns the organisation metadata.
    pub fn organisation(&self) -> &OrganisationMetadata {
        &self.organisation
    }

    /// All rules in file order, active or not.
    pub fn rules(&self) -> &[RosteringRule] {
        &self.rules
    }

    /// Gets a worker profile by id.
    ///
    /// Returns [`EngineError::WorkerNotFound`] for unknown ids.
    pub fn worker(&self, worker_id: &str) -> EngineResult<&WorkerProfile> {
        self.workers
            .get(worker_id)
            .ok_or_else(|| EngineError::WorkerNotFound {
                worker_id: worker_id.to_string(),
            })
    }
}

impl RuleStore for ConfigLoader {
    fn list_active_rules(
        &self,
        organisation_id: &str,
        rule_type: Option<RuleType>,
    ) -> EngineResult<Vec<RosteringRule>> {
        Ok(self
            .rules
            .iter()
            .filter(|r| r.is_active && r.organisation_id == organisation_id)
            .filter(|r| rule_type.is_none_or(|t| r.rule_type == t))
            .cloned()
            .collect())
    }
}

impl WorkerStore for ConfigLoader {
    fn get_workers(&self, worker_ids: &[String]) -> EngineResult<HashMap<String, WorkerProfile>> {
        Ok(pick(&self.workers, worker_ids))
    }
}

impl ClientStore for ConfigLoader {
    fn get_clients(&self, client_ids: &[String]) -> EngineResult<HashMap<String, ClientProfile>> {
        Ok(pick(&self.clients, client_ids))
    }
}

impl SiteStore for ConfigLoader {
    fn get_sites(&self, site_ids: &[String]) -> EngineResult<HashMap<String, Site>> {
        Ok(pick(&self.sites, site_ids))
    }
}

impl HolidayStore for ConfigLoader {
    fn public_holidays(&self) -> EngineResult<HolidayCalendar> {
        Ok(self.holidays.clone())
    }
}

fn pick<T: Clone>(map: &HashMap<String, T>, ids: &[String]) -> HashMap<String, T> {
    ids.iter()
        .filter_map(|id| map.get(id).map(|item| (id.clone(), item.clone())))
        .collect()
}
