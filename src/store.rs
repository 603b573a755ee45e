//! Reference data interfaces.
//!
//! The engine never fetches anything itself. Callers implement these traits
//! over whatever persistence they have (the bundled [`ConfigLoader`] reads a
//! YAML directory) and resolve an [`EvaluationContext`] with
//! [`load_context`] before validating.
//!
//! [`ConfigLoader`]: crate::config::ConfigLoader

use std::collections::HashMap;

use crate::error::EngineResult;
use crate::models::{ClientProfile, HolidayCalendar, RosteringRule, RuleType, ShiftCandidate, Site, WorkerProfile};
use crate::rules::EvaluationContext;

/// Source of rule definitions.
pub trait RuleStore {
    /// Active rules for an organisation, optionally limited to one category.
    fn list_active_rules(
        &self,
        organisation_id: &str,
        rule_type: Option<RuleType>,
    ) -> EngineResult<Vec<RosteringRule>>;
}

/// Source of worker profiles, including credentials, availability and history.
pub trait WorkerStore {
    /// Profiles for the requested ids. Unknown ids are simply absent.
    fn get_workers(&self, worker_ids: &[String]) -> EngineResult<HashMap<String, WorkerProfile>>;
}

/// Source of client profiles.
pub trait ClientStore {
    /// Profiles for the requested ids. Unknown ids are simply absent.
    fn get_clients(&self, client_ids: &[String]) -> EngineResult<HashMap<String, ClientProfile>>;
}

/// Source of site records.
pub trait SiteStore {
    /// Sites for the requested ids. Unknown ids are simply absent.
    fn get_sites(&self, site_ids: &[String]) -> EngineResult<HashMap<String, Site>>;
}

/// Source of the public holiday calendar.
pub trait HolidayStore {
    /// The holidays observed by the organisation.
    fn public_holidays(&self) -> EngineResult<HolidayCalendar>;
}

/// Resolves everything a batch refers to into an [`EvaluationContext`].
///
/// Client and site ids are gathered from the batch and from the history of
/// every worker found, so travel and location checks against prior shifts
/// have what they need. Preferred workers of the clients involved are
/// loaded too, for the overlooked-preference check.
pub fn load_context<S>(store: &S, shifts: &[ShiftCandidate]) -> EngineResult<EvaluationContext>
where
    S: WorkerStore + ClientStore + SiteStore + HolidayStore + ?Sized,
{
    let worker_ids = distinct(shifts.iter().flat_map(|s| s.worker_ids.iter()));
    let mut workers = store.get_workers(&worker_ids)?;

    let related: Vec<&ShiftCandidate> = shifts
        .iter()
        .chain(
            worker_ids
                .iter()
                .filter_map(|id| workers.get(id))
                .flat_map(|w| w.history.iter()),
        )
        .collect();
    let client_ids = distinct(related.iter().filter_map(|s| s.client_id.as_ref()));
    let site_ids = distinct(related.iter().filter_map(|s| s.site_id.as_ref()));
    let clients = store.get_clients(&client_ids)?;
    let sites = store.get_sites(&site_ids)?;

    let preferred = distinct(
        client_ids
            .iter()
            .filter_map(|id| clients.get(id))
            .flat_map(|c| c.preferred_worker_ids.iter())
            .filter(|id| !workers.contains_key(*id)),
    );
    if !preferred.is_empty() {
        workers.extend(store.get_workers(&preferred)?);
    }

    Ok(EvaluationContext {
        clients,
        sites,
        holidays: store.public_holidays()?,
        workers,
    })
}

fn distinct<'a>(ids: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for id in ids {
        if !out.contains(id) {
            out.push(id.clone());
        }
    }
    out
}
