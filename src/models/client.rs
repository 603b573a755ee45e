//! Client profile model.

use serde::{Deserialize, Serialize};

use super::{Gender, GeoPoint};

/// A client's preference about the gender of their support workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderPreference {
    /// The preferred gender.
    pub gender: Gender,
    /// Strict preferences block the roster; soft ones only warn.
    #[serde(default)]
    pub strict: bool,
}

/// Represents a client receiving support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    /// Unique identifier for the client.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Credentials every worker supporting this client must hold.
    #[serde(default)]
    pub required_credentials: Vec<String>,
    /// The client has a behaviour support plan in place.
    #[serde(default)]
    pub behaviour_support_plan: bool,
    /// Shifts with this client are treated as high risk.
    #[serde(default)]
    pub high_risk: bool,
    /// Gender preference for support workers, if any.
    #[serde(default)]
    pub gender_preference: Option<GenderPreference>,
    /// Workers who must never be rostered with this client.
    #[serde(default)]
    pub banned_worker_ids: Vec<String>,
    /// Workers the client prefers, in order of preference.
    #[serde(default)]
    pub preferred_worker_ids: Vec<String>,
    /// Minimum number of concurrent workers for every shift.
    #[serde(default)]
    pub min_workers: Option<u32>,
    /// Where support is usually delivered.
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

impl ClientProfile {
    /// Creates a client with no requirements or preferences.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            required_credentials: Vec::new(),
            behaviour_support_plan: false,
            high_risk: false,
            gender_preference: None,
            banned_worker_ids: Vec::new(),
            preferred_worker_ids: Vec::new(),
            min_workers: None,
            location: None,
        }
    }

    /// Returns true if the worker is banned from this client.
    pub fn bans(&self, worker_id: &str) -> bool {
        self.banned_worker_ids.iter().any(|id| id == worker_id)
    }

    /// Returns true if the worker is on the client's preferred list.
    pub fn prefers(&self, worker_id: &str) -> bool {
        self.preferred_worker_ids.iter().any(|id| id == worker_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bans_and_prefers() {
        let mut client = ClientProfile::new("c_001");
        client.banned_worker_ids.push("w_002".to_string());
        client.preferred_worker_ids.push("w_003".to_string());

        assert!(client.bans("w_002"));
        assert!(!client.bans("w_003"));
        assert!(client.prefers("w_003"));
        assert!(!client.prefers("w_001"));
    }

    #[test]
    fn test_deserialize_client_defaults() {
        let json = r#"{ "id": "c_001" }"#;
        let client: ClientProfile = serde_json::from_str(json).unwrap();
        assert!(!client.behaviour_support_plan);
        assert!(client.gender_preference.is_none());
        assert!(client.min_workers.is_none());
    }

    #[test]
    fn test_deserialize_gender_preference() {
        let json = r#"{
            "id": "c_001",
            "gender_preference": { "gender": "female", "strict": true },
            "min_workers": 2
        }"#;
        let client: ClientProfile = serde_json::from_str(json).unwrap();
        let preference = client.gender_preference.unwrap();
        assert_eq!(preference.gender, Gender::Female);
        assert!(preference.strict);
        assert_eq!(client.min_workers, Some(2));
    }
}
