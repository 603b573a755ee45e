//! Application state for the roster compliance API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// Holds the organisation's loaded configuration, which doubles as the
/// reference-data store for every request. It is read-only once loaded.
#[derive(Clone)]
pub struct AppState {
    /// The loaded organisation configuration.
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// The organisation whose rules are served.
    pub fn organisation_id(&self) -> &str {
        &self.config.organisation().id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_organisation_id_comes_from_config() {
        let state = AppState::new(ConfigLoader::load("./config/demo_org").unwrap());
        assert_eq!(state.organisation_id(), "org_demo");
    }
}
