use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use marquee_core::{Config, SanitizedConfig, SearchCoordinator};

/// Shared application state
pub struct AppState {
    config: Config,
    coordinator: Arc<SearchCoordinator>,
}

impl AppState {
    pub fn new(config: Config, coordinator: Arc<SearchCoordinator>) -> Self {
        Self {
            config,
            coordinator,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn coordinator(&self) -> &Arc<SearchCoordinator> {
        &self.coordinator
    }

    /// Keystroke debounce applied to WebSocket sessions.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.config.search.debounce_ms)
    }

    /// Directory served for non-API paths.
    pub fn web_dir(&self) -> &Path {
        &self.config.server.web_dir
    }
}
