use super::{
    types::{Config, TrendingBackend},
    ConfigError,
};

const MAX_DEBOUNCE_MS: u64 = 10_000;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - TMDB API key is present
/// - Appwrite section is complete when selected
/// - Trending limit and debounce delay are in range
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.catalog.tmdb.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.tmdb.api_key is required".to_string(),
        ));
    }

    if config.trending.backend == TrendingBackend::Appwrite {
        let Some(appwrite) = &config.trending.appwrite else {
            return Err(ConfigError::ValidationError(
                "trending.appwrite is required when trending.backend = \"appwrite\"".to_string(),
            ));
        };
        for (name, value) in [
            ("endpoint", &appwrite.endpoint),
            ("project_id", &appwrite.project_id),
            ("database_id", &appwrite.database_id),
            ("collection_id", &appwrite.collection_id),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "trending.appwrite.{} cannot be empty",
                    name
                )));
            }
        }
    }

    if config.trending.limit == 0 {
        return Err(ConfigError::ValidationError(
            "trending.limit must be at least 1".to_string(),
        ));
    }

    if config.search.debounce_ms > MAX_DEBOUNCE_MS {
        return Err(ConfigError::ValidationError(format!(
            "search.debounce_ms cannot exceed {}",
            MAX_DEBOUNCE_MS
        )));
    }

    Ok(())
}
