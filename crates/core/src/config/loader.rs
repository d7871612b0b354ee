use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides.
///
/// Nested keys are separated by a double underscore, e.g.
/// `MARQUEE_CATALOG__TMDB__API_KEY`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("MARQUEE_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    resolve_secrets(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    let config: Config =
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    resolve_secrets(config)
}

fn resolve_secrets(mut config: Config) -> Result<Config, ConfigError> {
    config.catalog.tmdb.api_key = resolve_env_ref(&config.catalog.tmdb.api_key)?;
    if let Some(appwrite) = config.trending.appwrite.as_mut() {
        if let Some(key) = appwrite.api_key.as_deref() {
            appwrite.api_key = Some(resolve_env_ref(key)?);
        }
    }
    Ok(config)
}

/// Expand a `${NAME}` value from the environment; other values pass through.
fn resolve_env_ref(value: &str) -> Result<String, ConfigError> {
    let Some(name) = value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return Ok(value.to_string());
    };

    std::env::var(name).map_err(|_| {
        ConfigError::ValidationError(format!("environment variable {} is not set", name))
    })
}
