use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::catalog::{TmdbConfig, POSTER_SIZE};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub trending: TrendingConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the static browser page.
    #[serde(default = "default_web_dir")]
    pub web_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            web_dir: default_web_dir(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

fn default_web_dir() -> PathBuf {
    PathBuf::from("crates/server/web")
}

/// Movie catalog configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    pub tmdb: TmdbConfig,
}

/// Trending searches configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrendingConfig {
    #[serde(default)]
    pub backend: TrendingBackend,
    /// Number of records shown in the trending panel.
    #[serde(default = "default_trending_limit")]
    pub limit: u32,
    #[serde(default)]
    pub sqlite: SqliteTrendingConfig,
    /// Required when backend = "appwrite"
    #[serde(default)]
    pub appwrite: Option<AppwriteConfig>,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            backend: TrendingBackend::default(),
            limit: default_trending_limit(),
            sqlite: SqliteTrendingConfig::default(),
            appwrite: None,
        }
    }
}

fn default_trending_limit() -> u32 {
    5
}

/// Available trending store backends
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendingBackend {
    #[default]
    Sqlite,
    Appwrite,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqliteTrendingConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for SqliteTrendingConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("marquee.db")
}

/// Appwrite document collection holding trending records
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppwriteConfig {
    /// API endpoint (e.g., "https://cloud.appwrite.io/v1")
    #[serde(default = "default_appwrite_endpoint")]
    pub endpoint: String,
    pub project_id: String,
    /// Server API key; optional when the collection allows guest access.
    /// Can use ${ENV_VAR} syntax to read from environment.
    #[serde(default)]
    pub api_key: Option<String>,
    pub database_id: String,
    pub collection_id: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_appwrite_endpoint() -> String {
    "https://cloud.appwrite.io/v1".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Search behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Keystroke debounce delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub catalog: SanitizedCatalogConfig,
    pub trending: SanitizedTrendingConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Prefix for `poster_path` values in search results.
    pub poster_base_url: String,
    pub api_key_configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTrendingConfig {
    pub backend: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appwrite: Option<SanitizedAppwriteConfig>,
}

/// Sanitized Appwrite config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            catalog: SanitizedCatalogConfig {
                base_url: config.catalog.tmdb.base_url.clone(),
                poster_base_url: format!(
                    "{}/{}",
                    config.catalog.tmdb.image_base_url().trim_end_matches('/'),
                    POSTER_SIZE
                ),
                api_key_configured: !config.catalog.tmdb.api_key.is_empty(),
            },
            trending: SanitizedTrendingConfig {
                backend: match config.trending.backend {
                    TrendingBackend::Sqlite => "sqlite".to_string(),
                    TrendingBackend::Appwrite => "appwrite".to_string(),
                },
                limit: config.trending.limit,
                appwrite: config
                    .trending
                    .appwrite
                    .as_ref()
                    .map(|a| SanitizedAppwriteConfig {
                        endpoint: a.endpoint.clone(),
                        project_id: a.project_id.clone(),
                        database_id: a.database_id.clone(),
                        collection_id: a.collection_id.clone(),
                        api_key_configured: a.api_key.as_ref().is_some_and(|k| !k.is_empty()),
                    }),
            },
            search: config.search.clone(),
        }
    }
}
