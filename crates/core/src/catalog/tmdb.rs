//! TMDB (The Movie Database) API client.
//!
//! Authenticates with a v4 read access token sent as a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{poster_url, CatalogQuery, MovieSummary};
use super::{CatalogError, MovieCatalog};

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB read access token (required).
    /// Can use ${ENV_VAR} syntax to read from environment.
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Image base URL for posters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl TmdbConfig {
    /// Configured image base URL, or the public TMDB image host.
    pub fn image_base_url(&self) -> &str {
        self.image_base_url.as_deref().unwrap_or(DEFAULT_IMAGE_BASE_URL)
    }
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    image_base_url: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let image_base_url = config.image_base_url().to_string();

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            image_base_url,
        })
    }

    /// Full request URL for a query.
    pub fn request_url(&self, query: &CatalogQuery) -> String {
        format!("{}{}", self.base_url, query.path_and_query())
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<MovieSummary>, CatalogError> {
        let url = self.request_url(query);

        debug!("TMDB {} request: {}", query.mode(), url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(CatalogError::Unauthorized);
        }
        if status == 429 {
            return Err(CatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let list: TmdbListResponse = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse movie list response: {}", e))
        })?;

        debug!(
            "TMDB {} returned {} of {:?} results",
            query.mode(),
            list.results.len(),
            list.total_results
        );

        Ok(list.results.into_iter().map(Into::into).collect())
    }

    fn poster_url(&self, movie: &MovieSummary) -> Option<String> {
        poster_url(&self.image_base_url, movie.poster_path.as_deref())
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbListResponse {
    #[serde(default)]
    results: Vec<TmdbMovieResult>,
    total_results: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieResult {
    id: u64,
    title: String,
    poster_path: Option<String>,
    popularity: Option<f64>,
    release_date: Option<String>,
    vote_average: Option<f32>,
    original_language: Option<String>,
    overview: Option<String>,
}

impl From<TmdbMovieResult> for MovieSummary {
    fn from(r: TmdbMovieResult) -> Self {
        Self {
            id: r.id,
            title: r.title,
            poster_path: r.poster_path,
            popularity: r.popularity,
            // TMDB sends "" for unknown dates
            release_date: r.release_date.filter(|d| !d.is_empty()),
            vote_average: r.vote_average,
            original_language: r.original_language,
            overview: r.overview,
        }
    }
}
