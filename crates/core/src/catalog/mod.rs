//! Movie catalog integration.
//!
//! The catalog answers two kinds of queries: a free-text title search and
//! a "popular right now" discover listing used when the search box is empty.

mod tmdb;
mod types;

pub use tmdb::{TmdbClient, TmdbConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when querying the movie catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The catalog rejected the credentials.
    #[error("Catalog rejected the API key")]
    Unauthorized,

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for movie catalog clients.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Run a single catalog request for the given query.
    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<MovieSummary>, CatalogError>;

    /// Absolute poster URL for a movie, if it has a poster.
    fn poster_url(&self, movie: &MovieSummary) -> Option<String>;
}
