//! Trending searches - a counter of how often each search term was used.
//!
//! Every successful search bumps the counter for its (normalized) term and
//! remembers the top result's poster, so the trending panel can show the
//! most searched movies.

mod appwrite;
mod sqlite;
mod tracker;
mod types;

pub use appwrite::AppwriteTrendingStore;
pub use sqlite::SqliteTrendingStore;
pub use tracker::TrendingTracker;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from trending store backends.
#[derive(Debug, Error)]
pub enum TrendingError {
    /// Local database error.
    #[error("Database error: {0}")]
    Database(String),

    /// HTTP request to the document store failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Document store returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse a document store response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The term is empty after normalization.
    #[error("Invalid search term: {0:?}")]
    InvalidTerm(String),
}

/// Trait for trending store backends.
#[async_trait]
pub trait TrendingStore: Send + Sync {
    /// Increment the counter for `term`, creating the record on first use.
    ///
    /// A newly created record takes its poster metadata from `movie`;
    /// existing records keep theirs. Returns the record after the update.
    async fn record_search(
        &self,
        term: &str,
        movie: &TrendingMovie,
    ) -> Result<TrendingRecord, TrendingError>;

    /// Records with the highest counts, descending, at most `limit`.
    async fn top(&self, limit: u32) -> Result<Vec<TrendingRecord>, TrendingError>;

    /// Look up a single record by term.
    async fn get(&self, term: &str) -> Result<Option<TrendingRecord>, TrendingError>;
}
