//! View state and error types for the search flow.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{CatalogError, MovieSummary};
use crate::trending::TrendingRecord;

/// Message shown when a search has no matches.
pub const NO_MOVIES_FOUND: &str = "No movies found.";

/// Message shown when the catalog cannot be reached.
pub const FETCH_FAILED: &str = "Error fetching movies: Please try again later.";

/// Why a search produced no list.
#[derive(Debug, Error)]
pub enum SearchFailure {
    #[error("catalog request failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("no movies found")]
    NoResults,
}

impl SearchFailure {
    /// Human-readable message for the results panel.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Catalog(_) => FETCH_FAILED,
            Self::NoResults => NO_MOVIES_FOUND,
        }
    }
}

/// State of the results panel.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SearchView {
    /// Query of the most recently issued search.
    pub query: String,
    /// A search for `query` is in flight.
    pub loading: bool,
    pub movies: Vec<MovieSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Sequence number of the most recently issued search.
    pub generation: u64,
}

impl SearchView {
    /// Mark a new search as issued. The previous list stays visible.
    pub fn begin(&mut self, query: &str, generation: u64) {
        self.query = query.to_string();
        self.loading = true;
        self.error_message = None;
        self.generation = generation;
    }

    /// Apply the outcome of the current search.
    pub fn complete(&mut self, result: Result<Vec<MovieSummary>, SearchFailure>) {
        self.loading = false;
        match result {
            Ok(movies) => {
                self.movies = movies;
                self.error_message = None;
            }
            Err(failure) => {
                self.movies.clear();
                self.error_message = Some(failure.user_message().to_string());
            }
        }
    }
}

/// State of the trending panel.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TrendingView {
    pub loading: bool,
    pub records: Vec<TrendingRecord>,
}

/// Everything a client renders.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SessionView {
    pub search: SearchView,
    pub trending: TrendingView,
}
