//! Mock movie catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::catalog::{poster_url, CatalogError, CatalogQuery, MovieCatalog, MovieSummary};

/// Image base URL used by [`MockMovieCatalog::poster_url`].
pub const MOCK_IMAGE_BASE_URL: &str = "https://image.test";

/// Mock implementation of the MovieCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Popular listing sorted by popularity, title search by substring
/// - Track queries for assertions
/// - Per-term response delays, to reorder completions
/// - Simulate failures
#[derive(Debug, Default)]
pub struct MockMovieCatalog {
    movies: Arc<RwLock<Vec<MovieSummary>>>,
    queries: Arc<RwLock<Vec<CatalogQuery>>>,
    /// Delay keyed by search term; "" is the popular listing.
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl MockMovieCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all movies.
    pub async fn set_movies(&self, movies: Vec<MovieSummary>) {
        *self.movies.write().await = movies;
    }

    /// Add one movie.
    pub async fn add_movie(&self, movie: MovieSummary) {
        self.movies.write().await.push(movie);
    }

    /// Delay responses for `term` ("" for the popular listing).
    pub async fn set_delay(&self, term: &str, delay: Duration) {
        self.delays.write().await.insert(term.to_string(), delay);
    }

    /// Configure the next request to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all recorded queries, in request order.
    pub async fn recorded_queries(&self) -> Vec<CatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of requests performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Clear recorded queries.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
    }
}

#[async_trait]
impl MovieCatalog for MockMovieCatalog {
    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<MovieSummary>, CatalogError> {
        self.queries.write().await.push(query.clone());

        let delay = self
            .delays
            .read()
            .await
            .get(query.term().unwrap_or(""))
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let movies = self.movies.read().await;
        let results = match query {
            CatalogQuery::Popular => {
                let mut popular = movies.clone();
                popular.sort_by(|a, b| {
                    b.popularity
                        .unwrap_or(0.0)
                        .total_cmp(&a.popularity.unwrap_or(0.0))
                });
                popular
            }
            CatalogQuery::Search(term) => {
                let term = term.to_lowercase();
                movies
                    .iter()
                    .filter(|m| m.title.to_lowercase().contains(&term))
                    .cloned()
                    .collect()
            }
        };

        Ok(results)
    }

    fn poster_url(&self, movie: &MovieSummary) -> Option<String> {
        poster_url(MOCK_IMAGE_BASE_URL, movie.poster_path.as_deref())
    }
}
