//! Issues catalog requests and records successful searches as trending.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::SearchFailure;
use crate::catalog::{CatalogQuery, MovieCatalog, MovieSummary};
use crate::metrics::{CATALOG_REQUESTS, CATALOG_REQUEST_DURATION};
use crate::trending::{TrendingMovie, TrendingRecord, TrendingTracker, DEFAULT_TRENDING_LIMIT};

/// Runs searches against the catalog.
///
/// Shared by all sessions. Each call to [`search`](Self::search) performs
/// exactly one catalog request. A successful term search with at least one
/// result also schedules a trending update for the top result; the update
/// runs in the background and its outcome never affects the search result.
pub struct SearchCoordinator {
    catalog: Arc<dyn MovieCatalog>,
    trending: TrendingTracker,
    trending_limit: u32,
    pending_updates: Mutex<JoinSet<()>>,
}

impl SearchCoordinator {
    pub fn new(catalog: Arc<dyn MovieCatalog>, trending: TrendingTracker) -> Self {
        Self {
            catalog,
            trending,
            trending_limit: DEFAULT_TRENDING_LIMIT,
            pending_updates: Mutex::new(JoinSet::new()),
        }
    }

    /// Set how many records [`trending`](Self::trending) returns.
    pub fn with_trending_limit(mut self, limit: u32) -> Self {
        self.trending_limit = limit;
        self
    }

    pub fn trending_limit(&self) -> u32 {
        self.trending_limit
    }

    pub fn tracker(&self) -> &TrendingTracker {
        &self.trending
    }

    /// Search for raw search box input. Empty input lists popular movies.
    pub async fn search(&self, input: &str) -> Result<Vec<MovieSummary>, SearchFailure> {
        let query = CatalogQuery::from_input(input);
        let mode = query.mode();

        let timer = CATALOG_REQUEST_DURATION
            .with_label_values(&[mode])
            .start_timer();
        let result = self.catalog.fetch(&query).await;
        timer.observe_duration();

        let movies = match result {
            Ok(movies) => movies,
            Err(e) => {
                CATALOG_REQUESTS.with_label_values(&[mode, "error"]).inc();
                warn!("Error fetching movies ({}): {}", mode, e);
                return Err(e.into());
            }
        };

        if movies.is_empty() {
            CATALOG_REQUESTS.with_label_values(&[mode, "empty"]).inc();
            debug!("No movies found for {:?}", query);
            return Err(SearchFailure::NoResults);
        }

        CATALOG_REQUESTS.with_label_values(&[mode, "success"]).inc();
        debug!("{} returned {} movies", mode, movies.len());

        if let Some(term) = query.term() {
            self.spawn_trending_update(term, &movies[0]);
        }

        Ok(movies)
    }

    /// Most searched terms; empty if the trending store is unavailable.
    pub async fn trending(&self) -> Vec<TrendingRecord> {
        self.trending.top(self.trending_limit).await
    }

    /// Wait for all scheduled trending updates to finish.
    pub async fn flush_trending_updates(&self) {
        let mut pending = std::mem::take(&mut *self.pending());
        if !pending.is_empty() {
            info!("Waiting for {} trending updates", pending.len());
        }
        while pending.join_next().await.is_some() {}
    }

    fn spawn_trending_update(&self, term: &str, top: &MovieSummary) {
        let movie = TrendingMovie {
            movie_id: top.id,
            poster_url: self.catalog.poster_url(top),
        };
        let tracker = self.trending.clone();
        let term = term.to_string();

        let mut pending = self.pending();
        // reap finished updates so the set does not grow
        while pending.try_join_next().is_some() {}
        pending.spawn(async move {
            tracker.record(&term, &movie).await;
        });
    }

    fn pending(&self) -> MutexGuard<'_, JoinSet<()>> {
        // a panicked update task cannot leave the set inconsistent
        self.pending_updates
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
