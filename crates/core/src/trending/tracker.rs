//! Error-absorbing front for a [`TrendingStore`].

use std::sync::Arc;

use tracing::{debug, error, warn};

use super::{TrendingMovie, TrendingRecord, TrendingStore};
use crate::metrics::{TRENDING_READS, TRENDING_UPDATES};

/// Wraps a trending store so that store failures never reach callers.
///
/// Failed updates are logged and dropped; failed reads yield an empty list.
#[derive(Clone)]
pub struct TrendingTracker {
    store: Arc<dyn TrendingStore>,
}

impl TrendingTracker {
    pub fn new(store: Arc<dyn TrendingStore>) -> Self {
        Self { store }
    }

    /// Count one successful search of `term`.
    pub async fn record(&self, term: &str, movie: &TrendingMovie) -> Option<TrendingRecord> {
        match self.store.record_search(term, movie).await {
            Ok(record) => {
                let result = if record.count == 1 { "created" } else { "incremented" };
                TRENDING_UPDATES.with_label_values(&[result]).inc();
                debug!(
                    "Trending count for '{}' is now {}",
                    record.search_term, record.count
                );
                Some(record)
            }
            Err(e) => {
                TRENDING_UPDATES.with_label_values(&["failed"]).inc();
                warn!("Failed to update trending count for '{}': {}", term, e);
                None
            }
        }
    }

    /// Most searched terms, or an empty list if the store is unavailable.
    pub async fn top(&self, limit: u32) -> Vec<TrendingRecord> {
        match self.store.top(limit).await {
            Ok(records) => {
                TRENDING_READS.with_label_values(&["success"]).inc();
                records
            }
            Err(e) => {
                TRENDING_READS.with_label_values(&["failed"]).inc();
                error!("Failed to load trending searches: {}", e);
                Vec::new()
            }
        }
    }

    /// Underlying store.
    pub fn store(&self) -> &Arc<dyn TrendingStore> {
        &self.store
    }
}
