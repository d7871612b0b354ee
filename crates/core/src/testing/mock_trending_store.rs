//! Mock trending store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::trending::{
    normalize_term, TrendingError, TrendingMovie, TrendingRecord, TrendingStore,
};

/// A recorded store call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedTrendingCall {
    RecordSearch { term: String, movie_id: u64 },
    Top { limit: u32 },
    Get { term: String },
}

/// In-memory mock implementation of the TrendingStore trait.
///
/// Calls are recorded before any injected failure is returned, so tests can
/// assert on attempts as well as on successful updates.
#[derive(Debug, Default)]
pub struct MockTrendingStore {
    records: Arc<RwLock<HashMap<String, TrendingRecord>>>,
    calls: Arc<RwLock<Vec<RecordedTrendingCall>>>,
    next_error: Arc<RwLock<Option<TrendingError>>>,
    unavailable: Arc<RwLock<bool>>,
}

impl MockTrendingStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: TrendingError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make every operation fail until reset.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    /// Seed a record directly.
    pub async fn insert(&self, record: TrendingRecord) {
        self.records
            .write()
            .await
            .insert(record.search_term.clone(), record);
    }

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedTrendingCall> {
        self.calls.read().await.clone()
    }

    /// Only the increment attempts.
    pub async fn recorded_searches(&self) -> Vec<(String, u64)> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|c| match c {
                RecordedTrendingCall::RecordSearch { term, movie_id } => {
                    Some((term.clone(), *movie_id))
                }
                _ => None,
            })
            .collect()
    }

    async fn begin(&self, call: RecordedTrendingCall) -> Result<(), TrendingError> {
        self.calls.write().await.push(call);

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        if *self.unavailable.read().await {
            return Err(TrendingError::Database("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TrendingStore for MockTrendingStore {
    async fn record_search(
        &self,
        term: &str,
        movie: &TrendingMovie,
    ) -> Result<TrendingRecord, TrendingError> {
        self.begin(RecordedTrendingCall::RecordSearch {
            term: term.to_string(),
            movie_id: movie.movie_id,
        })
        .await?;

        let key = normalize_term(term).ok_or_else(|| TrendingError::InvalidTerm(term.to_string()))?;
        let mut records = self.records.write().await;
        let record = records
            .entry(key.clone())
            .and_modify(|r| r.count += 1)
            .or_insert_with(|| TrendingRecord {
                search_term: key,
                count: 1,
                movie_id: Some(movie.movie_id),
                poster_url: movie.poster_url.clone(),
                last_searched_at: None,
            });
        record.last_searched_at = Some(chrono::Utc::now());
        Ok(record.clone())
    }

    async fn top(&self, limit: u32) -> Result<Vec<TrendingRecord>, TrendingError> {
        self.begin(RecordedTrendingCall::Top { limit }).await?;

        let mut records: Vec<_> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.search_term.cmp(&b.search_term))
        });
        records.truncate(limit as usize);
        Ok(records)
    }

    async fn get(&self, term: &str) -> Result<Option<TrendingRecord>, TrendingError> {
        self.begin(RecordedTrendingCall::Get {
            term: term.to_string(),
        })
        .await?;

        let Some(key) = normalize_term(term) else {
            return Ok(None);
        };
        Ok(self.records.read().await.get(&key).cloned())
    }
}
