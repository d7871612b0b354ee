use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of records in the trending panel.
pub const DEFAULT_TRENDING_LIMIT: u32 = 5;

/// Search counter for one normalized term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingRecord {
    /// Normalized search term (unique).
    pub search_term: String,
    /// Number of successful searches, always >= 1.
    pub count: u64,
    /// Catalog ID of the top result when the record was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<u64>,
    /// Poster of the top result when the record was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    /// When the term was last searched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_searched_at: Option<DateTime<Utc>>,
}

/// Poster metadata taken from the top-ranked result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingMovie {
    pub movie_id: u64,
    pub poster_url: Option<String>,
}

/// Normalize a search term into its trending key.
///
/// Trims, collapses whitespace runs to a single space and lowercases.
/// Returns `None` if nothing is left.
pub fn normalize_term(term: &str) -> Option<String> {
    let normalized = term
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
