//! Catalog query and response types.

use serde::{Deserialize, Serialize};

/// Poster rendition used for cards and the trending panel.
pub const POSTER_SIZE: &str = "w500";

/// A single catalog request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    /// Most popular movies, used when there is no search term.
    Popular,
    /// Title search for a non-empty term.
    Search(String),
}

impl CatalogQuery {
    /// Build the query for raw search box input.
    ///
    /// Only empty input falls back to [`CatalogQuery::Popular`]. Anything
    /// else, whitespace included, is searched as typed.
    pub fn from_input(input: &str) -> Self {
        if input.is_empty() {
            Self::Popular
        } else {
            Self::Search(input.to_string())
        }
    }

    /// Request path and query string, relative to the API base URL.
    pub fn path_and_query(&self) -> String {
        match self {
            Self::Popular => "/discover/movie?sort_by=popularity.desc".to_string(),
            Self::Search(term) => format!("/search/movie?query={}", urlencoding::encode(term)),
        }
    }

    /// Label used in logs and metrics.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Popular => "discover",
            Self::Search(_) => "search",
        }
    }

    /// The search term, if this is a search.
    pub fn term(&self) -> Option<&str> {
        match self {
            Self::Popular => None,
            Self::Search(term) => Some(term),
        }
    }
}

/// A movie as returned by the catalog. Passed through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    /// Catalog movie ID.
    pub id: u64,
    /// Movie title.
    pub title: String,
    /// Poster path (relative to the image base URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    /// Catalog popularity score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    /// Release date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Average vote (0-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f32>,
    /// ISO 639-1 code of the original language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    /// Synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

impl MovieSummary {
    /// Get the release year from the release date.
    pub fn year(&self) -> Option<u32> {
        self.release_date
            .as_ref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }
}

/// Join an image base URL and a poster path into a full poster URL.
pub fn poster_url(image_base_url: &str, poster_path: Option<&str>) -> Option<String> {
    let path = poster_path.filter(|p| !p.is_empty())?;
    Some(format!(
        "{}/{}{}",
        image_base_url.trim_end_matches('/'),
        POSTER_SIZE,
        path
    ))
}
