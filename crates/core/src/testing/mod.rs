//! Testing utilities and mock implementations.
//!
//! Mocks for the two external services (movie catalog, trending store) so
//! search flows can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_core::testing::{fixtures, MockMovieCatalog, MockTrendingStore};
//!
//! let catalog = MockMovieCatalog::new();
//! catalog.set_movies(vec![fixtures::movie(603, "The Matrix", 88.0)]).await;
//!
//! let trending = MockTrendingStore::new();
//! trending.set_unavailable(true).await;
//! ```

mod mock_catalog;
mod mock_trending_store;

pub use mock_catalog::{MockMovieCatalog, MOCK_IMAGE_BASE_URL};
pub use mock_trending_store::{MockTrendingStore, RecordedTrendingCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::MovieSummary;
    use crate::trending::TrendingMovie;

    /// Create a test movie with reasonable defaults.
    pub fn movie(id: u64, title: &str, popularity: f64) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            poster_path: Some(format!("/poster-{}.jpg", id)),
            popularity: Some(popularity),
            release_date: Some("2001-06-15".to_string()),
            vote_average: Some(7.5),
            original_language: Some("en".to_string()),
            overview: Some(format!("A movie about {}.", title.to_lowercase())),
        }
    }

    /// A small catalog with distinct popularity values.
    pub fn sample_movies() -> Vec<MovieSummary> {
        vec![
            movie(603, "The Matrix", 88.0),
            movie(604, "The Matrix Reloaded", 51.0),
            movie(348, "Alien", 72.5),
            movie(679, "Aliens", 64.0),
            movie(949, "Heat", 40.2),
        ]
    }

    /// Trending poster metadata for a movie id.
    pub fn trending_movie(id: u64) -> TrendingMovie {
        TrendingMovie {
            movie_id: id,
            poster_url: Some(format!("https://image.test/w500/poster-{}.jpg", id)),
        }
    }
}
