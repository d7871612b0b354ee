//! Movie search API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use marquee_core::MovieSummary;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct MoviesQueryParams {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub query: String,
    pub movies: Vec<MovieSummary>,
    /// User-facing message when the search failed or matched nothing
    pub error_message: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/movies
///
/// One search against the catalog. No query (or a blank one) lists popular
/// movies. Failures are reported in `error_message` with a 200 status, the
/// same way the interactive view shows them.
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MoviesQueryParams>,
) -> Json<MoviesResponse> {
    let query = params.query.unwrap_or_default();

    let (movies, error_message) = match state.coordinator().search(&query).await {
        Ok(movies) => (movies, None),
        Err(failure) => (Vec::new(), Some(failure.user_message().to_string())),
    };

    Json(MoviesResponse {
        query,
        movies,
        error_message,
    })
}
