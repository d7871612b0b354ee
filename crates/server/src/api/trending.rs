//! Trending searches API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use marquee_core::{TrendingRecord, TrendingStore};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::state::AppState;

/// Upper bound for `limit`
const MAX_TRENDING_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct TrendingQueryParams {
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub records: Vec<TrendingRecord>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /api/v1/trending
///
/// Most searched terms, highest count first. An unavailable store yields an
/// empty list.
pub async fn list_trending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendingQueryParams>,
) -> Json<TrendingResponse> {
    let coordinator = state.coordinator();
    let limit = params
        .limit
        .unwrap_or_else(|| coordinator.trending_limit())
        .clamp(1, MAX_TRENDING_LIMIT);

    let records = coordinator.tracker().top(limit).await;
    Json(TrendingResponse { records })
}

/// GET /api/v1/trending/{term}
///
/// Counter for a single search term. The term is normalized the same way
/// searches are recorded, so `/trending/The%20Matrix` finds "the matrix".
pub async fn get_trending_term(
    State(state): State<Arc<AppState>>,
    Path(term): Path<String>,
) -> Result<Json<TrendingRecord>, (StatusCode, Json<ErrorResponse>)> {
    match state.coordinator().tracker().store().get(&term).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("No trending record for '{}'", term),
            }),
        )),
        Err(e) => {
            error!("Failed to read trending record for '{}': {}", term, e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: "Trending store unavailable".to_string(),
                }),
            ))
        }
    }
}
