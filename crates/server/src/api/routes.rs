use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use super::{handlers, middleware::metrics_middleware, movies, trending, ws};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let web_dir = state.web_dir().to_path_buf();

    // API routes
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Search
        .route("/movies", get(movies::search_movies))
        .route("/trending", get(trending::list_trending))
        .route("/trending/{term}", get(trending::get_trending_term))
        // Interactive sessions
        .route("/ws", get(ws::ws_handler))
        .with_state(state);

    // Serve the browser page, unknown paths fall back to index.html
    let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(web_dir.join("index.html")));

    Router::new()
        .nest("/api/v1", api_routes)
        .fallback_service(serve_dir)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
