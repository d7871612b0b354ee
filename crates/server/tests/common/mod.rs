//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock dependencies injected, enabling E2E testing without TMDB or a
//! document store.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use marquee_core::{
    load_config_from_str,
    testing::{MockMovieCatalog, MockTrendingStore},
    MovieCatalog, SearchCoordinator, TrendingStore, TrendingTracker,
};
use marquee_server::state::AppState;

/// Re-export fixtures for test convenience
pub use marquee_core::testing::fixtures;

/// TMDB key used by fixture configs; must never appear in responses.
pub const TEST_TMDB_KEY: &str = "tmdb-test-read-token";

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.get("/api/v1/movies?query=alien").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog, preloaded with `fixtures::sample_movies()`
    pub catalog: Arc<MockMovieCatalog>,
    /// Mock trending store
    pub trending: Arc<MockTrendingStore>,
    pub coordinator: Arc<SearchCoordinator>,
    /// Temporary directory holding the static web page
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub text: String,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let web_dir = temp_dir.path().join("web");
        std::fs::create_dir_all(&web_dir).expect("Failed to create web dir");
        std::fs::write(
            web_dir.join("index.html"),
            "<!doctype html><title>Marquee</title>",
        )
        .expect("Failed to write index.html");

        let config = load_config_from_str(&format!(
            r#"
[server]
host = "127.0.0.1"
port = 8080
web_dir = '{}'

[catalog.tmdb]
api_key = "{}"

[trending]
limit = 3

[search]
debounce_ms = 50
"#,
            web_dir.display(),
            TEST_TMDB_KEY
        ))
        .expect("Failed to parse test config");

        let catalog = Arc::new(MockMovieCatalog::new());
        catalog.set_movies(fixtures::sample_movies()).await;
        let trending = Arc::new(MockTrendingStore::new());

        let coordinator = Arc::new(
            SearchCoordinator::new(
                Arc::clone(&catalog) as Arc<dyn MovieCatalog>,
                TrendingTracker::new(Arc::clone(&trending) as Arc<dyn TrendingStore>),
            )
            .with_trending_limit(config.trending.limit),
        );

        let state = Arc::new(AppState::new(config, Arc::clone(&coordinator)));
        let router = marquee_server::api::create_router(state);

        Self {
            router,
            catalog,
            trending,
            coordinator,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            content_type,
            text,
            body,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
