//! End-to-end tests with mocked external dependencies.
//!
//! These tests run the full server stack in-process with mock implementations
//! for the movie catalog and the trending store.

mod common;

use axum::http::StatusCode;
use marquee_core::{testing::RecordedTrendingCall, CatalogError, CatalogQuery, TrendingRecord};

use common::{TestFixture, TEST_TMDB_KEY};

fn record(term: &str, count: u64, movie_id: u64) -> TrendingRecord {
    TrendingRecord {
        search_term: term.to_string(),
        count,
        movie_id: Some(movie_id),
        poster_url: Some(format!("https://image.test/w500/poster-{}.jpg", movie_id)),
        last_searched_at: None,
    }
}

// =============================================================================
// Basic API Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_is_sanitized() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/config").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["catalog"]["api_key_configured"], true);
    assert_eq!(
        response.body["catalog"]["poster_base_url"],
        "https://image.tmdb.org/t/p/w500"
    );
    assert_eq!(response.body["trending"]["backend"], "sqlite");
    assert_eq!(response.body["trending"]["limit"], 3);
    assert_eq!(response.body["search"]["debounce_ms"], 50);
    assert!(!response.text.contains(TEST_TMDB_KEY));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new().await;
    fixture.get("/api/v1/movies?query=heat").await;

    let response = fixture.get("/api/v1/metrics").await;
    assert_status!(response, StatusCode::OK);
    assert!(response
        .content_type
        .as_deref()
        .unwrap_or_default()
        .starts_with("text/plain"));
    assert!(response.text.contains("marquee_catalog_requests_total"));
    assert!(response.text.contains("marquee_http_requests_total"));
}

#[tokio::test]
async fn test_static_page_fallback() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/").await;
    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains("<title>Marquee</title>"));

    // unknown paths get the page too
    let response = fixture.get("/some/deep/link").await;
    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains("<title>Marquee</title>"));
}

// =============================================================================
// Movie Search Tests
// =============================================================================

#[tokio::test]
async fn test_movies_without_query_lists_popular() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/movies").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["query"], "");
    assert!(response.body["error_message"].is_null());

    let movies = response.body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 5);
    assert_eq!(movies[0]["title"], "The Matrix");

    assert_eq!(
        fixture.catalog.recorded_queries().await,
        vec![CatalogQuery::Popular]
    );

    // popular listing never counts as a search
    fixture.coordinator.flush_trending_updates().await;
    assert!(fixture.trending.recorded_searches().await.is_empty());
}

#[tokio::test]
async fn test_blank_query_is_searched_as_typed() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/movies?query=%20%20").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["query"], "  ");
    assert!(response.body["movies"].as_array().unwrap().is_empty());
    assert_eq!(response.body["error_message"], "No movies found.");
    assert_eq!(
        fixture.catalog.recorded_queries().await,
        vec![CatalogQuery::Search("  ".to_string())]
    );
}

#[tokio::test]
async fn test_search_records_trending() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/movies?query=The%20Matrix").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["query"], "The Matrix");
    let movies = response.body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0]["id"], 603);

    assert_eq!(
        fixture.catalog.recorded_queries().await,
        vec![CatalogQuery::Search("The Matrix".to_string())]
    );

    fixture.coordinator.flush_trending_updates().await;
    assert_eq!(
        fixture.trending.recorded_searches().await,
        vec![("The Matrix".to_string(), 603)]
    );
}

#[tokio::test]
async fn test_search_without_results() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/movies?query=zzzz").await;

    assert_status!(response, StatusCode::OK);
    assert!(response.body["movies"].as_array().unwrap().is_empty());
    assert_eq!(response.body["error_message"], "No movies found.");

    fixture.coordinator.flush_trending_updates().await;
    assert!(fixture.trending.recorded_calls().await.is_empty());
}

#[tokio::test]
async fn test_search_catalog_failure() {
    let fixture = TestFixture::new().await;
    fixture
        .catalog
        .set_next_error(CatalogError::ApiError {
            status: 503,
            message: "upstream down".to_string(),
        })
        .await;

    let response = fixture.get("/api/v1/movies?query=alien").await;
    assert_status!(response, StatusCode::OK);
    assert!(response.body["movies"].as_array().unwrap().is_empty());
    assert_eq!(
        response.body["error_message"],
        "Error fetching movies: Please try again later."
    );
    assert!(!response.text.contains("upstream down"));
}

#[tokio::test]
async fn test_search_survives_trending_store_outage() {
    let fixture = TestFixture::new().await;
    fixture.trending.set_unavailable(true).await;

    let response = fixture.get("/api/v1/movies?query=alien").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["movies"].as_array().unwrap().len(), 2);

    fixture.coordinator.flush_trending_updates().await;
    assert_eq!(fixture.trending.recorded_searches().await.len(), 1);
}

// =============================================================================
// Trending Tests
// =============================================================================

#[tokio::test]
async fn test_trending_uses_configured_limit() {
    let fixture = TestFixture::new().await;
    fixture.trending.insert(record("alien", 4, 348)).await;
    fixture.trending.insert(record("matrix", 9, 603)).await;
    fixture.trending.insert(record("heat", 2, 949)).await;
    fixture.trending.insert(record("aliens", 1, 679)).await;

    let response = fixture.get("/api/v1/trending").await;
    assert_status!(response, StatusCode::OK);

    let records = response.body["records"].as_array().unwrap();
    let terms: Vec<_> = records
        .iter()
        .map(|r| r["search_term"].as_str().unwrap())
        .collect();
    assert_eq!(terms, vec!["matrix", "alien", "heat"]);
    assert_eq!(records[0]["count"], 9);
    assert_eq!(
        records[0]["poster_url"],
        "https://image.test/w500/poster-603.jpg"
    );

    assert_eq!(
        fixture.trending.recorded_calls().await,
        vec![RecordedTrendingCall::Top { limit: 3 }]
    );
}

#[tokio::test]
async fn test_trending_limit_param() {
    let fixture = TestFixture::new().await;
    fixture.trending.insert(record("alien", 4, 348)).await;
    fixture.trending.insert(record("matrix", 9, 603)).await;

    let response = fixture.get("/api/v1/trending?limit=1").await;
    assert_status!(response, StatusCode::OK);
    let records = response.body["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["search_term"], "matrix");
}

#[tokio::test]
async fn test_trending_store_outage_returns_empty_list() {
    let fixture = TestFixture::new().await;
    fixture.trending.insert(record("alien", 4, 348)).await;
    fixture.trending.set_unavailable(true).await;

    let response = fixture.get("/api/v1/trending").await;
    assert_status!(response, StatusCode::OK);
    assert!(response.body["records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_searches_show_up_in_trending() {
    let fixture = TestFixture::new().await;
    for query in ["alien", "heat", "Alien", "ALIEN", "heat"] {
        fixture.get(&format!("/api/v1/movies?query={}", query)).await;
    }
    fixture.coordinator.flush_trending_updates().await;

    let response = fixture.get("/api/v1/trending").await;
    let records = response.body["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["search_term"], "alien");
    assert_eq!(records[0]["count"], 3);
    assert_eq!(records[0]["movie_id"], 348);
    assert_eq!(records[1]["search_term"], "heat");
    assert_eq!(records[1]["count"], 2);
}

#[tokio::test]
async fn test_trending_term_lookup() {
    let fixture = TestFixture::new().await;
    fixture.trending.insert(record("the matrix", 7, 603)).await;

    let response = fixture.get("/api/v1/trending/The%20%20Matrix").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["search_term"], "the matrix");
    assert_eq!(response.body["count"], 7);

    let response = fixture.get("/api/v1/trending/heat").await;
    assert_status!(response, StatusCode::NOT_FOUND);
    assert!(response.body["error"].as_str().unwrap().contains("heat"));

    fixture.trending.set_unavailable(true).await;
    let response = fixture.get("/api/v1/trending/heat").await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
}
