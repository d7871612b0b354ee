//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Catalog requests (search and discover)
//! - Search outcomes, including discarded stale responses
//! - Trending store updates and reads

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Catalog Metrics
// =============================================================================

/// Catalog requests by mode and result.
pub static CATALOG_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_catalog_requests_total", "Total catalog requests"),
        &["mode", "result"], // mode: "search", "discover"; result: "success", "empty", "error"
    )
    .unwrap()
});

/// Catalog request duration in seconds.
pub static CATALOG_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "marquee_catalog_request_duration_seconds",
            "Duration of catalog requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["mode"],
    )
    .unwrap()
});

// =============================================================================
// Session Metrics
// =============================================================================

/// Responses dropped because a newer search was issued meanwhile.
pub static STALE_RESPONSES_DISCARDED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "marquee_stale_responses_discarded_total",
        "Search responses discarded because a newer search superseded them",
    )
    .unwrap()
});

// =============================================================================
// Trending Metrics
// =============================================================================

/// Trending counter updates by result.
pub static TRENDING_UPDATES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_trending_updates_total", "Trending counter updates"),
        &["result"], // "created", "incremented", "failed"
    )
    .unwrap()
});

/// Trending panel reads by result.
pub static TRENDING_READS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_trending_reads_total", "Trending top-N reads"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// All core metrics, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CATALOG_REQUESTS.clone()),
        Box::new(CATALOG_REQUEST_DURATION.clone()),
        Box::new(STALE_RESPONSES_DISCARDED.clone()),
        Box::new(TRENDING_UPDATES.clone()),
        Box::new(TRENDING_READS.clone()),
    ]
}
