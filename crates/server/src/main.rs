use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee_core::{
    load_config, validate_config, AppwriteTrendingStore, Config, MovieCatalog, SearchCoordinator,
    SqliteTrendingStore, TmdbClient, TrendingBackend, TrendingStore, TrendingTracker,
};
use marquee_server::{api::create_router, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("MARQUEE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        "Marquee {} configuration loaded (hash {})",
        VERSION,
        &config_hash[..16]
    );

    // Movie catalog
    let catalog: Arc<dyn MovieCatalog> = Arc::new(
        TmdbClient::new(config.catalog.tmdb.clone()).context("Failed to create TMDB client")?,
    );
    info!("TMDB client initialized");

    // Trending store
    let store = create_trending_store(&config)?;
    let coordinator = Arc::new(
        SearchCoordinator::new(catalog, TrendingTracker::new(store))
            .with_trending_limit(config.trending.limit),
    );

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), Arc::clone(&coordinator)));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);
    info!("Serving web page from {:?}", config.server.web_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");

    // Let counters for already-completed searches land
    coordinator.flush_trending_updates().await;
    info!("Trending updates flushed");

    Ok(())
}

fn create_trending_store(config: &Config) -> Result<Arc<dyn TrendingStore>> {
    match config.trending.backend {
        TrendingBackend::Sqlite => {
            let path = &config.trending.sqlite.path;
            info!("Using SQLite trending store at {:?}", path);
            let store = SqliteTrendingStore::new(path)
                .with_context(|| format!("Failed to open trending database {:?}", path))?;
            Ok(Arc::new(store))
        }
        TrendingBackend::Appwrite => {
            let appwrite = config
                .trending
                .appwrite
                .as_ref()
                .context("Appwrite backend selected but no [trending.appwrite] section")?;
            info!(
                "Using Appwrite trending store at {} (collection {})",
                appwrite.endpoint, appwrite.collection_id
            );
            let store = AppwriteTrendingStore::new(appwrite)
                .context("Failed to create Appwrite client")?;
            Ok(Arc::new(store))
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
