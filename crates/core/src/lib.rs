pub mod catalog;
pub mod config;
pub mod metrics;
pub mod search;
pub mod testing;
pub mod trending;

pub use catalog::{
    poster_url, CatalogError, CatalogQuery, MovieCatalog, MovieSummary, TmdbClient, TmdbConfig,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AppwriteConfig, Config, ConfigError,
    SanitizedConfig, TrendingBackend,
};
pub use search::{
    spawn_session, Debouncer, SearchCoordinator, SearchFailure, SearchView, SessionHandle,
    SessionView, TrendingView,
};
pub use trending::{
    normalize_term, AppwriteTrendingStore, SqliteTrendingStore, TrendingError, TrendingMovie,
    TrendingRecord, TrendingStore, TrendingTracker,
};
