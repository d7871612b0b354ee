//! SQLite-backed trending store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{normalize_term, TrendingError, TrendingMovie, TrendingRecord, TrendingStore};

/// SQLite-backed trending store.
///
/// Increments are a single upsert statement, so concurrent searches of the
/// same term never lose a count or create a second row.
pub struct SqliteTrendingStore {
    conn: Mutex<Connection>,
}

impl SqliteTrendingStore {
    /// Open (or create) the database file and its tables.
    pub fn new(path: &Path) -> Result<Self, TrendingError> {
        let conn = Connection::open(path).map_err(|e| TrendingError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, TrendingError> {
        let conn =
            Connection::open_in_memory().map_err(|e| TrendingError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), TrendingError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS trending_searches (
                search_term TEXT PRIMARY KEY,
                count INTEGER NOT NULL DEFAULT 1 CHECK (count >= 1),
                movie_id INTEGER,
                poster_url TEXT,
                first_searched_at TEXT NOT NULL,
                last_searched_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_trending_searches_count
                ON trending_searches(count DESC, last_searched_at DESC);
            "#,
        )
        .map_err(|e| TrendingError::Database(e.to_string()))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, TrendingError> {
        self.conn
            .lock()
            .map_err(|_| TrendingError::Database("connection lock poisoned".to_string()))
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<TrendingRecord> {
        let count: i64 = row.get(1)?;
        let movie_id: Option<i64> = row.get(2)?;
        let last_searched_str: String = row.get(4)?;

        let last_searched_at = DateTime::parse_from_rfc3339(&last_searched_str)
            .map(|dt| dt.with_timezone(&Utc))
            .ok();

        Ok(TrendingRecord {
            search_term: row.get(0)?,
            count: count as u64,
            movie_id: movie_id.map(|id| id as u64),
            poster_url: row.get(3)?,
            last_searched_at,
        })
    }
}

#[async_trait]
impl TrendingStore for SqliteTrendingStore {
    async fn record_search(
        &self,
        term: &str,
        movie: &TrendingMovie,
    ) -> Result<TrendingRecord, TrendingError> {
        let term =
            normalize_term(term).ok_or_else(|| TrendingError::InvalidTerm(term.to_string()))?;
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        let conn = self.conn()?;
        conn.query_row(
            "INSERT INTO trending_searches
                (search_term, count, movie_id, poster_url, first_searched_at, last_searched_at)
             VALUES (?1, 1, ?2, ?3, ?4, ?4)
             ON CONFLICT(search_term) DO UPDATE SET
                count = count + 1,
                last_searched_at = excluded.last_searched_at
             RETURNING search_term, count, movie_id, poster_url, last_searched_at",
            params![&term, movie.movie_id as i64, &movie.poster_url, &now],
            Self::row_to_record,
        )
        .map_err(|e| TrendingError::Database(e.to_string()))
    }

    async fn top(&self, limit: u32) -> Result<Vec<TrendingRecord>, TrendingError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT search_term, count, movie_id, poster_url, last_searched_at
                 FROM trending_searches
                 ORDER BY count DESC, last_searched_at DESC
                 LIMIT ?",
            )
            .map_err(|e| TrendingError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit as i64], Self::row_to_record)
            .map_err(|e| TrendingError::Database(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(|e| TrendingError::Database(e.to_string()))?);
        }
        Ok(records)
    }

    async fn get(&self, term: &str) -> Result<Option<TrendingRecord>, TrendingError> {
        let Some(term) = normalize_term(term) else {
            return Ok(None);
        };

        let conn = self.conn()?;
        conn.query_row(
            "SELECT search_term, count, movie_id, poster_url, last_searched_at
             FROM trending_searches WHERE search_term = ?",
            params![&term],
            Self::row_to_record,
        )
        .optional()
        .map_err(|e| TrendingError::Database(e.to_string()))
    }
}
