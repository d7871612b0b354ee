//! Appwrite document collection backend.
//!
//! Each trending record is one document with the attributes `searchTerm`,
//! `count`, `movie_id` and `poster_url`. Document IDs are derived from the
//! normalized term, so two clients racing to create the same term collide on
//! the ID instead of producing duplicates. The increment of an existing
//! document is still read-then-write and can lose a count when the same term
//! is searched concurrently.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header::ACCEPT, Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{normalize_term, TrendingError, TrendingMovie, TrendingRecord, TrendingStore};
use crate::config::AppwriteConfig;

/// Length of generated document IDs (Appwrite allows up to 36).
const DOCUMENT_ID_LEN: usize = 32;

/// Trending store backed by an Appwrite document collection.
pub struct AppwriteTrendingStore {
    client: Client,
    documents_url: String,
    project_id: String,
    api_key: Option<String>,
}

impl AppwriteTrendingStore {
    pub fn new(config: &AppwriteConfig) -> Result<Self, TrendingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let documents_url = format!(
            "{}/databases/{}/collections/{}/documents",
            config.endpoint.trim_end_matches('/'),
            config.database_id,
            config.collection_id
        );

        Ok(Self {
            client,
            documents_url,
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, url)
            .header("X-Appwrite-Project", &self.project_id)
            .header(ACCEPT, "application/json");

        match &self.api_key {
            Some(key) => request.header("X-Appwrite-Key", key),
            None => request,
        }
    }

    /// list-with-filter / list-with-sort-and-limit
    async fn list_documents(
        &self,
        queries: &[String],
    ) -> Result<Vec<TrendingDocument>, TrendingError> {
        let params: Vec<(&str, &str)> = queries.iter().map(|q| ("queries[]", q.as_str())).collect();

        let response = self
            .request(Method::GET, &self.documents_url)
            .query(&params)
            .send()
            .await?;

        let list: DocumentList = parse(check_status(response).await?).await?;
        Ok(list.documents)
    }

    async fn find(&self, term: &str) -> Result<Option<TrendingDocument>, TrendingError> {
        let documents = self
            .list_documents(&[equal_query("searchTerm", term), limit_query(1)])
            .await?;
        Ok(documents.into_iter().next())
    }

    async fn create_document(
        &self,
        term: &str,
        movie: &TrendingMovie,
    ) -> Result<Option<TrendingDocument>, TrendingError> {
        let body = json!({
            "documentId": document_id(term),
            "data": {
                "searchTerm": term,
                "count": 1,
                "movie_id": movie.movie_id,
                "poster_url": movie.poster_url,
            }
        });

        let response = self
            .request(Method::POST, &self.documents_url)
            .json(&body)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            debug!("Trending document for '{}' was created concurrently", term);
            return Ok(None);
        }

        parse(check_status(response).await?).await.map(Some)
    }

    async fn update_document(
        &self,
        id: &str,
        count: u64,
    ) -> Result<TrendingDocument, TrendingError> {
        let url = format!("{}/{}", self.documents_url, id);
        let response = self
            .request(Method::PATCH, &url)
            .json(&json!({ "data": { "count": count } }))
            .send()
            .await?;

        parse(check_status(response).await?).await
    }

    async fn increment(&self, document: TrendingDocument) -> Result<TrendingRecord, TrendingError> {
        let next = document.count().map_or(1, |c| c + 1);
        let updated = self.update_document(&document.id, next).await?;
        Ok(updated.into())
    }
}

#[async_trait]
impl TrendingStore for AppwriteTrendingStore {
    async fn record_search(
        &self,
        term: &str,
        movie: &TrendingMovie,
    ) -> Result<TrendingRecord, TrendingError> {
        let term =
            normalize_term(term).ok_or_else(|| TrendingError::InvalidTerm(term.to_string()))?;

        if let Some(existing) = self.find(&term).await? {
            return self.increment(existing).await;
        }

        if let Some(created) = self.create_document(&term, movie).await? {
            return Ok(created.into());
        }

        // Lost the creation race; the winner's document must exist now.
        match self.find(&term).await? {
            Some(existing) => self.increment(existing).await,
            None => Err(TrendingError::ApiError {
                status: StatusCode::CONFLICT.as_u16(),
                message: format!("document for '{}' conflicts but cannot be found", term),
            }),
        }
    }

    async fn top(&self, limit: u32) -> Result<Vec<TrendingRecord>, TrendingError> {
        let documents = self
            .list_documents(&[order_desc_query("count"), limit_query(limit)])
            .await?;

        Ok(documents
            .into_iter()
            .take(limit as usize)
            .map(Into::into)
            .collect())
    }

    async fn get(&self, term: &str) -> Result<Option<TrendingRecord>, TrendingError> {
        let Some(term) = normalize_term(term) else {
            return Ok(None);
        };
        Ok(self.find(&term).await?.map(Into::into))
    }
}

// ============================================================================
// Queries and wire types
// ============================================================================

fn equal_query(attribute: &str, value: &str) -> String {
    json!({ "method": "equal", "attribute": attribute, "values": [value] }).to_string()
}

fn order_desc_query(attribute: &str) -> String {
    json!({ "method": "orderDesc", "attribute": attribute }).to_string()
}

fn limit_query(limit: u32) -> String {
    json!({ "method": "limit", "values": [limit] }).to_string()
}

/// Deterministic document ID for a normalized term.
fn document_id(term: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(term.as_bytes()));
    digest[..DOCUMENT_ID_LEN].to_string()
}

async fn check_status(response: Response) -> Result<Response, TrendingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(TrendingError::ApiError {
        status: status.as_u16(),
        message,
    })
}

async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, TrendingError> {
    response
        .json()
        .await
        .map_err(|e| TrendingError::ParseError(format!("Failed to parse document response: {}", e)))
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<TrendingDocument>,
}

#[derive(Debug, Deserialize)]
struct TrendingDocument {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "$updatedAt", default)]
    updated_at: Option<String>,
    #[serde(rename = "searchTerm")]
    search_term: String,
    /// Kept loose: hand-edited documents may hold a non-numeric count.
    #[serde(default)]
    count: Value,
    #[serde(default)]
    movie_id: Option<u64>,
    #[serde(default)]
    poster_url: Option<String>,
}

impl TrendingDocument {
    fn count(&self) -> Option<u64> {
        self.count.as_u64()
    }
}

impl From<TrendingDocument> for TrendingRecord {
    fn from(d: TrendingDocument) -> Self {
        Self {
            count: d.count().unwrap_or(1).max(1),
            search_term: d.search_term,
            movie_id: d.movie_id,
            poster_url: d.poster_url,
            last_searched_at: d
                .updated_at
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}
