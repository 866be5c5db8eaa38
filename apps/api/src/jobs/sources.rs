//! Job sources: the external scraper, treated as an opaque collaborator.
//!
//! The pipeline only needs `scrape(request) -> raw records`. Two backends:
//! - `HttpJobSource`: a JobSpy-compatible scraper service reached over HTTP
//! - `FileJobSource`: a saved JSON dump of raw records, for offline runs

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::{RawJobRecord, SearchCriteria};

pub const DEFAULT_SOURCES: [&str; 3] = ["indeed", "linkedin", "google"];
const SCRAPE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum SourceFetchError {
    #[error("job source request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("job source returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to read raw jobs from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed job source payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One scrape call. Field names on the wire follow the scraper's own API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeRequest {
    #[serde(rename = "site_name")]
    pub sources: Vec<String>,
    pub search_term: String,
    pub location: String,
    pub results_wanted: u32,
    pub hours_old: u32,
    #[serde(rename = "country_indeed", skip_serializing_if = "Option::is_none")]
    pub region_hint: Option<String>,
}

impl ScrapeRequest {
    pub fn for_criteria(criteria: &SearchCriteria, results_wanted: u32, hours_old: u32) -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            search_term: criteria.position.clone(),
            location: criteria.location.clone(),
            results_wanted,
            hours_old,
            region_hint: region_hint_for(&criteria.location),
        }
    }
}

/// Indeed needs an explicit country for Pakistani locations.
fn region_hint_for(location: &str) -> Option<String> {
    location
        .to_lowercase()
        .contains("pakistan")
        .then(|| "pakistan".to_string())
}

#[async_trait]
pub trait JobSource: Send + Sync {
    async fn scrape(&self, request: &ScrapeRequest) -> Result<Vec<RawJobRecord>, SourceFetchError>;
}

/// Accepts either a bare array of records or `{"jobs": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScrapePayload {
    Bare(Vec<RawJobRecord>),
    Wrapped { jobs: Vec<RawJobRecord> },
}

impl ScrapePayload {
    fn into_records(self) -> Vec<RawJobRecord> {
        match self {
            ScrapePayload::Bare(records) | ScrapePayload::Wrapped { jobs: records } => records,
        }
    }
}

#[derive(Clone)]
pub struct HttpJobSource {
    client: Client,
    endpoint: String,
}

impl HttpJobSource {
    pub fn new(endpoint: impl Into<String>) -> reqwest::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(SCRAPE_TIMEOUT).build()?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    async fn scrape(&self, request: &ScrapeRequest) -> Result<Vec<RawJobRecord>, SourceFetchError> {
        info!(
            "Scraping {:?} for '{}' in '{}'",
            request.sources, request.search_term, request.location
        );

        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceFetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let payload: ScrapePayload = serde_json::from_str(&body)?;
        Ok(payload.into_records())
    }
}

#[derive(Debug, Clone)]
pub struct FileJobSource {
    path: PathBuf,
}

impl FileJobSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl JobSource for FileJobSource {
    async fn scrape(&self, request: &ScrapeRequest) -> Result<Vec<RawJobRecord>, SourceFetchError> {
        info!(
            "Loading raw jobs for '{}' from {}",
            request.search_term,
            self.path.display()
        );
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceFetchError::Io {
                path: self.path.clone(),
                source,
            })?;
        let payload: ScrapePayload = serde_json::from_str(&body)?;
        Ok(payload.into_records())
    }
}
