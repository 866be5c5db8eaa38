//! Relevance filtering: decides which normalized listings match a search profile.
//!
//! `BatchFilterEngine` is the primary filter (session-based provider with
//! retry, backoff and fail-open bookkeeping). `FallbackFilter` is the secondary
//! provider, used by the pipeline only when the primary filter errors.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{JobListing, SearchCriteria};

pub mod engine;
pub mod fallback;
pub mod parser;
pub mod prompts;

pub use engine::{BatchFilterEngine, FilterSettings};
pub use fallback::FallbackFilter;

/// Raised only for faults in the filter itself. Backend trouble never surfaces
/// here; it degrades to including the affected listings instead.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid filter configuration: {0}")]
    InvalidConfig(String),
}

/// Pluggable relevance filter, carried by the pipeline as `Arc<dyn RelevanceFilter>`.
///
/// Implementations return a subsequence of `listings`: order preserved, no
/// listing fabricated or repeated.
#[async_trait]
pub trait RelevanceFilter: Send + Sync {
    fn name(&self) -> &str;

    async fn filter(
        &self,
        listings: &[JobListing],
        criteria: &SearchCriteria,
    ) -> Result<Vec<JobListing>, FilterError>;
}
