//! Job search pipeline: the one sequence shared by the HTTP handler and the CLI.
//!
//! Flow: scrape → normalize → relevance filter (secondary provider if the
//! primary filter errors) → empty-result substitution → snapshots.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::jobs::normalizer::normalize_all;
use crate::jobs::snapshots::{SnapshotError, SnapshotWriter};
use crate::jobs::sources::{JobSource, ScrapeRequest, SourceFetchError};
use crate::models::{JobListing, SearchCriteria, SearchResults};
use crate::relevance::RelevanceFilter;

/// Listings returned unfiltered when nothing passes relevance filtering.
pub const FALLBACK_LISTING_COUNT: usize = 10;
pub const DEFAULT_RESULTS_WANTED: u32 = 20;
pub const DEFAULT_HOURS_OLD: u32 = 72;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("job source failed: {0}")]
    Source(#[from] SourceFetchError),

    #[error("failed to write snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

pub struct Pipeline {
    source: Arc<dyn JobSource>,
    primary: Arc<dyn RelevanceFilter>,
    fallback: Arc<dyn RelevanceFilter>,
    snapshots: Option<SnapshotWriter>,
    results_wanted: u32,
    hours_old: u32,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn JobSource>,
        primary: Arc<dyn RelevanceFilter>,
        fallback: Arc<dyn RelevanceFilter>,
    ) -> Self {
        Self {
            source,
            primary,
            fallback,
            snapshots: None,
            results_wanted: DEFAULT_RESULTS_WANTED,
            hours_old: DEFAULT_HOURS_OLD,
        }
    }

    pub fn with_snapshots(mut self, snapshots: Option<SnapshotWriter>) -> Self {
        self.snapshots = snapshots;
        self
    }

    pub fn with_limits(mut self, results_wanted: u32, hours_old: u32) -> Self {
        self.results_wanted = results_wanted;
        self.hours_old = hours_old;
        self
    }

    pub async fn run(&self, criteria: &SearchCriteria) -> Result<SearchResults, PipelineError> {
        info!(
            "Searching for: {} in {}",
            criteria.position, criteria.location
        );

        let request = ScrapeRequest::for_criteria(criteria, self.results_wanted, self.hours_old);
        let raw_jobs = self.source.scrape(&request).await?;
        info!("Found {} raw job listings", raw_jobs.len());
        if let Some(snapshots) = &self.snapshots {
            snapshots.write_raw(&raw_jobs)?;
        }

        let formatted = normalize_all(&raw_jobs, criteria);
        if let Some(snapshots) = &self.snapshots {
            snapshots.write_formatted(&formatted)?;
        }

        let mut relevant = self.filter(&formatted, criteria).await;
        if relevant.is_empty() && !formatted.is_empty() {
            info!("No jobs passed relevance filtering. Returning top jobs without filtering.");
            relevant = formatted
                .iter()
                .take(FALLBACK_LISTING_COUNT)
                .cloned()
                .collect();
        }

        if let Some(snapshots) = &self.snapshots {
            snapshots.write_relevant(&relevant)?;
            snapshots.write_results(&relevant)?;
        }

        info!("Returning {} relevant jobs", relevant.len());
        Ok(SearchResults {
            relevant_jobs: relevant,
        })
    }

    async fn filter(&self, listings: &[JobListing], criteria: &SearchCriteria) -> Vec<JobListing> {
        match self.primary.filter(listings, criteria).await {
            Ok(relevant) => relevant,
            Err(e) => {
                error!("{} filtering failed: {e}", self.primary.name());
                warn!("Falling back to {} filter", self.fallback.name());
                match self.fallback.filter(listings, criteria).await {
                    Ok(relevant) => relevant,
                    Err(e) => {
                        error!("{} filtering failed: {e}", self.fallback.name());
                        listings.to_vec()
                    }
                }
            }
        }
    }
}
