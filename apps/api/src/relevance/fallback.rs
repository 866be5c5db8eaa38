//! Secondary-provider filter.
//!
//! Simpler than the batch engine: larger batches, one attempt per batch and a
//! short fixed pause between calls. Any backend error, or a missing provider,
//! returns the whole input unfiltered.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::llm_client::{ChatSession, SubmitError};
use crate::models::{JobListing, SearchCriteria};
use crate::relevance::parser::parse_batch_response;
use crate::relevance::prompts::{build_batch_prompt, build_user_criteria_block};
use crate::relevance::{FilterError, RelevanceFilter};

const FALLBACK_BATCH_SIZE: usize = 3;
const FALLBACK_PAUSE: Duration = Duration::from_secs(1);

pub struct FallbackFilter {
    chat: Option<Arc<dyn ChatSession>>,
}

impl FallbackFilter {
    pub fn new(chat: Arc<dyn ChatSession>) -> Self {
        Self { chat: Some(chat) }
    }

    /// A fallback with no provider configured; passes listings through.
    pub fn disabled() -> Self {
        Self { chat: None }
    }

    async fn run(
        &self,
        chat: &dyn ChatSession,
        listings: &[JobListing],
        criteria: &SearchCriteria,
    ) -> Result<Vec<JobListing>, SubmitError> {
        let criteria_block = build_user_criteria_block(criteria);
        let mut relevant = Vec::new();

        for batch in listings.chunks(FALLBACK_BATCH_SIZE) {
            let prompt = build_batch_prompt(&criteria_block, batch);
            let response = chat.submit(&prompt).await?;

            let decisions = parse_batch_response(&response, batch.len());
            relevant.extend(
                batch
                    .iter()
                    .zip(decisions)
                    .filter(|(_, keep)| *keep)
                    .map(|(job, _)| job.clone()),
            );

            sleep(FALLBACK_PAUSE).await;
        }

        Ok(relevant)
    }
}

#[async_trait]
impl RelevanceFilter for FallbackFilter {
    fn name(&self) -> &str {
        "fallback-chat"
    }

    async fn filter(
        &self,
        listings: &[JobListing],
        criteria: &SearchCriteria,
    ) -> Result<Vec<JobListing>, FilterError> {
        let Some(chat) = &self.chat else {
            warn!("Secondary provider not configured. Returning all jobs without filtering.");
            return Ok(listings.to_vec());
        };

        match self.run(chat.as_ref(), listings, criteria).await {
            Ok(relevant) => {
                info!(
                    "Secondary provider kept {} of {} jobs",
                    relevant.len(),
                    listings.len()
                );
                Ok(relevant)
            }
            Err(e) => {
                warn!("Secondary provider filtering failed: {e}");
                Ok(listings.to_vec())
            }
        }
    }
}
