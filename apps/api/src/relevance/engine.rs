//! Batch Filter Engine: drives a chat session across all batches of a run.
//!
//! Flow per run: acquire session (with backoff) → split listings into batches →
//! for each batch: pace, prompt, classify the outcome → accumulate.
//!
//! Every failure mode degrades to including the affected listings. A run only
//! returns `Err` for a misconfigured engine.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::llm_client::{ChatSession, SessionConnector, SubmitError};
use crate::models::{JobListing, SearchCriteria};
use crate::relevance::parser::parse_batch_response;
use crate::relevance::prompts::{build_batch_prompt, build_user_criteria_block};
use crate::relevance::{FilterError, RelevanceFilter};

/// Tunables for one engine. Delays are expressed in multiples of `time_unit`.
#[derive(Debug, Clone)]
pub struct FilterSettings {
    pub batch_size: usize,
    pub max_session_retries: u32,
    pub max_attempts_per_batch: u32,
    pub time_unit: Duration,
    /// Pause before every call, reset to this after each success.
    pub base_delay_units: u32,
    /// Extra wait per attempt index after a rate-limited call.
    pub rate_limit_step_units: u32,
    /// Take a longer break before a batch whose first listing index is a
    /// positive multiple of this.
    pub pause_every: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            batch_size: 2,
            max_session_retries: 3,
            max_attempts_per_batch: 3,
            time_unit: Duration::from_secs(1),
            base_delay_units: 2,
            rate_limit_step_units: 5,
            pause_every: 10,
        }
    }
}

impl FilterSettings {
    fn base_delay(&self) -> Duration {
        self.time_unit.saturating_mul(self.base_delay_units)
    }

    fn validate(&self) -> Result<(), FilterError> {
        if self.batch_size == 0 {
            return Err(FilterError::InvalidConfig(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.pause_every == 0 {
            return Err(FilterError::InvalidConfig(
                "pause_every must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Mutable state scoped to a single `filter` call.
struct FilterRunState {
    session: Option<Box<dyn ChatSession>>,
    current_delay: Duration,
    consecutive_rate_limits: u32,
    relevant: Vec<JobListing>,
}

/// How one batch ended. A batch contributes its listings exactly once,
/// either through its decisions or wholesale.
#[derive(Debug, PartialEq)]
enum BatchOutcome {
    Filtered(Vec<bool>),
    FailedOpen,
}

pub struct BatchFilterEngine {
    connector: Arc<dyn SessionConnector>,
    settings: FilterSettings,
}

impl BatchFilterEngine {
    pub fn new(connector: Arc<dyn SessionConnector>) -> Self {
        Self::with_settings(connector, FilterSettings::default())
    }

    pub fn with_settings(connector: Arc<dyn SessionConnector>, settings: FilterSettings) -> Self {
        Self {
            connector,
            settings,
        }
    }

    async fn acquire_session(&self) -> Option<Box<dyn ChatSession>> {
        let max = self.settings.max_session_retries;
        for attempt in 0..max {
            info!("Chat session initialization attempt {}/{}", attempt + 1, max);
            match self.connector.connect().await {
                Ok(session) => return Some(session),
                Err(e) => {
                    warn!("Error initializing chat session: {e}");
                    let backoff = self
                        .settings
                        .time_unit
                        .saturating_mul(2u32.saturating_pow(attempt));
                    sleep(backoff).await;
                }
            }
        }
        None
    }

    async fn process_batch(
        &self,
        state: &mut FilterRunState,
        prompt: &str,
        batch_len: usize,
    ) -> BatchOutcome {
        let max = self.settings.max_attempts_per_batch;
        let base_delay = self.settings.base_delay();

        for attempt in 0..max {
            let last_attempt = attempt + 1 == max;
            info!("Sending batch request... (Attempt {}/{})", attempt + 1, max);
            sleep(state.current_delay).await;

            let result = match &state.session {
                Some(session) => session.submit(prompt).await,
                None => Err(SubmitError::Other("no active chat session".to_string())),
            };

            match result {
                Ok(response) => {
                    debug!("Batch response: {response}");
                    state.consecutive_rate_limits = 0;
                    state.current_delay = base_delay;
                    return BatchOutcome::Filtered(parse_batch_response(&response, batch_len));
                }
                Err(SubmitError::RateLimited(message)) => {
                    warn!("Rate limited by chat backend: {message}");
                    state.consecutive_rate_limits += 1;
                    state.current_delay = base_delay
                        .saturating_mul(2u32.saturating_pow(state.consecutive_rate_limits));

                    if last_attempt {
                        warn!("Rate limit persists. Including all jobs in batch without filtering.");
                        return BatchOutcome::FailedOpen;
                    }
                    let wait = state.current_delay.saturating_add(
                        self.settings
                            .time_unit
                            .saturating_mul(self.settings.rate_limit_step_units * attempt),
                    );
                    warn!("Waiting {}s before retrying...", wait.as_secs_f32());
                    sleep(wait).await;
                }
                Err(SubmitError::Unauthorized(message)) => {
                    warn!("Authentication error ({message}). Reinitializing session...");
                    state.session = match self.connector.connect().await {
                        Ok(session) => Some(session),
                        Err(e) => {
                            warn!("Session reinitialization failed: {e}");
                            None
                        }
                    };

                    if last_attempt {
                        warn!("Including all jobs in batch despite auth error.");
                        return BatchOutcome::FailedOpen;
                    }
                }
                Err(SubmitError::Other(message)) => {
                    warn!("Including all jobs in batch despite error: {message}");
                    return BatchOutcome::FailedOpen;
                }
            }
        }

        warn!("Batch processing failed. Including all jobs in batch.");
        BatchOutcome::FailedOpen
    }
}

#[async_trait]
impl RelevanceFilter for BatchFilterEngine {
    fn name(&self) -> &str {
        "batch-chat"
    }

    async fn filter(
        &self,
        listings: &[JobListing],
        criteria: &SearchCriteria,
    ) -> Result<Vec<JobListing>, FilterError> {
        self.settings.validate()?;

        if listings.is_empty() {
            return Ok(Vec::new());
        }

        let Some(session) = self.acquire_session().await else {
            warn!(
                "Failed to initialize chat session after {} attempts. Returning all jobs without filtering.",
                self.settings.max_session_retries
            );
            return Ok(listings.to_vec());
        };

        let criteria_block = build_user_criteria_block(criteria);
        let batch_size = self.settings.batch_size;
        let mut state = FilterRunState {
            session: Some(session),
            current_delay: self.settings.base_delay(),
            consecutive_rate_limits: 0,
            relevant: Vec::with_capacity(listings.len()),
        };

        info!("Processing {} jobs for relevance...", listings.len());

        for (batch_number, batch) in listings.chunks(batch_size).enumerate() {
            let start = batch_number * batch_size;
            info!(
                "Batch {} (jobs {}-{})",
                batch_number + 1,
                start + 1,
                start + batch.len()
            );

            if start > 0 && start % self.settings.pause_every == 0 {
                let pause = state.current_delay.saturating_mul(2);
                info!(
                    "Taking a break to avoid rate limits... (waiting {}s)",
                    pause.as_secs_f32()
                );
                sleep(pause).await;
            }

            let prompt = build_batch_prompt(&criteria_block, batch);
            match self.process_batch(&mut state, &prompt, batch.len()).await {
                BatchOutcome::Filtered(decisions) => {
                    for (offset, (job, relevant)) in batch.iter().zip(decisions).enumerate() {
                        if relevant {
                            info!("Job {} is relevant", start + offset + 1);
                            state.relevant.push(job.clone());
                        } else {
                            debug!("Job {} is not relevant", start + offset + 1);
                        }
                    }
                }
                BatchOutcome::FailedOpen => state.relevant.extend_from_slice(batch),
            }
        }

        info!(
            "Relevance filtering kept {} of {} jobs",
            state.relevant.len(),
            listings.len()
        );
        Ok(state.relevant)
    }
}
