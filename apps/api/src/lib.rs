pub mod config;
pub mod errors;
pub mod jobs;
pub mod llm_client;
pub mod models;
pub mod relevance;
pub mod routes;
pub mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::jobs::pipeline::Pipeline;
use crate::jobs::snapshots::SnapshotWriter;
use crate::jobs::sources::JobSource;
use crate::llm_client::{HuggingChatConnector, OpenAiChat};
use crate::relevance::prompts::RELEVANCE_SYSTEM;
use crate::relevance::{BatchFilterEngine, FallbackFilter};

/// Installs structured logging. `RUST_LOG` in the environment wins over
/// `default_level`, which applies to this crate and the HTTP trace layer.
pub fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={default_level},tower_http={default_level}",
                env!("CARGO_CRATE_NAME")
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wires the primary and secondary relevance filters around `source`.
pub fn build_pipeline(
    config: &Config,
    source: Arc<dyn JobSource>,
    snapshots: Option<SnapshotWriter>,
) -> Result<Pipeline> {
    let connector = HuggingChatConnector::new(
        config.huggingchat_url.clone(),
        config.huggingchat_credentials(),
    )
    .with_model(config.huggingchat_model.clone());
    let primary = BatchFilterEngine::new(Arc::new(connector));

    let fallback = match &config.openai_api_key {
        Some(key) => {
            let chat = OpenAiChat::new(key.clone(), config.openai_base_url.clone(), RELEVANCE_SYSTEM)
                .context("Failed to build OpenAI client")?;
            FallbackFilter::new(Arc::new(chat))
        }
        None => FallbackFilter::disabled(),
    };

    Ok(Pipeline::new(source, Arc::new(primary), Arc::new(fallback))
        .with_snapshots(snapshots)
        .with_limits(config.results_wanted, config.hours_old))
}
