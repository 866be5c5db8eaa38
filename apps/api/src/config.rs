use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::jobs::pipeline::{DEFAULT_HOURS_OLD, DEFAULT_RESULTS_WANTED};
use crate::llm_client::{huggingchat, openai, HuggingChatCredentials};

pub const DEFAULT_JOB_SOURCE_URL: &str = "http://127.0.0.1:8001/scrape";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub huggingchat_email: String,
    pub huggingchat_password: String,
    pub huggingchat_url: String,
    pub huggingchat_model: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub job_source_url: String,
    pub results_wanted: u32,
    pub hours_old: u32,
    /// Snapshot directory; snapshots are skipped when unset.
    pub output_dir: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            huggingchat_email: require_env("HUGGINGCHAT_EMAIL")?,
            huggingchat_password: require_env("HUGGINGCHAT_PASSWORD")?,
            huggingchat_url: optional_env("HUGGINGCHAT_URL")
                .unwrap_or_else(|| huggingchat::DEFAULT_BASE_URL.to_string()),
            huggingchat_model: optional_env("HUGGINGCHAT_MODEL"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| openai::DEFAULT_BASE_URL.to_string()),
            job_source_url: optional_env("JOB_SOURCE_URL")
                .unwrap_or_else(|| DEFAULT_JOB_SOURCE_URL.to_string()),
            results_wanted: parse_env("RESULTS_WANTED", DEFAULT_RESULTS_WANTED)?,
            hours_old: parse_env("HOURS_OLD", DEFAULT_HOURS_OLD)?,
            output_dir: optional_env("OUTPUT_DIR").map(PathBuf::from),
            port: parse_env("PORT", 8000)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn huggingchat_credentials(&self) -> HuggingChatCredentials {
        HuggingChatCredentials {
            email: self.huggingchat_email.clone(),
            password: self.huggingchat_password.clone(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
