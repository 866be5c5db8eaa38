//! Secondary chat provider: OpenAI chat completions.
//!
//! Stateless per call (API-key auth), so it implements `ChatSession` directly
//! without a connector.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatSession, SubmitError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const MODEL: &str = "gpt-3.5-turbo";
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 200;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<CompletionMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct CompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct OpenAiChat {
    client: Client,
    api_key: String,
    base_url: String,
    system_prompt: String,
}

impl OpenAiChat {
    pub fn new(
        api_key: String,
        base_url: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()?,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            system_prompt: system_prompt.into(),
        })
    }
}

#[async_trait]
impl ChatSession for OpenAiChat {
    async fn submit(&self, prompt: &str) -> Result<String, SubmitError> {
        let request = CompletionRequest {
            model: MODEL,
            messages: vec![
                CompletionMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                CompletionMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(SubmitError::from_status(status.as_u16(), message));
        }

        let completion: CompletionResponse = response.json().await?;
        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SubmitError::Other("completion had no content".to_string()))?;

        debug!("OpenAI answered with {} chars", text.len());
        Ok(text)
    }
}
