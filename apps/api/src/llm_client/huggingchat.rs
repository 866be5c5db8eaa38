//! Primary chat provider: a cookie-authenticated HuggingChat conversation.
//!
//! Each `connect` builds a new HTTP client around an empty cookie jar, logs in,
//! opens a conversation and sends the verification prompt before handing the
//! session out. Stale cookies therefore never survive into a new session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::prompts::VERIFICATION_PROMPT;
use super::{preview, ChatSession, SessionConnector, SessionInitError, SubmitError};

pub const DEFAULT_BASE_URL: &str = "https://huggingface.co/chat";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Clone)]
pub struct HuggingChatCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct HuggingChatConnector {
    base_url: String,
    credentials: HuggingChatCredentials,
    model: Option<String>,
}

impl HuggingChatConnector {
    pub fn new(base_url: impl Into<String>, credentials: HuggingChatCredentials) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            model: None,
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    async fn login(&self, client: &Client) -> Result<(), SessionInitError> {
        let response = client
            .post(format!("{}/login", self.base_url))
            .form(&[
                ("username", self.credentials.email.as_str()),
                ("password", self.credentials.password.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SessionInitError::Login(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionInitError::Login(format!(
                "login endpoint returned {status}"
            )));
        }
        Ok(())
    }

    async fn open_conversation(&self, client: &Client) -> Result<String, SessionInitError> {
        let response = client
            .post(format!("{}/conversation", self.base_url))
            .json(&NewConversation {
                model: self.model.as_deref(),
            })
            .send()
            .await
            .map_err(|e| SessionInitError::Conversation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionInitError::Conversation(format!(
                "conversation endpoint returned {status}"
            )));
        }

        let created: ConversationCreated = response
            .json()
            .await
            .map_err(|e| SessionInitError::Conversation(e.to_string()))?;
        Ok(created.conversation_id)
    }
}

#[async_trait]
impl SessionConnector for HuggingChatConnector {
    async fn connect(&self) -> Result<Box<dyn ChatSession>, SessionInitError> {
        info!("Creating new login session...");

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(SessionInitError::Client)?;

        self.login(&client).await?;

        let session_url =
            Url::parse(&self.base_url).map_err(|e| SessionInitError::Login(e.to_string()))?;
        if jar.cookies(&session_url).is_none() {
            return Err(SessionInitError::CookieSetup);
        }

        let conversation_id = self.open_conversation(&client).await?;
        let session = HuggingChatSession {
            client,
            base_url: self.base_url.clone(),
            conversation_id,
        };

        let greeting = session
            .submit(VERIFICATION_PROMPT)
            .await
            .map_err(SessionInitError::Verification)?;
        info!(
            "Connection test successful. Response: {}",
            preview(&greeting, 30)
        );

        Ok(Box::new(session))
    }
}

pub struct HuggingChatSession {
    client: Client,
    base_url: String,
    conversation_id: String,
}

#[async_trait]
impl ChatSession for HuggingChatSession {
    async fn submit(&self, prompt: &str) -> Result<String, SubmitError> {
        let response = self
            .client
            .post(format!(
                "{}/conversation/{}",
                self.base_url, self.conversation_id
            ))
            .json(&ChatInput {
                inputs: prompt,
                is_retry: false,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SubmitError::from_status(status.as_u16(), body));
        }

        let answer = collect_answer(&body);
        if answer.trim().is_empty() {
            return Err(SubmitError::Other("backend returned an empty answer".to_string()));
        }
        debug!("HuggingChat answered with {} chars", answer.len());
        Ok(answer)
    }
}

#[derive(Debug, Serialize)]
struct NewConversation<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ConversationCreated {
    #[serde(rename = "conversationId")]
    conversation_id: String,
}

#[derive(Debug, Serialize)]
struct ChatInput<'a> {
    inputs: &'a str,
    is_retry: bool,
}

#[derive(Debug, Deserialize)]
struct StreamUpdate {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

/// Reduces a streamed answer to its full text.
///
/// The backend answers with one JSON update per line. A `finalAnswer` update
/// carries the whole text; otherwise the `stream` tokens are concatenated.
/// Bodies that are not line-delimited JSON are returned verbatim.
fn collect_answer(body: &str) -> String {
    let mut streamed = String::new();
    let mut saw_update = false;

    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Ok(update) = serde_json::from_str::<StreamUpdate>(line) else {
            continue;
        };
        saw_update = true;
        match update.kind.as_str() {
            "finalAnswer" => {
                if let Some(text) = update.text {
                    return text.trim_end_matches('\0').to_string();
                }
            }
            "stream" => {
                if let Some(token) = update.token {
                    streamed.push_str(token.trim_end_matches('\0'));
                }
            }
            _ => {}
        }
    }

    if saw_update {
        streamed
    } else {
        body.trim().to_string()
    }
}
