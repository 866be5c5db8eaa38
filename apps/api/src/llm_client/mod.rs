/// Chat backend client: the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: relevance filtering talks to a backend only through
/// `SessionConnector` / `ChatSession`. Concrete providers live in submodules:
/// - `huggingchat`: primary provider, cookie-authenticated conversation session
/// - `openai`: secondary provider, API-key authenticated chat completions
use async_trait::async_trait;
use thiserror::Error;

pub mod huggingchat;
pub mod openai;
pub mod prompts;

pub use huggingchat::{HuggingChatConnector, HuggingChatCredentials};
pub use openai::OpenAiChat;

/// Failure of one `submit` call, classified so callers can choose a retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("rate limited (429): {0}")]
    RateLimited(String),

    #[error("unauthorized (401): {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Other(String),
}

impl SubmitError {
    /// Classifies a non-success HTTP response.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            429 => SubmitError::RateLimited(message),
            401 => SubmitError::Unauthorized(message),
            _ => SubmitError::Other(format!("status {status}: {message}")),
        }
    }

    /// Classifies an error that only carries text, e.g. a transport failure
    /// whose message embeds the upstream status code.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains("429") {
            SubmitError::RateLimited(message)
        } else if message.contains("401") {
            SubmitError::Unauthorized(message)
        } else {
            SubmitError::Other(message)
        }
    }
}

impl From<reqwest::Error> for SubmitError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => SubmitError::from_status(status.as_u16(), e.to_string()),
            None => SubmitError::from_message(e.to_string()),
        }
    }
}

/// Failure to produce a live, verified session.
#[derive(Debug, Error)]
pub enum SessionInitError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("login failed: {0}")]
    Login(String),

    #[error("login did not establish a session cookie")]
    CookieSetup,

    #[error("failed to open conversation: {0}")]
    Conversation(String),

    #[error("session verification failed: {0}")]
    Verification(#[source] SubmitError),
}

/// A live handle to a text-generation backend.
///
/// `submit` resolves only once the complete response text is available.
#[async_trait]
pub trait ChatSession: Send + Sync {
    async fn submit(&self, prompt: &str) -> Result<String, SubmitError>;
}

/// Produces fresh sessions. Every call starts from a clean login; sessions are
/// never reused across acquisitions.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn ChatSession>, SessionInitError>;
}

/// Truncates a response for log output.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
