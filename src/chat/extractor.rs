//! Fallback extraction of a bare query from noisy model output.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Errors from a completion client.
///
/// These stay inside the extractor: callers of [`QueryExtractor::extract`]
/// only ever see [`Extraction::Unavailable`].
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion endpoint returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

/// One-shot instruction-following model call.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends `instruction` with `input` appended and returns the model's
    /// text response.
    async fn complete(&self, instruction: &str, input: &str) -> Result<String, CompletionError>;
}

/// Outcome of a query extraction attempt.
///
/// There is no error side: whenever no query can be isolated, the caller
/// displays the original text unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Extraction {
    /// A bare query isolated from the candidate text.
    Query(String),
    /// No query could be isolated.
    Unavailable,
}

impl Extraction {
    pub fn into_query(self) -> Option<String> {
        match self {
            Self::Query(query) => Some(query),
            Self::Unavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

/// Asks a secondary model to isolate a clean query from candidate text.
///
/// Inputs shorter than the minimum length come back as
/// [`Extraction::Unavailable`] without any external call; nothing that
/// short plausibly contains a query. A failed call or an empty response is
/// also `Unavailable`, logged and swallowed, so this path never raises
/// toward the UI.
pub struct QueryExtractor {
    client: Arc<dyn CompletionClient>,
    min_len: usize,
}

impl QueryExtractor {
    /// Instruction sent ahead of the candidate text.
    pub const INSTRUCTION: &str =
        "Extract only the bare query. Do not add commentary, quoting, or surrounding text.";

    pub const DEFAULT_MIN_LEN: usize = 5;

    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            min_len: Self::DEFAULT_MIN_LEN,
        }
    }

    /// Overrides the short-input threshold.
    ///
    /// The default of 5 characters means nothing beyond "very short inputs
    /// are not queries"; callers expecting terse queries such as `1=1` can
    /// lower it.
    #[must_use]
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    /// Attempts to isolate a bare query from `text`.
    pub async fn extract(&self, text: &str) -> Extraction {
        if text.chars().count() < self.min_len {
            return Extraction::Unavailable;
        }
        match self.client.complete(Self::INSTRUCTION, text).await {
            Ok(response) if response.trim().is_empty() => Extraction::Unavailable,
            Ok(response) => Extraction::Query(response),
            Err(error) => {
                tracing::warn!(%error, "query extraction unavailable");
                Extraction::Unavailable
            }
        }
    }
}

/// Client for an OpenAI-style `/chat/completions` endpoint.
pub struct HttpCompletionClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpCompletionClient {
    pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
    pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, instruction: &str, input: &str) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {"role": "user", "content": format!("{instruction}\n\n{input}")},
                ],
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: CompletionResponse = response.json().await?;
        let first = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::MalformedResponse("empty choices".to_string()))?;
        Ok(first.message.content)
    }
}
