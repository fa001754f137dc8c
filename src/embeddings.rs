//! Embedding provider seam: an HTTP JSON provider and a deterministic mock.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Errors from an embedding provider.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding endpoint returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),
}

/// Turns a chunk of text into a numeric vector.
///
/// Implementations own request shaping only. Rate limiting, retries, and
/// credential rotation stay with the provider service or the operator.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Dimension of the vectors this provider produces.
    fn dimensions(&self) -> usize;
}

/// Provider backed by an OpenAI-style `/embeddings` endpoint.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    dimensions: usize,
}

impl HttpEmbeddingProvider {
    pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";
    pub const DEFAULT_MODEL: &str = "text-embedding-ada-002";
    pub const DEFAULT_DIMENSIONS: usize = 1536;

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            dimensions: Self::DEFAULT_DIMENSIONS,
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

    #[must_use]
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "input": text,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingResponse = response.json().await?;
        let first = body
            .data
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::MalformedResponse("empty data array".to_string()))?;
        Ok(first.embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Deterministic provider for tests and keyless demo runs.
///
/// Vectors are derived from a hash of the input, so identical text always
/// embeds identically while distinct texts almost always differ.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    pub const DEFAULT_DIMENSIONS: usize = 8;

    pub fn new() -> Self {
        Self {
            dimensions: Self::DEFAULT_DIMENSIONS,
        }
    }

    #[must_use]
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(hash_to_vec(text, self.dimensions))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn hash_to_vec(text: &str, dimensions: usize) -> Vec<f32> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let seed = hasher.finish();
    (0..dimensions)
        .map(|i| {
            let bits = seed.rotate_left((i as u32 * 8) % 64) ^ ((i as u64) << 24);
            (bits as f32) / u32::MAX as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    #[tokio::test]
    async fn mock_provider_is_deterministic() {
        let provider = MockEmbeddingProvider::new();
        let first = provider.embed("SELECT 1").await.unwrap();
        let second = provider.embed("SELECT 1").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), provider.dimensions());
    }

    #[tokio::test]
    async fn mock_provider_separates_distinct_text() {
        let provider = MockEmbeddingProvider::new();
        let left = provider.embed("orders table").await.unwrap();
        let right = provider.embed("customers table").await.unwrap();
        assert_ne!(left, right);
    }

    #[tokio::test]
    async fn http_provider_parses_embedding_response() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/embeddings");
                then.status(200).json_body(serde_json::json!({
                    "data": [{"embedding": [1.0, 2.0, 3.0]}]
                }));
            })
            .await;

        let provider = HttpEmbeddingProvider::new("test-key")
            .with_endpoint(server.url("/embeddings"))
            .with_dimensions(3);
        let vector = provider.embed("hello tables").await.unwrap();
        assert_eq!(vector, vec![1.0, 2.0, 3.0]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_provider_reports_api_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/embeddings");
                then.status(429).body("rate limited");
            })
            .await;

        let provider =
            HttpEmbeddingProvider::new("test-key").with_endpoint(server.url("/embeddings"));
        let err = provider.embed("hello").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Api { status: 429, .. }));
    }

    #[tokio::test]
    async fn http_provider_rejects_empty_data() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/embeddings");
                then.status(200).json_body(serde_json::json!({ "data": [] }));
            })
            .await;

        let provider =
            HttpEmbeddingProvider::new("test-key").with_endpoint(server.url("/embeddings"));
        let err = provider.embed("hello").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::MalformedResponse(_)));
    }
}
