//! OpenAI-compatible embeddings endpoint client.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL};

use super::EmbeddingProvider;
use super::error::EmbeddingError;

#[derive(Debug, Clone)]
/// Configuration for [`HttpEmbedder`].
pub struct HttpEmbedderConfig {
    /// Full URL of the embeddings endpoint (e.g. `https://api.openai.com/v1/embeddings`).
    pub endpoint: String,
    /// Model name sent with every request.
    pub model: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Output dimension the model is expected to produce.
    pub dimensions: usize,
}

impl HttpEmbedderConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            dimensions: DEFAULT_EMBEDDING_DIM,
        }
    }

    pub fn model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!("endpoint must be an http(s) URL, got '{}'", self.endpoint),
            });
        }
        if self.model.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model must not be empty".to_string(),
            });
        }
        if self.dimensions == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "dimensions must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Calls an OpenAI-compatible `POST /embeddings` endpoint.
///
/// No request timeout is configured: callers own the deadline and cancel by
/// dropping the future, which aborts the in-flight request.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    config: HttpEmbedderConfig,
}

impl HttpEmbedder {
    pub fn new(config: HttpEmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| EmbeddingError::InvalidConfig {
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpEmbedderConfig {
        &self.config
    }

    #[instrument(skip(self, text), fields(model = %self.config.model, text_len = text.len()))]
    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut request = self.client.post(&self.config.endpoint).json(&EmbeddingRequest {
            model: &self.config.model,
            input: text,
        });
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(status = status.as_u16(), error = %e, "Failed to read error response body");
                    String::new()
                }
            };
            return Err(EmbeddingError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: EmbeddingResponse =
            serde_json::from_slice(&bytes).map_err(|e| EmbeddingError::MalformedResponse {
                reason: e.to_string(),
            })?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::MalformedResponse {
                reason: "response contained no embeddings".to_string(),
            })?;

        debug!(embedding_dim = embedding.len(), "Embedding received");
        Ok(embedding)
    }
}

impl EmbeddingProvider for HttpEmbedder {
    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.request_embedding(text).await
    }
}
