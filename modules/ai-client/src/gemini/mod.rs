mod client;
pub(crate) mod types;

use crate::error::AiError;
use crate::traits::{ChatAgent, EmbedAgent};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

use client::GeminiClient;

// =============================================================================
// Gemini Agent
// =============================================================================

/// Google Gemini generation and embedding client (Generative Language API).
#[derive(Clone)]
pub struct Gemini {
    pub(crate) model: String,
    embedding_model: String,
    client: GeminiClient,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self {
            model: model.into(),
            embedding_model: "text-embedding-004".to_string(),
            client: GeminiClient::new(&api_key),
        }
    }

    /// Client that only embeds; `model` names the embedding model.
    pub fn for_embeddings(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        Self::new(api_key, model.clone()).with_embedding_model(model)
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(&url.into());
        self
    }

    /// Bound every request (connect + response) by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = self.client.with_timeout(timeout)?;
        Ok(self)
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }
}

#[async_trait]
impl ChatAgent for Gemini {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat_completion(&self, system: &str, user: &str) -> Result<String> {
        let request = types::GenerateRequest::new()
            .system(system)
            .user(user)
            .temperature(0.0)
            .max_output_tokens(4096);

        let response = self.client.generate(&self.model, &request).await?;

        response
            .completion()
            .map_err(|why| AiError::EmptyResponse(why).into())
    }
}

#[async_trait]
impl EmbedAgent for Gemini {
    async fn embed(&self, text: impl Into<String> + Send) -> Result<Vec<f32>> {
        self.client.embed(&self.embedding_model, &text.into()).await
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        self.client.embed_batch(&self.embedding_model, &texts).await
    }
}
