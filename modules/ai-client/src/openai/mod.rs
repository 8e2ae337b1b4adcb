mod client;
pub(crate) mod types;

use crate::error::AiError;
use crate::traits::{ChatAgent, EmbedAgent};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

use client::OpenAiClient;

// =============================================================================
// OpenAi Agent
// =============================================================================

/// OpenAI (or any OpenAI-compatible server) chat and embedding client.
///
/// The underlying HTTP client is built once and shared by clones.
#[derive(Clone)]
pub struct OpenAi {
    pub(crate) model: String,
    embedding_model: String,
    client: OpenAiClient,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self {
            model: model.into(),
            embedding_model: "text-embedding-3-small".to_string(),
            client: OpenAiClient::new(&api_key),
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

// =============================================================================
// ChatAgent Implementation
// =============================================================================

#[async_trait]
impl ChatAgent for OpenAi {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat_completion(&self, system: &str, user: &str) -> Result<String> {
        let mut request = types::ChatRequest::new(&self.model)
            .message(types::WireMessage::system(system))
            .message(types::WireMessage::user(user));

        if types::uses_max_completion_tokens(&self.model) {
            request = request.max_completion_tokens(4096);
        } else {
            request = request.max_tokens(4096).temperature(0.0);
        }

        let response = self.client.chat(&request).await?;

        response
            .text()
            .ok_or_else(|| AiError::EmptyResponse("no content from OpenAI".into()).into())
    }
}

// =============================================================================
// EmbedAgent Implementation
// =============================================================================

#[async_trait]
impl EmbedAgent for OpenAi {
    async fn embed(&self, text: impl Into<String> + Send) -> Result<Vec<f32>> {
        self.client.embed(&self.embedding_model, &text.into()).await
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        self.client.embed_batch(&self.embedding_model, &texts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_new() {
        let ai = OpenAi::new("sk-test", "gpt-4o-mini");
        assert_eq!(ai.model(), "gpt-4o-mini");
        assert_eq!(ai.embedding_model(), "text-embedding-3-small");
    }

    #[test]
    fn test_openai_with_embedding_model() {
        let ai = OpenAi::new("sk-test", "gpt-4o-mini")
            .with_embedding_model("paraphrase-mpnet-base-v2");
        assert_eq!(ai.embedding_model(), "paraphrase-mpnet-base-v2");
    }

    #[test]
    fn test_openai_for_embeddings() {
        let ai = OpenAi::for_embeddings("sk-test", "text-embedding-3-large");
        assert_eq!(ai.embedding_model(), "text-embedding-3-large");
        assert_ne!(ai.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_openai_with_timeout() {
        let ai = OpenAi::new("sk-test", "gpt-4o-mini")
            .with_base_url("http://localhost:8080/v1/")
            .with_timeout(Duration::from_secs(5));
        assert!(ai.is_ok());
    }
}
