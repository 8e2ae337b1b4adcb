use std::sync::{Arc, Mutex};

use ai_client::{EmbedAgent, Gemini, OpenAi};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};
use plainread_common::{AiProvider, Config};
use tracing::info;

use crate::fidelity::TextEmbedder;

/// Adapts any `ai-client` embedding agent to [`TextEmbedder`].
pub struct AgentEmbedder<A> {
    agent: A,
}

impl<A: EmbedAgent> AgentEmbedder<A> {
    pub fn new(agent: A) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl<A: EmbedAgent> TextEmbedder for AgentEmbedder<A> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.agent.embed(text.to_string()).await
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        self.agent.embed_batch(texts).await
    }
}

/// Sentence-transformer model run in-process through ONNX Runtime.
///
/// The session needs `&mut` access and inference is CPU-bound, so each call
/// runs on the blocking pool and holds the lock for the whole batch.
pub struct LocalEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl LocalEmbedder {
    /// Load `model`, downloading it into the fastembed cache on first use.
    pub fn try_new(model: EmbeddingModel) -> Result<Self> {
        let options = TextInitOptions::new(model).with_show_download_progress(false);
        let model = TextEmbedding::try_new(options)
            .context("Failed to initialize local embedding model")?;
        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

#[async_trait]
impl TextEmbedder for LocalEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(vec![text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| anyhow!("local model returned no embedding"))
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let model = Arc::clone(&self.model);
        tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| anyhow!("local embedding model lock poisoned"))?;
            model.embed(texts, None)
        })
        .await?
    }
}

/// Map a configured model name to a fastembed model.
///
/// Accepts the Hugging Face model code (`Xenova/paraphrase-multilingual-mpnet-base-v2`)
/// or the enum variant name (`ParaphraseMLMpnetBaseV2`), both case-insensitive.
pub fn local_model(name: &str) -> Result<EmbeddingModel> {
    let name = name.trim();
    TextEmbedding::list_supported_models()
        .into_iter()
        .find(|info| info.model_code.eq_ignore_ascii_case(name))
        .map(|info| info.model)
        .or_else(|| name.parse().ok())
        .ok_or_else(|| anyhow!("unknown local embedding model '{name}'"))
}

/// Build the configured embedding backend.
pub fn build_embedder(config: &Config) -> Result<Arc<dyn TextEmbedder>> {
    let model = config.embedding_model.as_str();

    let embedder: Arc<dyn TextEmbedder> = match config.embedding_provider {
        AiProvider::Gemini => {
            let key = config.api_key(AiProvider::Gemini)?;
            let agent = Gemini::for_embeddings(key, model).with_timeout(config.ai_timeout)?;
            Arc::new(AgentEmbedder::new(agent))
        }
        AiProvider::OpenAi => {
            let key = config.api_key(AiProvider::OpenAi)?;
            let mut agent = OpenAi::for_embeddings(key, model);
            if let Some(base_url) = &config.openai_base_url {
                agent = agent.with_base_url(base_url);
            }
            Arc::new(AgentEmbedder::new(agent.with_timeout(config.ai_timeout)?))
        }
        AiProvider::Local => Arc::new(LocalEmbedder::try_new(local_model(model)?)?),
    };

    info!(provider = %config.embedding_provider, model, "Embedder ready");
    Ok(embedder)
}
