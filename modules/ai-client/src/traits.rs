use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// ChatAgent Trait
// =============================================================================

/// Single-turn text generation. Dyn-compatible so callers can hold
/// `Arc<dyn ChatAgent>` and swap providers at startup.
#[async_trait]
pub trait ChatAgent: Send + Sync {
    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    async fn chat_completion(&self, system: &str, user: &str) -> Result<String>;
}

// =============================================================================
// EmbedAgent Trait
// =============================================================================

#[async_trait]
pub trait EmbedAgent: Send + Sync {
    async fn embed(&self, text: impl Into<String> + Send) -> Result<Vec<f32>>;
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;
}
