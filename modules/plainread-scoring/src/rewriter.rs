use std::sync::Arc;

use ai_client::{strip_code_blocks, strip_wrapping_quotes, ChatAgent, Gemini, OpenAi};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use plainread_common::{AiProvider, Config, PromptPreset};
use tracing::{debug, info};

/// Produces a candidate simplified text.
#[async_trait]
pub trait RewriteProvider: Send + Sync {
    async fn rewrite(&self, text: &str) -> Result<String>;
}

const STRUCTURED_PROMPT: &str = "\
You rewrite text so that it is easy to read for people with dyslexia.

Follow these rules:
- Use sentences of medium length. Avoid very long sentences with many clauses.
- Prefer simple, common words over rare or technical ones.
- Break dense information into short chunks.
- Say things directly. Use the active voice.
- Replace idioms and figures of speech with their literal meaning.
- Keep every fact and instruction from the original. Do not add new information.

Reply with the rewritten text only. Do not add a title, notes, or quotation marks.";

const PLAIN_PROMPT: &str = "\
Rewrite the text below for a reader with dyslexia. Use short sentences and \
simple words. Keep paragraphs short. Keep the meaning the same. \
Answer in plain text only, with no formatting and no commentary.";

fn system_prompt(preset: PromptPreset) -> &'static str {
    match preset {
        PromptPreset::Structured => STRUCTURED_PROMPT,
        PromptPreset::Plain => PLAIN_PROMPT,
    }
}

fn user_prompt(text: &str) -> String {
    format!("Original Text:\n\"{text}\"")
}

/// Strip the wrapping models like to add around a rewrite.
fn clean_response(raw: &str) -> String {
    let unfenced = strip_code_blocks(raw.trim());
    strip_wrapping_quotes(unfenced.trim()).trim().to_string()
}

/// Rewrites through a hosted chat model with a fixed instruction preset.
pub struct LlmRewriter {
    agent: Arc<dyn ChatAgent>,
    preset: PromptPreset,
}

impl LlmRewriter {
    pub fn new(agent: Arc<dyn ChatAgent>, preset: PromptPreset) -> Self {
        Self { agent, preset }
    }

    pub fn preset(&self) -> PromptPreset {
        self.preset
    }
}

#[async_trait]
impl RewriteProvider for LlmRewriter {
    async fn rewrite(&self, text: &str) -> Result<String> {
        let raw = self
            .agent
            .chat_completion(system_prompt(self.preset), &user_prompt(text))
            .await
            .with_context(|| format!("Rewrite request to {} failed", self.agent.model()))?;

        let rewritten = clean_response(&raw);
        if rewritten.is_empty() {
            bail!("{} returned an empty rewrite", self.agent.model());
        }

        debug!(
            model = self.agent.model(),
            input_chars = text.len(),
            output_chars = rewritten.len(),
            "Rewrite received"
        );
        Ok(rewritten)
    }
}

/// Build the configured rewrite backend.
pub fn build_rewriter(config: &Config) -> Result<Arc<dyn RewriteProvider>> {
    let key = config.api_key(config.rewrite_provider)?;
    let model = config.rewrite_model.as_str();

    let agent: Arc<dyn ChatAgent> = match config.rewrite_provider {
        AiProvider::Gemini => Arc::new(Gemini::new(key, model).with_timeout(config.ai_timeout)?),
        AiProvider::OpenAi => {
            let mut agent = OpenAi::new(key, model);
            if let Some(base_url) = &config.openai_base_url {
                agent = agent.with_base_url(base_url);
            }
            Arc::new(agent.with_timeout(config.ai_timeout)?)
        }
        AiProvider::Local => bail!("provider '{}' cannot rewrite text", config.rewrite_provider),
    };

    info!(
        provider = %config.rewrite_provider,
        model,
        preset = ?config.prompt_preset,
        "Rewriter ready"
    );
    Ok(Arc::new(LlmRewriter::new(agent, config.prompt_preset)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays one canned reply and records the prompts it was sent.
    struct CannedAgent {
        reply: Result<String, String>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl CannedAgent {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatAgent for CannedAgent {
        fn model(&self) -> &str {
            "canned-model"
        }

        async fn chat_completion(&self, system: &str, user: &str) -> Result<String> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            self.reply.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    #[tokio::test]
    async fn sends_preset_and_quoted_text() {
        let agent = CannedAgent::replying("Short text.");
        let rewriter = LlmRewriter::new(agent.clone(), PromptPreset::Plain);

        let out = rewriter.rewrite("Long text.").await.unwrap();
        assert_eq!(out, "Short text.");

        let seen = agent.seen.lock().unwrap();
        assert_eq!(seen[0].0, PLAIN_PROMPT);
        assert_eq!(seen[0].1, "Original Text:\n\"Long text.\"");
    }

    #[tokio::test]
    async fn structured_is_the_default_preset() {
        let agent = CannedAgent::replying("ok then");
        let rewriter = LlmRewriter::new(agent.clone(), PromptPreset::default());
        rewriter.rewrite("x").await.unwrap();
        assert!(agent.seen.lock().unwrap()[0].0.contains("active voice"));
    }

    #[tokio::test]
    async fn cleans_fences_and_quotes() {
        let agent = CannedAgent::replying("```text\n\"The plan is simple.\"\n```");
        let rewriter = LlmRewriter::new(agent, PromptPreset::Structured);
        assert_eq!(rewriter.rewrite("x").await.unwrap(), "The plan is simple.");
    }

    #[tokio::test]
    async fn empty_reply_is_an_error() {
        let agent = CannedAgent::replying("  \"\"  ");
        let rewriter = LlmRewriter::new(agent, PromptPreset::Structured);
        let err = rewriter.rewrite("x").await.unwrap_err();
        assert!(err.to_string().contains("empty rewrite"));
    }

    #[tokio::test]
    async fn agent_error_carries_model_context() {
        let agent = CannedAgent::failing("quota exceeded");
        let rewriter = LlmRewriter::new(agent, PromptPreset::Structured);
        let err = rewriter.rewrite("x").await.unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "Rewrite request to canned-model failed: quota exceeded"
        );
    }

    #[test]
    fn clean_response_trims() {
        assert_eq!(clean_response("  plain answer \n"), "plain answer");
        assert_eq!(clean_response("“Curly quoted.”"), "Curly quoted.");
    }
}
