use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::PlainreadError;
use crate::types::{PromptPreset, ThresholdPolicy, DEFAULT_MIN_DIFFICULTY_DELTA, DEFAULT_MIN_FIDELITY};

/// Model family a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    Gemini,
    /// OpenAI or any server exposing the OpenAI-compatible API.
    OpenAi,
    /// Sentence-transformer model run in-process. Embeddings only.
    Local,
}

impl AiProvider {
    fn default_chat_model(self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini-2.0-flash",
            AiProvider::OpenAi | AiProvider::Local => "gpt-4o-mini",
        }
    }

    fn default_embedding_model(self) -> &'static str {
        match self {
            AiProvider::Gemini => "text-embedding-004",
            AiProvider::OpenAi => "text-embedding-3-small",
            AiProvider::Local => "Xenova/paraphrase-multilingual-mpnet-base-v2",
        }
    }

    /// Whether requests to this provider carry an API key.
    pub fn uses_api_key(self) -> bool {
        !matches!(self, AiProvider::Local)
    }
}

impl FromStr for AiProvider {
    type Err = PlainreadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(AiProvider::Gemini),
            "openai" => Ok(AiProvider::OpenAi),
            "local" | "fastembed" => Ok(AiProvider::Local),
            other => Err(PlainreadError::Config(format!(
                "unknown provider '{other}' (expected 'gemini', 'openai' or 'local')"
            ))),
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiProvider::Gemini => f.write_str("gemini"),
            AiProvider::OpenAi => f.write_str("openai"),
            AiProvider::Local => f.write_str("local"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Rewrite provider
    pub rewrite_provider: AiProvider,
    pub rewrite_model: String,
    pub prompt_preset: PromptPreset,

    // Embeddings
    pub embedding_provider: AiProvider,
    pub embedding_model: String,

    // Credentials
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub ai_timeout: Duration,

    // Scoring
    pub vocabulary_path: PathBuf,
    pub min_semantic_similarity: f64,
    pub min_difficulty_delta: f64,
    pub require_easier: bool,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self, PlainreadError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PlainreadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let rewrite_provider: AiProvider = match get("REWRITE_PROVIDER") {
            Some(v) => v.parse()?,
            None => AiProvider::Gemini,
        };
        if rewrite_provider == AiProvider::Local {
            return Err(PlainreadError::Config(
                "REWRITE_PROVIDER 'local' only serves embeddings; use 'gemini' or 'openai'".into(),
            ));
        }
        let embedding_provider: AiProvider = match get("EMBEDDING_PROVIDER") {
            Some(v) => v.parse()?,
            None => AiProvider::Gemini,
        };

        let config = Self {
            rewrite_provider,
            rewrite_model: get("REWRITE_MODEL")
                .unwrap_or_else(|| rewrite_provider.default_chat_model().to_string()),
            prompt_preset: match get("PROMPT_PRESET") {
                Some(v) => v.parse()?,
                None => PromptPreset::default(),
            },
            embedding_provider,
            embedding_model: get("EMBEDDING_MODEL")
                .unwrap_or_else(|| embedding_provider.default_embedding_model().to_string()),
            gemini_api_key: get("GEMINI_API_KEY"),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL"),
            ai_timeout: Duration::from_secs(parse_or("AI_TIMEOUT_SECS", get("AI_TIMEOUT_SECS"), 60u64)?),
            vocabulary_path: get("VOCABULARY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/usr/share/dict/words")),
            min_semantic_similarity: parse_or(
                "MIN_SEMANTIC_SIMILARITY",
                get("MIN_SEMANTIC_SIMILARITY"),
                DEFAULT_MIN_FIDELITY,
            )?,
            min_difficulty_delta: parse_or(
                "MIN_DIFFICULTY_DELTA",
                get("MIN_DIFFICULTY_DELTA"),
                DEFAULT_MIN_DIFFICULTY_DELTA,
            )?,
            require_easier: parse_bool("REQUIRE_EASIER", get("REQUIRE_EASIER"))?,
            web_host: get("WEB_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            web_port: parse_or("WEB_PORT", get("WEB_PORT"), 5000u16)?,
        };

        config.api_key(config.rewrite_provider)?;
        if config.embedding_provider.uses_api_key() {
            config.api_key(config.embedding_provider)?;
        }
        config.threshold_policy_unchecked().validate()?;

        Ok(config)
    }

    /// API key for `provider`; errors if it was not configured.
    pub fn api_key(&self, provider: AiProvider) -> Result<&str, PlainreadError> {
        let (key, var) = match provider {
            AiProvider::Gemini => (self.gemini_api_key.as_deref(), "GEMINI_API_KEY"),
            AiProvider::OpenAi => (self.openai_api_key.as_deref(), "OPENAI_API_KEY"),
            AiProvider::Local => {
                return Err(PlainreadError::Config(format!(
                    "provider '{provider}' does not use an API key"
                )))
            }
        };
        key.ok_or_else(|| {
            PlainreadError::Config(format!(
                "{var} environment variable is required for provider '{provider}'"
            ))
        })
    }

    /// Acceptance thresholds. Logs a warning for each setting that disables part of the gate.
    pub fn threshold_policy(&self) -> ThresholdPolicy {
        let policy = self.threshold_policy_unchecked();
        for warning in policy.warnings() {
            warn!("{warning}");
        }
        policy
    }

    fn threshold_policy_unchecked(&self) -> ThresholdPolicy {
        ThresholdPolicy {
            min_fidelity: self.min_semantic_similarity,
            min_difficulty_delta: self.min_difficulty_delta,
            require_easier: self.require_easier,
        }
    }

    /// Log the effective configuration without secrets.
    pub fn log_redacted(&self) {
        info!(
            rewrite_provider = %self.rewrite_provider,
            rewrite_model = self.rewrite_model.as_str(),
            prompt_preset = ?self.prompt_preset,
            embedding_provider = %self.embedding_provider,
            embedding_model = self.embedding_model.as_str(),
            gemini_api_key = redact(&self.gemini_api_key),
            openai_api_key = redact(&self.openai_api_key),
            openai_base_url = self.openai_base_url.as_deref().unwrap_or("default"),
            ai_timeout_secs = self.ai_timeout.as_secs(),
            vocabulary_path = %self.vocabulary_path.display(),
            min_semantic_similarity = self.min_semantic_similarity,
            min_difficulty_delta = self.min_difficulty_delta,
            require_easier = self.require_easier,
            "Configuration loaded"
        );
    }
}

fn redact(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "set"
    } else {
        "unset"
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T, PlainreadError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| PlainreadError::Config(format!("{key}='{raw}' is invalid: {e}"))),
    }
}

fn parse_bool(key: &str, value: Option<String>) -> Result<bool, PlainreadError> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(PlainreadError::Config(format!(
                "{key}='{v}' is not a boolean"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_with_gemini_key() {
        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "g-key")])).unwrap();
        assert_eq!(config.rewrite_provider, AiProvider::Gemini);
        assert_eq!(config.rewrite_model, "gemini-2.0-flash");
        assert_eq!(config.embedding_model, "text-embedding-004");
        assert_eq!(config.prompt_preset, PromptPreset::Structured);
        assert_eq!(config.min_semantic_similarity, 0.5);
        assert_eq!(config.min_difficulty_delta, 0.06);
        assert!(!config.require_easier);
        assert_eq!(config.web_port, 5000);
        assert_eq!(config.ai_timeout, Duration::from_secs(60));
        assert_eq!(config.threshold_policy(), ThresholdPolicy::default());
    }

    #[test]
    fn missing_provider_key_is_an_error() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn openai_embeddings_need_openai_key() {
        let err = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "g-key"),
            ("EMBEDDING_PROVIDER", "openai"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn openai_everything() {
        let config = Config::from_lookup(lookup(&[
            ("REWRITE_PROVIDER", "openai"),
            ("EMBEDDING_PROVIDER", "OpenAI"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
            ("EMBEDDING_MODEL", "paraphrase-mpnet-base-v2"),
        ]))
        .unwrap();
        assert_eq!(config.rewrite_model, "gpt-4o-mini");
        assert_eq!(config.embedding_model, "paraphrase-mpnet-base-v2");
        assert_eq!(config.api_key(AiProvider::OpenAi).unwrap(), "sk-test");
        assert!(config.api_key(AiProvider::Gemini).is_err());
    }

    #[test]
    fn local_embeddings_need_no_key() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "g-key"),
            ("EMBEDDING_PROVIDER", "local"),
        ]))
        .unwrap();
        assert_eq!(config.embedding_provider, AiProvider::Local);
        assert_eq!(
            config.embedding_model,
            "Xenova/paraphrase-multilingual-mpnet-base-v2"
        );
        assert!(!config.embedding_provider.uses_api_key());
        assert!(config.api_key(AiProvider::Local).is_err());
    }

    #[test]
    fn local_rewrites_are_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "g-key"),
            ("REWRITE_PROVIDER", "local"),
        ]))
        .unwrap_err();
        assert!(matches!(err, PlainreadError::Config(_)));
        assert!(err.to_string().contains("REWRITE_PROVIDER"));
    }

    #[test]
    fn provider_names_parse() {
        assert_eq!("Google".parse::<AiProvider>().unwrap(), AiProvider::Gemini);
        assert_eq!("fastembed".parse::<AiProvider>().unwrap(), AiProvider::Local);
        assert_eq!(AiProvider::Local.to_string(), "local");
        assert!("cohere".parse::<AiProvider>().is_err());
    }

    #[test]
    fn thresholds_and_flags_parse() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "g-key"),
            ("MIN_SEMANTIC_SIMILARITY", "0.7"),
            ("MIN_DIFFICULTY_DELTA", " 0.1 "),
            ("REQUIRE_EASIER", "yes"),
            ("PROMPT_PRESET", "plain"),
        ]))
        .unwrap();
        let policy = config.threshold_policy();
        assert_eq!(policy.min_fidelity, 0.7);
        assert_eq!(policy.min_difficulty_delta, 0.1);
        assert!(policy.require_easier);
        assert_eq!(config.prompt_preset, PromptPreset::Plain);
    }

    #[test]
    fn malformed_threshold_is_an_error() {
        let err = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "g-key"),
            ("MIN_DIFFICULTY_DELTA", "lots"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("MIN_DIFFICULTY_DELTA"));
    }

    #[test]
    fn non_finite_threshold_is_an_error() {
        let result = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "g-key"),
            ("MIN_SEMANTIC_SIMILARITY", "NaN"),
        ]));
        assert!(matches!(result, Err(PlainreadError::Config(_))));
    }

    #[test]
    fn zero_thresholds_load_but_warn() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "g-key"),
            ("MIN_SEMANTIC_SIMILARITY", "0"),
            ("MIN_DIFFICULTY_DELTA", "0"),
        ]))
        .unwrap();
        assert_eq!(config.threshold_policy().warnings().len(), 2);
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "g-key"),
            ("REWRITE_MODEL", ""),
            ("WEB_PORT", "  "),
        ]))
        .unwrap();
        assert_eq!(config.rewrite_model, "gemini-2.0-flash");
        assert_eq!(config.web_port, 5000);
    }

    #[test]
    fn bad_boolean_is_an_error() {
        let result = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "g-key"),
            ("REQUIRE_EASIER", "maybe"),
        ]));
        assert!(result.is_err());
    }
}
