// Test doubles for the simplification pipeline.
//
// - FixedEmbedder (TextEmbedder): registered vectors, otherwise deterministic hash-based ones
// - FailingEmbedder (TextEmbedder): always errors
// - ScriptedRewriter (RewriteProvider): text -> reply map with optional default
// - FailingRewriter (RewriteProvider): always errors with a fixed message
//
// Plus a small in-memory reference vocabulary.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::fidelity::TextEmbedder;
use crate::rewriter::RewriteProvider;
use crate::vocabulary::ReferenceVocabulary;

// ---------------------------------------------------------------------------
// Test constants
// ---------------------------------------------------------------------------

/// Standard embedding dimension for test vectors.
pub const TEST_EMBEDDING_DIM: usize = 64;

/// Everyday words: enough to score the sample texts used across the tests.
pub const COMMON_WORDS: &[&str] = &[
    "a", "about", "all", "allow", "always", "and", "are", "as", "at", "backup", "be", "boss",
    "but", "by", "can", "carpet", "cases", "cat", "change", "changes", "dog", "down", "event",
    "follow", "for", "from", "goes", "going", "has", "have", "he", "if", "in", "is", "it",
    "keeps", "kitty", "mat", "must", "need", "not", "of", "on", "or", "plan", "rare", "resting",
    "rules", "safety", "sat", "she", "sitting", "something", "steps", "that", "the", "then",
    "they", "this", "to", "try", "under", "was", "we", "when", "with", "work", "wrong", "you",
    "your",
];

pub fn test_vocabulary() -> ReferenceVocabulary {
    ReferenceVocabulary::from_words(COMMON_WORDS)
}

// ---------------------------------------------------------------------------
// FixedEmbedder
// ---------------------------------------------------------------------------

/// Deterministic embedder for testing. Registered texts get exact vectors;
/// unmatched texts get a unique hash-based vector (low similarity to everything).
pub struct FixedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    dimension: usize,
}

impl FixedEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            vectors: HashMap::new(),
            dimension,
        }
    }

    /// Register a text→vector mapping for controlled similarity.
    pub fn on_text(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    /// Register two texts whose vectors have exactly the given cosine similarity.
    pub fn with_similarity(self, a: &str, b: &str, similarity: f32) -> Self {
        let mut va = vec![0.0f32; self.dimension.max(2)];
        let mut vb = va.clone();
        va[0] = 1.0;
        vb[0] = similarity;
        vb[1] = (1.0 - similarity * similarity).max(0.0).sqrt();
        self.on_text(a, va).on_text(b, vb)
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        self.vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.hash_vector(text))
    }

    /// Generate a deterministic hash-based vector for unmatched text.
    fn hash_vector(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut vec = vec![0.0f32; self.dimension];
        let mut state = seed;
        for v in vec.iter_mut() {
            // Simple LCG PRNG
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            *v = ((state >> 33) as f32 / u32::MAX as f32) * 2.0 - 1.0;
        }
        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in vec.iter_mut() {
                *v /= norm;
            }
        }
        vec
    }
}

#[async_trait]
impl TextEmbedder for FixedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vector_for(text))
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}

// ---------------------------------------------------------------------------
// FailingEmbedder
// ---------------------------------------------------------------------------

pub struct FailingEmbedder;

#[async_trait]
impl TextEmbedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        bail!("embedding service unavailable")
    }

    async fn embed_batch(&self, _texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        bail!("embedding service unavailable")
    }
}

// ---------------------------------------------------------------------------
// ScriptedRewriter
// ---------------------------------------------------------------------------

/// HashMap-based rewriter. Returns `Err` for unregistered texts unless a
/// default reply is set. Counts calls so tests can assert it was (not) used.
pub struct ScriptedRewriter {
    replies: HashMap<String, String>,
    default_reply: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedRewriter {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            default_reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Register an input→rewrite mapping.
    pub fn on_text(mut self, text: &str, rewrite: &str) -> Self {
        self.replies.insert(text.to_string(), rewrite.to_string());
        self
    }

    /// Reply for any text not explicitly registered.
    pub fn default_reply(mut self, rewrite: &str) -> Self {
        self.default_reply = Some(rewrite.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedRewriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RewriteProvider for ScriptedRewriter {
    async fn rewrite(&self, text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .get(text)
            .or(self.default_reply.as_ref())
            .cloned()
            .ok_or_else(|| anyhow!("ScriptedRewriter: no reply registered for {text:?}"))
    }
}

// ---------------------------------------------------------------------------
// FailingRewriter
// ---------------------------------------------------------------------------

pub struct FailingRewriter {
    message: String,
}

impl FailingRewriter {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl RewriteProvider for FailingRewriter {
    async fn rewrite(&self, _text: &str) -> Result<String> {
        Err(anyhow!("{}", self.message).context("Rewrite request failed"))
    }
}
