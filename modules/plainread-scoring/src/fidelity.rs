use anyhow::{anyhow, Result};
use async_trait::async_trait;
use plainread_common::PlainreadError;

use crate::util::cosine_similarity;

/// Sentence-embedding capability. Loaded once at startup and shared.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;
}

/// Cosine similarity of the embeddings of `a` and `b`, in [-1, 1].
///
/// Both texts go out in one batch call. A zero vector yields 0.0.
pub async fn semantic_similarity(
    embedder: &dyn TextEmbedder,
    a: &str,
    b: &str,
) -> Result<f64, PlainreadError> {
    let vectors = embedder
        .embed_batch(vec![a.to_string(), b.to_string()])
        .await
        .map_err(PlainreadError::Embedding)?;

    let [va, vb] = vectors.as_slice() else {
        return Err(PlainreadError::Embedding(anyhow!(
            "expected 2 embeddings, got {}",
            vectors.len()
        )));
    };
    if va.is_empty() || vb.is_empty() {
        return Err(PlainreadError::Embedding(anyhow!("embedder returned an empty vector")));
    }
    if va.len() != vb.len() {
        return Err(PlainreadError::Embedding(anyhow!(
            "embedding dimension mismatch: {} vs {}",
            va.len(),
            vb.len()
        )));
    }

    Ok(cosine_similarity(va, vb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingEmbedder, FixedEmbedder, TEST_EMBEDDING_DIM};

    #[tokio::test]
    async fn self_similarity_is_one() {
        let embedder = FixedEmbedder::new(TEST_EMBEDDING_DIM);
        let text = "The cat was sitting on the mat.";
        let sim = semantic_similarity(&embedder, text, text).await.unwrap();
        assert!((sim - 1.0).abs() < 1e-6, "sim={sim}");
    }

    #[tokio::test]
    async fn symmetric() {
        let embedder = FixedEmbedder::new(TEST_EMBEDDING_DIM);
        let ab = semantic_similarity(&embedder, "first text", "second text").await.unwrap();
        let ba = semantic_similarity(&embedder, "second text", "first text").await.unwrap();
        assert!((ab - ba).abs() < 1e-12);
    }

    #[tokio::test]
    async fn registered_vectors_control_similarity() {
        let embedder = FixedEmbedder::new(3)
            .on_text("a", vec![1.0, 0.0, 0.0])
            .on_text("b", vec![0.0, 1.0, 0.0])
            .on_text("c", vec![-1.0, 0.0, 0.0]);
        assert_eq!(semantic_similarity(&embedder, "a", "b").await.unwrap(), 0.0);
        assert_eq!(semantic_similarity(&embedder, "a", "c").await.unwrap(), -1.0);
    }

    #[tokio::test]
    async fn zero_vector_gives_zero() {
        let embedder = FixedEmbedder::new(2)
            .on_text("zero", vec![0.0, 0.0])
            .on_text("one", vec![1.0, 0.0]);
        assert_eq!(semantic_similarity(&embedder, "zero", "one").await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn dimension_mismatch_is_embedding_error() {
        let embedder = FixedEmbedder::new(2)
            .on_text("short", vec![1.0, 0.0])
            .on_text("long", vec![1.0, 0.0, 0.0]);
        let err = semantic_similarity(&embedder, "short", "long").await.unwrap_err();
        assert!(matches!(err, PlainreadError::Embedding(_)));
        assert!(err.to_string().contains("dimension mismatch"));
    }

    #[tokio::test]
    async fn embedder_failure_is_embedding_error() {
        let err = semantic_similarity(&FailingEmbedder, "a", "b").await.unwrap_err();
        assert!(matches!(err, PlainreadError::Embedding(_)));
        assert!(err.is_upstream());
    }
}
