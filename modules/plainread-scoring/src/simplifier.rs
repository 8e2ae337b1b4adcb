use std::sync::Arc;

use plainread_common::{DifficultyScore, PlainreadError, ThresholdPolicy, Verdict};
use tracing::{info, info_span, Instrument};
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::difficulty::difficulty_score;
use crate::fidelity::{semantic_similarity, TextEmbedder};
use crate::gate;
use crate::rewriter::RewriteProvider;
use crate::vocabulary::ReferenceVocabulary;

/// The full rewrite-and-gate pipeline.
///
/// Holds the long-lived, shared collaborators. Built once at startup and
/// cloned into each request handler.
#[derive(Clone, TypedBuilder)]
pub struct Simplifier {
    vocabulary: Arc<ReferenceVocabulary>,
    embedder: Arc<dyn TextEmbedder>,
    rewriter: Arc<dyn RewriteProvider>,
    #[builder(default)]
    policy: ThresholdPolicy,
}

impl Simplifier {
    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    pub fn score(&self, text: &str) -> DifficultyScore {
        difficulty_score(&self.vocabulary, text)
    }

    /// Rewrite `text` and decide whether the rewrite is acceptable.
    ///
    /// Blank input is rejected before any provider call. Provider and
    /// embedding failures propagate; a policy rejection is a `Verdict`.
    pub async fn simplify(&self, text: &str) -> Result<Verdict, PlainreadError> {
        if text.trim().is_empty() {
            return Err(PlainreadError::InvalidInput("text is empty".into()));
        }

        let span = info_span!("simplify", request_id = %Uuid::new_v4());
        async {
            let original_score = self.score(text);
            info!(
                chars = text.len(),
                score = original_score.value,
                lexical = original_score.lexical,
                grade = original_score.grade,
                "Scored original"
            );

            let rewritten = self
                .rewriter
                .rewrite(text)
                .await
                .map_err(PlainreadError::Provider)?;

            let rewritten_score = self.score(&rewritten);
            info!(
                chars = rewritten.len(),
                score = rewritten_score.value,
                lexical = rewritten_score.lexical,
                grade = rewritten_score.grade,
                "Scored rewrite"
            );

            let fidelity = semantic_similarity(self.embedder.as_ref(), text, &rewritten).await?;

            Ok::<_, PlainreadError>(gate::verdict(
                text,
                original_score.value,
                &rewritten,
                rewritten_score.value,
                fidelity,
                &self.policy,
            ))
        }
        .instrument(span)
        .await
    }

    /// Gate an already-rewritten text without calling the rewrite provider.
    pub async fn assess(&self, original: &str, rewritten: &str) -> Result<Verdict, PlainreadError> {
        if original.trim().is_empty() || rewritten.trim().is_empty() {
            return Err(PlainreadError::InvalidInput("text is empty".into()));
        }
        gate::evaluate(
            original,
            rewritten,
            &self.vocabulary,
            self.embedder.as_ref(),
            &self.policy,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        test_vocabulary, FailingEmbedder, FailingRewriter, FixedEmbedder, ScriptedRewriter,
        TEST_EMBEDDING_DIM,
    };

    fn simplifier(rewriter: Arc<dyn RewriteProvider>, embedder: Arc<dyn TextEmbedder>) -> Simplifier {
        Simplifier::builder()
            .vocabulary(Arc::new(test_vocabulary()))
            .embedder(embedder)
            .rewriter(rewriter)
            .build()
    }

    #[tokio::test]
    async fn blank_input_never_reaches_the_provider() {
        let rewriter = Arc::new(ScriptedRewriter::new());
        let s = simplifier(rewriter.clone(), Arc::new(FixedEmbedder::new(TEST_EMBEDDING_DIM)));

        for text in ["", "   ", "\n\t"] {
            let err = s.simplify(text).await.unwrap_err();
            assert!(matches!(err, PlainreadError::InvalidInput(_)));
        }
        assert_eq!(rewriter.calls(), 0);
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let s = simplifier(
            Arc::new(FailingRewriter::new("rate limited")),
            Arc::new(FixedEmbedder::new(TEST_EMBEDDING_DIM)),
        );
        let err = s.simplify("The cat was sitting on the mat.").await.unwrap_err();
        assert!(matches!(err, PlainreadError::Provider(_)));
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn embedding_failure_propagates() {
        let s = simplifier(
            Arc::new(ScriptedRewriter::new().default_reply("The cat sat.")),
            Arc::new(FailingEmbedder),
        );
        let err = s.simplify("The cat was sitting on the mat.").await.unwrap_err();
        assert!(matches!(err, PlainreadError::Embedding(_)));
    }

    #[tokio::test]
    async fn echoing_rewriter_is_rejected() {
        let text = "The cat was sitting on the mat.";
        let rewriter = Arc::new(ScriptedRewriter::new().on_text(text, text));
        let s = simplifier(rewriter.clone(), Arc::new(FixedEmbedder::new(TEST_EMBEDDING_DIM)));

        let verdict = s.simplify(text).await.unwrap();
        assert!(!verdict.is_accepted());
        assert_eq!(rewriter.calls(), 1);
    }

    #[tokio::test]
    async fn default_policy_is_used_when_not_set() {
        let s = simplifier(
            Arc::new(ScriptedRewriter::new()),
            Arc::new(FixedEmbedder::new(TEST_EMBEDDING_DIM)),
        );
        assert_eq!(*s.policy(), ThresholdPolicy::default());
    }

    #[tokio::test]
    async fn assess_rejects_blank_rewrite() {
        let s = simplifier(
            Arc::new(ScriptedRewriter::new()),
            Arc::new(FixedEmbedder::new(TEST_EMBEDDING_DIM)),
        );
        let err = s.assess("The cat sat.", " ").await.unwrap_err();
        assert!(matches!(err, PlainreadError::InvalidInput(_)));
    }
}
