//! Acceptance gate: the threshold decision over fidelity and difficulty change.

use plainread_common::{
    PlainreadError, Rejection, RejectionReason, Simplification, ThresholdPolicy, Verdict,
};
use tracing::{debug, info};

use crate::difficulty::difficulty_score;
use crate::fidelity::{semantic_similarity, TextEmbedder};
use crate::util::round_to;
use crate::vocabulary::ReferenceVocabulary;

/// Every check the measured values fail. Empty means accept.
///
/// Scores are already rounded to two decimals, so the delta is rounded the
/// same way before comparing; otherwise 0.40 vs 0.34 would miss a 0.06
/// threshold by float noise.
pub fn decide(
    original_score: f64,
    rewritten_score: f64,
    fidelity: f64,
    policy: &ThresholdPolicy,
) -> Vec<RejectionReason> {
    let mut reasons = Vec::new();

    if fidelity < policy.min_fidelity {
        reasons.push(RejectionReason::LowFidelity {
            fidelity,
            min_fidelity: policy.min_fidelity,
        });
    }

    let delta = round_to((original_score - rewritten_score).abs(), 2);
    if delta < policy.min_difficulty_delta {
        reasons.push(RejectionReason::InsufficientChange {
            delta,
            min_delta: policy.min_difficulty_delta,
        });
    }

    if policy.require_easier && rewritten_score >= original_score {
        reasons.push(RejectionReason::NotEasier {
            original_score,
            rewritten_score,
        });
    }

    reasons
}

/// Score both texts, measure fidelity, and decide.
pub async fn evaluate(
    original: &str,
    rewritten: &str,
    vocabulary: &ReferenceVocabulary,
    embedder: &dyn TextEmbedder,
    policy: &ThresholdPolicy,
) -> Result<Verdict, PlainreadError> {
    let original_score = difficulty_score(vocabulary, original);
    let rewritten_score = difficulty_score(vocabulary, rewritten);
    debug!(
        original = original_score.value,
        rewritten = rewritten_score.value,
        "Scored texts"
    );

    let fidelity = semantic_similarity(embedder, original, rewritten).await?;

    Ok(verdict(
        original,
        original_score.value,
        rewritten,
        rewritten_score.value,
        fidelity,
        policy,
    ))
}

pub(crate) fn verdict(
    original: &str,
    original_score: f64,
    rewritten: &str,
    rewritten_score: f64,
    fidelity: f64,
    policy: &ThresholdPolicy,
) -> Verdict {
    let reasons = decide(original_score, rewritten_score, fidelity, policy);

    if reasons.is_empty() {
        info!(original_score, rewritten_score, fidelity, "Rewrite accepted");
        Verdict::Accepted(Simplification {
            original_text: original.to_string(),
            original_score,
            rewritten_text: rewritten.to_string(),
            rewritten_score,
            fidelity,
        })
    } else {
        let summary: Vec<String> = reasons.iter().map(ToString::to_string).collect();
        info!(
            original_score,
            rewritten_score,
            fidelity,
            reasons = ?summary,
            "Rewrite rejected"
        );
        Verdict::Rejected(Rejection {
            reasons,
            original_score,
            rewritten_score,
            fidelity,
        })
    }
}
