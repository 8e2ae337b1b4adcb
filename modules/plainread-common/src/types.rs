use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlainreadError;

// =============================================================================
// Scores
// =============================================================================

/// Composite reading difficulty of one text. Higher = harder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyScore {
    /// `(lexical + syntax) / 2`, rounded to 2 decimals.
    pub value: f64,
    /// Fraction of uncommon or long words (0.0-1.0).
    pub lexical: f64,
    /// Flesch-Kincaid grade level.
    pub grade: f64,
    /// Grade level rescaled by 1/20.
    pub syntax: f64,
}

/// Default acceptance thresholds.
pub const DEFAULT_MIN_FIDELITY: f64 = 0.5;
pub const DEFAULT_MIN_DIFFICULTY_DELTA: f64 = 0.06;

/// Thresholds a rewrite must clear to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    pub min_fidelity: f64,
    pub min_difficulty_delta: f64,
    /// Also require the rewrite to score strictly lower than the original.
    /// Off by default: the delta check compares absolute values.
    pub require_easier: bool,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            min_fidelity: DEFAULT_MIN_FIDELITY,
            min_difficulty_delta: DEFAULT_MIN_DIFFICULTY_DELTA,
            require_easier: false,
        }
    }
}

impl ThresholdPolicy {
    /// Non-finite thresholds make every comparison false, so they are rejected outright.
    pub fn validate(&self) -> Result<(), PlainreadError> {
        if !self.min_fidelity.is_finite() {
            return Err(PlainreadError::Config(format!(
                "min_fidelity must be finite, got {}",
                self.min_fidelity
            )));
        }
        if !self.min_difficulty_delta.is_finite() {
            return Err(PlainreadError::Config(format!(
                "min_difficulty_delta must be finite, got {}",
                self.min_difficulty_delta
            )));
        }
        Ok(())
    }

    /// Settings that are legal but disable part of the gate.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.min_fidelity <= 0.0 {
            warnings.push(format!(
                "min_fidelity is {}; unrelated rewrites will pass the fidelity check",
                self.min_fidelity
            ));
        }
        if self.min_fidelity > 1.0 {
            warnings.push(format!(
                "min_fidelity is {}; cosine similarity never exceeds 1.0, every rewrite will be rejected",
                self.min_fidelity
            ));
        }
        if self.min_difficulty_delta <= 0.0 {
            warnings.push(format!(
                "min_difficulty_delta is {}; unchanged rewrites will pass the difficulty check",
                self.min_difficulty_delta
            ));
        }
        warnings
    }
}

// =============================================================================
// Verdict
// =============================================================================

/// Why a rewrite was turned down. Every failing check is reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    LowFidelity { fidelity: f64, min_fidelity: f64 },
    InsufficientChange { delta: f64, min_delta: f64 },
    NotEasier { original_score: f64, rewritten_score: f64 },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::LowFidelity {
                fidelity,
                min_fidelity,
            } => write!(
                f,
                "semantic similarity {fidelity:.3} is below the minimum {min_fidelity}"
            ),
            RejectionReason::InsufficientChange { delta, min_delta } => write!(
                f,
                "difficulty changed by {delta:.2}, less than the minimum {min_delta}"
            ),
            RejectionReason::NotEasier {
                original_score,
                rewritten_score,
            } => write!(
                f,
                "rewrite scored {rewritten_score:.2}, not easier than the original {original_score:.2}"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simplification {
    pub original_text: String,
    pub original_score: f64,
    pub rewritten_text: String,
    pub rewritten_score: f64,
    pub fidelity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub reasons: Vec<RejectionReason>,
    pub original_score: f64,
    pub rewritten_score: f64,
    pub fidelity: f64,
}

/// Outcome of one simplification attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Accepted(Simplification),
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }
}

// =============================================================================
// Wire response
// =============================================================================

pub const FAILURE_MESSAGE: &str = "Unable to reformulate.";

/// Response body of the simplify endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimplifyResponse {
    Success {
        original_text: String,
        original_score: f64,
        reformulated_text: String,
        simplified_score: f64,
        semantic_similarity: f64,
    },
    Failure {
        message: String,
        reasons: Vec<String>,
    },
}

impl From<Verdict> for SimplifyResponse {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Accepted(s) => SimplifyResponse::Success {
                original_text: s.original_text,
                original_score: s.original_score,
                reformulated_text: s.rewritten_text,
                simplified_score: s.rewritten_score,
                semantic_similarity: s.fidelity,
            },
            Verdict::Rejected(r) => SimplifyResponse::Failure {
                message: FAILURE_MESSAGE.to_string(),
                reasons: r.reasons.iter().map(ToString::to_string).collect(),
            },
        }
    }
}

// =============================================================================
// Prompt presets
// =============================================================================

/// Which instruction set the rewrite model receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptPreset {
    /// Bulleted rule list: medium sentences, common words, active voice, literal idioms.
    #[default]
    Structured,
    /// Short sentences, simple words, short paragraphs, plain text.
    Plain,
}

impl FromStr for PromptPreset {
    type Err = PlainreadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structured" => Ok(PromptPreset::Structured),
            "plain" => Ok(PromptPreset::Plain),
            other => Err(PlainreadError::Config(format!(
                "unknown prompt preset '{other}' (expected 'structured' or 'plain')"
            ))),
        }
    }
}
