pub mod difficulty;
pub mod embedder;
pub mod fidelity;
pub mod gate;
pub mod lexical;
pub mod readability;
pub mod rewriter;
pub mod simplifier;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod util;
pub mod vocabulary;

pub use difficulty::difficulty_score;
pub use embedder::{build_embedder, local_model, AgentEmbedder, LocalEmbedder};
pub use fidelity::{semantic_similarity, TextEmbedder};
pub use lexical::lexical_difficulty;
pub use readability::{readability, ReadabilityReport};
pub use rewriter::{build_rewriter, LlmRewriter, RewriteProvider};
pub use simplifier::Simplifier;
pub use vocabulary::ReferenceVocabulary;
