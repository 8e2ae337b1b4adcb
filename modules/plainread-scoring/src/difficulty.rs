use plainread_common::DifficultyScore;

use crate::lexical::lexical_difficulty;
use crate::readability::readability;
use crate::util::round_to;
use crate::vocabulary::ReferenceVocabulary;

/// Grade levels are divided by this to land roughly on the lexical [0, 1] scale.
pub const GRADE_SCALE: f64 = 20.0;

/// Composite difficulty: mean of the lexical share and the rescaled grade.
///
/// Pure and deterministic. Empty text is not an error; it scores negative
/// because the grade formula bottoms out at -15.6.
pub fn difficulty_score(vocabulary: &ReferenceVocabulary, text: &str) -> DifficultyScore {
    let lexical = lexical_difficulty(vocabulary, text);
    let grade = readability(text);
    let syntax = grade / GRADE_SCALE;

    DifficultyScore {
        value: round_to((lexical + syntax) / 2.0, 2),
        lexical,
        grade,
        syntax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> ReferenceVocabulary {
        ReferenceVocabulary::from_words(["the", "cat", "sat", "on", "mat"])
    }

    #[test]
    fn combines_lexical_and_grade() {
        let score = difficulty_score(&vocab(), "The cat sat on the mat.");
        // "mat." is dropped from the lexical count, everything else is known
        assert_eq!(score.lexical, 0.0);
        assert!((score.syntax - score.grade / GRADE_SCALE).abs() < 1e-12);
        assert_eq!(score.value, round_to(score.syntax / 2.0, 2));
    }

    #[test]
    fn empty_text_has_defined_negative_score() {
        let score = difficulty_score(&vocab(), "");
        assert_eq!(score.lexical, 0.0);
        assert_eq!(score.grade, -15.6);
        assert_eq!(score.value, -0.39);
    }

    #[test]
    fn deterministic() {
        let text = "Supervisory personnel must authorize deviations from procedures.";
        assert_eq!(difficulty_score(&vocab(), text), difficulty_score(&vocab(), text));
    }

    #[test]
    fn value_is_rounded_to_two_decimals() {
        let score = difficulty_score(&vocab(), "The zebra sat on an unusually comfortable mat.");
        assert!(((score.value * 100.0).round() - score.value * 100.0).abs() < 1e-9);
    }
}
