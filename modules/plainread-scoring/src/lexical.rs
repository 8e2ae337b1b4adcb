//! Lexical difficulty: the share of words a reader is unlikely to know.

use crate::vocabulary::ReferenceVocabulary;

/// Words longer than this many characters count as uncommon even when known.
pub const LONG_WORD_CHARS: usize = 8;

/// Fraction of alphabetic tokens that are uncommon, in [0, 1].
///
/// Tokens are whitespace-separated and lower-cased. Tokens with any
/// non-alphabetic character (digits, attached punctuation) are dropped, not
/// cleaned. A text with no alphabetic tokens scores 0.
pub fn lexical_difficulty(vocabulary: &ReferenceVocabulary, text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = alphabetic_tokens(&lowered).collect();
    let uncommon = tokens
        .iter()
        .filter(|token| is_uncommon(vocabulary, token))
        .count();
    uncommon as f64 / tokens.len().max(1) as f64
}

/// The uncommon tokens of `text`, lower-cased, in order of appearance.
pub fn uncommon_words(vocabulary: &ReferenceVocabulary, text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    alphabetic_tokens(&lowered)
        .filter(|token| is_uncommon(vocabulary, token))
        .map(str::to_string)
        .collect()
}

/// Absent from the vocabulary, or too long. Either alone is enough.
pub fn is_uncommon(vocabulary: &ReferenceVocabulary, word: &str) -> bool {
    !vocabulary.contains(word) || word.chars().count() > LONG_WORD_CHARS
}

fn alphabetic_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|token| token.chars().all(char::is_alphabetic))
}
