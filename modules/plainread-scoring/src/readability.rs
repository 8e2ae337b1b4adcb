//! Flesch-Kincaid grade level.
//!
//! Counting follows the widely used textstat conventions so grades line up
//! with published tooling: punctuation is stripped before counting words,
//! fragments of two words or fewer do not count as sentences, and the two
//! averages are rounded to one decimal before the formula is applied.
//! Syllables come from the en-US hyphenation dictionary.

use std::sync::LazyLock;

use hyphenation::{Hyphenator, Language, Load, Standard};
use regex::Regex;

use crate::util::round_to;

static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[^.!?]+[.!?]*").unwrap());

static EN_US: LazyLock<Standard> = LazyLock::new(|| {
    Standard::from_embedded(Language::EnglishUS).expect("en-US patterns are embedded")
});

/// Matches with this many words or fewer are not counted as sentences.
const MIN_SENTENCE_WORDS: usize = 2;

const CONTRACTION_SUFFIXES: [&str; 6] = ["t", "s", "d", "ve", "ll", "re"];

/// Counts behind one grade computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadabilityReport {
    pub grade: f64,
    pub sentences: usize,
    pub words: usize,
    pub syllables: usize,
}

impl ReadabilityReport {
    pub fn analyze(text: &str) -> Self {
        let words = word_count(text);
        let sentences = sentence_count(text);
        let syllables: usize = strip_punctuation(text)
            .split_whitespace()
            .map(count_syllables)
            .sum();

        let (avg_sentence_length, avg_syllables_per_word) = if words == 0 {
            (0.0, 0.0)
        } else {
            (
                round_to(words as f64 / sentences as f64, 1),
                round_to(syllables as f64 / words as f64, 1),
            )
        };

        let grade = round_to(
            0.39 * avg_sentence_length + 11.8 * avg_syllables_per_word - 15.59,
            1,
        );

        Self {
            grade,
            sentences,
            words,
            syllables,
        }
    }
}

/// Flesch-Kincaid grade of `text`, rounded to one decimal.
///
/// Not clamped: very easy text goes negative, and empty text yields -15.6.
pub fn readability(text: &str) -> f64 {
    ReadabilityReport::analyze(text).grade
}

fn word_count(text: &str) -> usize {
    strip_punctuation(text).split_whitespace().count()
}

/// Sentence-like spans with more than two words. Never less than 1.
fn sentence_count(text: &str) -> usize {
    let counted = SENTENCE_RE
        .find_iter(text)
        .filter(|m| word_count(m.as_str()) > MIN_SENTENCE_WORDS)
        .count();
    counted.max(1)
}

/// Remove everything except word characters, whitespace, and apostrophes
/// that start a contraction suffix (`'t`, `'s`, `'d`, `'ve`, `'ll`, `'re`).
pub fn strip_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if is_word_char(c) || c.is_whitespace() {
            out.push(c);
        } else if c == '\'' && starts_contraction(&chars[i + 1..]) {
            out.push(c);
        }
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn starts_contraction(rest: &[char]) -> bool {
    CONTRACTION_SUFFIXES.iter().any(|suffix| {
        let n = suffix.chars().count();
        rest.len() >= n
            && rest.iter().zip(suffix.chars()).all(|(a, b)| *a == b)
            && rest.get(n).is_none_or(|c| !is_word_char(*c))
    })
}

/// Syllables in a single word: one more than the hyphenation points the
/// en-US TeX patterns find. Always at least 1.
pub fn count_syllables(word: &str) -> usize {
    EN_US.hyphenate(&word.to_lowercase()).breaks.len() + 1
}
