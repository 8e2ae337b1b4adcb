//! Reference vocabulary of common words.
//!
//! Loaded once at startup from a newline-delimited word list and shared
//! read-only (behind an `Arc`) by every evaluation.

use std::collections::HashSet;
use std::path::Path;

use plainread_common::PlainreadError;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct ReferenceVocabulary {
    words: HashSet<String>,
}

impl ReferenceVocabulary {
    /// Build from any word iterator. Words are trimmed and lower-cased; blanks are skipped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Parse a word list: one word per line, `#` comment lines ignored.
    pub fn parse(contents: &str) -> Self {
        Self::from_words(
            contents
                .lines()
                .filter(|line| !line.trim_start().starts_with('#')),
        )
    }

    /// Load a word list from disk. A missing or empty list fails initialization.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlainreadError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PlainreadError::Vocabulary(format!("cannot read {}: {e}", path.display()))
        })?;

        let vocabulary = Self::parse(&contents);
        if vocabulary.is_empty() {
            return Err(PlainreadError::Vocabulary(format!(
                "{} contains no words",
                path.display()
            )));
        }

        info!(path = %path.display(), words = vocabulary.len(), "Loaded reference vocabulary");
        Ok(vocabulary)
    }

    /// Membership test for an already lower-cased word.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
