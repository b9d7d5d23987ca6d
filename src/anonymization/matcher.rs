//! Token-bounded literal matching
//!
//! Entity words are matched case-insensitively as escaped literals with the
//! linear-time `regex` engine. A hit only counts when the characters on
//! either side of it are not word characters (alphanumeric or `_`), so a
//! word never matches inside a larger alphanumeric run or inside a
//! placeholder such as `[1_person_a]`.

use crate::domain::{Result, VeilError};
use regex::{Regex, RegexBuilder};
use std::ops::Range;

/// Run of whitespace or hyphens between the words of a multi-word match
const SEPARATOR_CLASS: &str = r"[\s-]+";

/// Case-insensitive literal pattern that only matches on token boundaries
#[derive(Debug, Clone)]
pub struct TokenPattern {
    regex: Regex,
}

impl TokenPattern {
    /// Pattern for a single word
    pub fn word(word: &str) -> Result<Self> {
        Self::build(&regex::escape(word))
    }

    /// Pattern for words in order, separated by whitespace or hyphens
    pub fn span(words: &[&str]) -> Result<Self> {
        let body = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join(SEPARATOR_CLASS);
        Self::build(&body)
    }

    fn build(body: &str) -> Result<Self> {
        let regex = RegexBuilder::new(body)
            .case_insensitive(true)
            .build()
            .map_err(|e| VeilError::Pattern(format!("Failed to build match pattern: {e}")))?;
        Ok(Self { regex })
    }

    /// Byte ranges of all non-overlapping bounded matches, left to right
    ///
    /// A hit that fails the boundary check does not consume text: the search
    /// resumes one character after its start.
    pub fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        let mut hits = Vec::new();
        let mut pos = 0;

        while pos <= text.len() {
            let Some(found) = self.regex.find_at(text, pos) else {
                break;
            };

            if found.start() < found.end() && is_bounded(text, found.start(), found.end()) {
                hits.push(found.range());
                pos = found.end();
            } else {
                pos = found.start() + next_char_len(text, found.start());
            }
        }

        hits
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn next_char_len(text: &str, at: usize) -> usize {
    text[at..].chars().next().map_or(1, char::len_utf8)
}
