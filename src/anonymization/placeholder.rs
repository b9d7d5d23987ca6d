//! Placeholder tokens
//!
//! A single-word entity is replaced by `[<id>_<type>]`. Word `i` of a
//! multi-word entity is replaced by `[<id>_<type>_<suffix>]`, where the suffix
//! is `a`..`z` for the first 26 words and the 1-based decimal position after
//! that (`27`, `28`, ...).

use crate::domain::Entity;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;

/// Matches anything shaped like a placeholder: `[<digits>_<anything but brackets>]`
static PLACEHOLDER_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d+)_([^\[\]]+)\]").expect("placeholder shape pattern is valid")
});

const LETTERS: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Suffix for the word at 0-based `index`
///
/// # Examples
///
/// ```
/// use veil::anonymization::placeholder::suffix;
///
/// assert_eq!(suffix(0), "a");
/// assert_eq!(suffix(25), "z");
/// assert_eq!(suffix(26), "27");
/// ```
pub fn suffix(index: usize) -> String {
    match LETTERS.get(index) {
        Some(letter) => char::from(*letter).to_string(),
        None => (index + 1).to_string(),
    }
}

/// Placeholder for a single-word entity
pub fn single_token(entity: &Entity) -> String {
    format!("[{}_{}]", entity.id, entity.entity_type)
}

/// Placeholder for word `index` of a multi-word entity
pub fn word_token(entity: &Entity, index: usize) -> String {
    format!("[{}_{}_{}]", entity.id, entity.entity_type, suffix(index))
}

/// Whole-span placeholder for a multi-word entity of `word_count` words
pub fn span_token(entity: &Entity, word_count: usize) -> String {
    (0..word_count)
        .map(|idx| word_token(entity, idx))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check whether text contains anything shaped like a placeholder
pub fn contains_placeholder(text: &str) -> bool {
    PLACEHOLDER_SHAPE.is_match(text)
}

/// Count placeholder-shaped tokens in text
pub fn count_placeholders(text: &str) -> usize {
    PLACEHOLDER_SHAPE.find_iter(text).count()
}

fn is_suffix(s: &str) -> bool {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => true,
        _ => s.parse::<usize>().map(|n| n > LETTERS.len()).unwrap_or(false),
    }
}

/// Recognizes placeholders produced for a given entity list
///
/// Used to keep later substitutions from rewriting text inside placeholders
/// emitted by earlier ones, and to make re-running a substitution a no-op.
#[derive(Debug)]
pub struct PlaceholderScanner<'a> {
    types_by_id: HashMap<u32, Vec<&'a str>>,
}

impl<'a> PlaceholderScanner<'a> {
    /// Build a scanner for the placeholders of `entities`
    pub fn new(entities: &'a [Entity]) -> Self {
        let mut types_by_id: HashMap<u32, Vec<&'a str>> = HashMap::new();
        for entity in entities {
            types_by_id
                .entry(entity.id)
                .or_default()
                .push(entity.entity_type.as_str());
        }
        Self { types_by_id }
    }

    /// Check if the bracket body `<id>_<rest>` belongs to a known entity
    fn is_known(&self, id: &str, rest: &str) -> bool {
        let Some(types) = id
            .parse::<u32>()
            .ok()
            .and_then(|id| self.types_by_id.get(&id))
        else {
            return false;
        };

        types.iter().any(|entity_type| {
            rest == *entity_type
                || rest
                    .strip_prefix(entity_type)
                    .and_then(|tail| tail.strip_prefix('_'))
                    .is_some_and(is_suffix)
        })
    }

    /// Byte ranges of known placeholders in `text`, in ascending order
    pub fn protected_ranges(&self, text: &str) -> Vec<Range<usize>> {
        if self.types_by_id.is_empty() {
            return Vec::new();
        }

        PLACEHOLDER_SHAPE
            .captures_iter(text)
            .filter(|caps| self.is_known(&caps[1], &caps[2]))
            .filter_map(|caps| caps.get(0).map(|m| m.range()))
            .collect()
    }
}
