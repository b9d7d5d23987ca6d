//! Bounded-length text segmentation
//!
//! Splits a document into contiguous slices of at most `max_chars` Unicode
//! scalar values so a span detector can process arbitrarily long input with
//! bounded memory per call. Slicing is purely length-based: an entity that
//! straddles a slice boundary may be missed by the detector. That recall
//! limitation is accepted in exchange for guaranteed termination.

/// Default maximum slice length in characters
pub const DEFAULT_MAX_SLICE_CHARS: usize = 12_000;

/// Lazy iterator over the slices of a text
///
/// Concatenating every yielded slice reproduces the input exactly. Slices
/// never split a `char`.
#[derive(Debug, Clone)]
pub struct Slices<'a> {
    rest: &'a str,
    max_chars: usize,
}

impl<'a> Slices<'a> {
    /// Create a slice iterator; a `max_chars` of zero is treated as one
    pub fn new(text: &'a str, max_chars: usize) -> Self {
        Self {
            rest: text,
            max_chars: max_chars.max(1),
        }
    }
}

impl<'a> Iterator for Slices<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let cut = self
            .rest
            .char_indices()
            .nth(self.max_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(self.rest.len());

        let (slice, rest) = self.rest.split_at(cut);
        self.rest = rest;
        Some(slice)
    }
}

impl std::iter::FusedIterator for Slices<'_> {}

/// Split `text` into slices of at most `max_chars` characters
///
/// # Examples
///
/// ```
/// use veil::anonymization::segmenter::split_into_slices;
///
/// let slices: Vec<&str> = split_into_slices("abcdefg", 3).collect();
/// assert_eq!(slices, vec!["abc", "def", "g"]);
/// ```
pub fn split_into_slices(text: &str, max_chars: usize) -> Slices<'_> {
    Slices::new(text, max_chars)
}

/// Number of slices `text` will produce, i.e. ceil(chars / max_chars)
pub fn slice_count(text: &str, max_chars: usize) -> usize {
    let chars = text.chars().count();
    chars.div_ceil(max_chars.max(1))
}
