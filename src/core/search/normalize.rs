//! Search phrase normalization.
//!
//! Visitors type phrases like `coffee-shop` or `(opening hours)`; the
//! search engine treats those characters as query syntax. Normalization
//! replaces every reserved character with a single space so the phrase
//! reaches the content predicate as plain terms.

use std::collections::HashSet;

/// Characters the search engine reserves for query syntax
pub const RESERVED_CHARACTERS: [char; 20] = [
    '+', '-', '&', '|', '!', '{', '}', '[', ']', '^', '(', ')', '~', ':', ';', ',', '/', '\\',
    '?', '"',
];

/// Normalize a phrase with the default reserved character set.
///
/// Empty or whitespace-only input, and input that becomes whitespace-only
/// once reserved characters are replaced, normalizes to `""`. Spacing is
/// otherwise kept as is.
///
/// # Examples
///
/// ```
/// use sitesearch::core::search::normalize_phrase;
///
/// assert_eq!(normalize_phrase("coffee-shop"), "coffee shop");
/// assert_eq!(normalize_phrase("(a|b)"), " a b ");
/// assert_eq!(normalize_phrase("?!"), "");
/// assert_eq!(normalize_phrase("   "), "");
/// ```
pub fn normalize_phrase(phrase: &str) -> String {
    replace_reserved(phrase, |ch| RESERVED_CHARACTERS.contains(&ch))
}

fn replace_reserved(phrase: &str, is_reserved: impl Fn(char) -> bool) -> String {
    if phrase.trim().is_empty() {
        return String::new();
    }

    let replaced: String = phrase
        .chars()
        .map(|ch| if is_reserved(ch) { ' ' } else { ch })
        .collect();

    if replaced.trim().is_empty() {
        return String::new();
    }

    replaced
}

/// Phrase normalizer with a configurable reserved character set
#[derive(Debug, Clone)]
pub struct PhraseNormalizer {
    reserved: HashSet<char>,
}

impl Default for PhraseNormalizer {
    fn default() -> Self {
        Self {
            reserved: RESERVED_CHARACTERS.into_iter().collect(),
        }
    }
}

impl PhraseNormalizer {
    /// Normalizer reserving exactly the characters of `reserved`
    pub fn with_characters(reserved: &str) -> Self {
        Self {
            reserved: reserved.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    pub fn is_reserved(&self, ch: char) -> bool {
        self.reserved.contains(&ch)
    }

    /// Normalize an optional phrase; `None` normalizes to `""`
    pub fn normalize(&self, phrase: Option<&str>) -> String {
        match phrase {
            Some(p) => replace_reserved(p, |ch| self.is_reserved(ch)),
            None => String::new(),
        }
    }
}
