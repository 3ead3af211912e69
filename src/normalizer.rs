// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text normalization shared by every component.
//!
//! The index, the spell checker, the completion trie, the frequency analyzer
//! and the ranker all see text through this module. If two of them tokenized
//! differently, a word could be indexed but never match a query, or be
//! suggested by the spell checker but unknown to the index. So there is one
//! canonical function and one configured filter on top of it.
//!
//! # Canonical form
//!
//! 1. NFD normalize and drop combining marks (`unicode-normalization` feature)
//! 2. Lowercase
//! 3. Every character outside `[a-z0-9-]` becomes a separator
//! 4. Split on whitespace runs
//!
//! The output alphabet is `[a-z0-9- ]`, which is why normalization is
//! idempotent: `normalize(normalize(x)) == normalize(x)`.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

use crate::config::NormalizerConfig;

/// Stop words loaded from `data/stop_words.json`.
///
/// The file maps a language code to a word list. All lists are flattened
/// into one set and run through [`normalize`] so they compare equal to
/// normalized tokens.
static DEFAULT_STOP_WORDS: LazyLock<Vec<String>> = LazyLock::new(|| {
    let json_str = include_str!("../data/stop_words.json");
    parse_stop_words_json(json_str)
});

fn parse_stop_words_json(json_str: &str) -> Vec<String> {
    let by_language: std::collections::BTreeMap<String, Vec<String>> =
        serde_json::from_str(json_str).unwrap_or_default();

    let mut words: Vec<String> = by_language
        .into_values()
        .flatten()
        .map(|word| normalize(&word))
        .filter(|word| !word.is_empty())
        .collect();
    words.sort();
    words.dedup();
    words
}

/// The default stop-word list (a copy; callers may extend it in config).
pub fn default_stop_words() -> Vec<String> {
    DEFAULT_STOP_WORDS.clone()
}

/// Canonical form of `value`: tokens joined by a single space.
///
/// - "Wireless!!" → "wireless"
/// - "Wi-Fi 6E, Dolby Atmos®" → "wi-fi 6e dolby atmos"
/// - "Café Crème" → "cafe creme" (with `unicode-normalization`)
pub fn normalize(value: &str) -> String {
    tokenize(value).join(" ")
}

/// Canonical tokens of `value`, in order, with no length or stop-word filter.
pub fn tokenize(value: &str) -> Vec<String> {
    fold_case(value)
        .chars()
        .map(|c| if is_token_char(c) { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[inline]
fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

#[cfg(feature = "unicode-normalization")]
fn fold_case(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Without unicode-normalization accented letters simply become separators.
#[cfg(not(feature = "unicode-normalization"))]
fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Combining marks left behind by NFD (Unicode category Mn, common ranges).
#[cfg(feature = "unicode-normalization")]
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

/// Is this token made only of ASCII digits?
#[inline]
pub fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// The configured filter applied on top of [`tokenize`].
///
/// Cheap to clone: the stop-word set is shared.
#[derive(Debug, Clone)]
pub struct Normalizer {
    min_token_length: usize,
    keep_numeric_tokens: bool,
    stop_words: Arc<HashSet<String>>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}

impl Normalizer {
    pub fn new(config: &NormalizerConfig) -> Self {
        let stop_words = config
            .stop_words
            .iter()
            .map(|word| normalize(word))
            .filter(|word| !word.is_empty())
            .collect();

        Self {
            min_token_length: config.min_token_length,
            keep_numeric_tokens: config.keep_numeric_tokens,
            stop_words: Arc::new(stop_words),
        }
    }

    pub fn min_token_length(&self) -> usize {
        self.min_token_length
    }

    pub fn keeps_numeric_tokens(&self) -> bool {
        self.keep_numeric_tokens
    }

    #[inline]
    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Would this canonical token survive the length and numeric rules?
    ///
    /// Tokens made only of hyphens never survive.
    #[inline]
    pub fn is_indexable(&self, token: &str) -> bool {
        token.len() >= self.min_token_length
            && token.bytes().any(|b| b != b'-')
            && (self.keep_numeric_tokens || !is_numeric(token))
    }

    /// Tokens that pass the length and numeric rules. Stop words are kept.
    ///
    /// Used by the vocabulary-shaped structures (spelling, completion,
    /// frequency), where "the" is a word like any other.
    pub fn indexable_tokens(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .into_iter()
            .filter(|token| self.is_indexable(token))
            .collect()
    }

    /// Indexable tokens minus stop words, in order, repeats kept.
    pub fn index_terms(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .into_iter()
            .filter(|token| self.is_indexable(token) && !self.is_stop_word(token))
            .collect()
    }

    /// Index terms of a query, first occurrence only.
    pub fn query_terms(&self, query: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.index_terms(query)
            .into_iter()
            .filter(|term| seen.insert(term.clone()))
            .collect()
    }
}
