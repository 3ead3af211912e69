// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Spell checking over the catalog vocabulary.
//!
//! The vocabulary is every indexable token of every product. Words are also
//! bucketed by length: a word within `k` edits of the query differs from it
//! in length by at most `k`, so only the buckets `len ± length_window` are
//! scanned, and each candidate goes through the bounded edit distance which
//! bails out as soon as the bound is exceeded.
//!
//! With the defaults (`length_window = 1`, `max_edit_distance = 2`) a word
//! two insertions away is never seen. That trade is deliberate and
//! configurable.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::config::SpellingConfig;
use crate::contracts::check_suggestions_bounded;
use crate::fuzzy::bounded_edit_distance;
use crate::normalizer::{normalize, Normalizer};
use crate::types::{Product, SpellCheck};

/// Lock-free spell checking counters.
///
/// Shared between the engine and every spell checker it builds, so totals
/// survive a catalog rebuild.
#[derive(Debug, Default)]
pub struct SpellStats {
    words_checked: AtomicU64,
    valid_words: AtomicU64,
    misspelled_words: AtomicU64,
    suggestions_generated: AtomicU64,
    total_check_micros: AtomicU64,
}

/// Point-in-time copy of [`SpellStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SpellStatsReport {
    pub words_checked: u64,
    pub valid_words: u64,
    pub misspelled_words: u64,
    pub suggestions_generated: u64,
    pub total_check_micros: u64,
}

impl SpellStats {
    fn record(&self, valid: bool, suggestions: usize, micros: u64) {
        self.words_checked.fetch_add(1, Ordering::Relaxed);
        if valid {
            self.valid_words.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misspelled_words.fetch_add(1, Ordering::Relaxed);
        }
        if suggestions > 0 {
            self.suggestions_generated.fetch_add(1, Ordering::Relaxed);
        }
        self.total_check_micros.fetch_add(micros, Ordering::Relaxed);
    }

    pub fn report(&self) -> SpellStatsReport {
        SpellStatsReport {
            words_checked: self.words_checked.load(Ordering::Relaxed),
            valid_words: self.valid_words.load(Ordering::Relaxed),
            misspelled_words: self.misspelled_words.load(Ordering::Relaxed),
            suggestions_generated: self.suggestions_generated.load(Ordering::Relaxed),
            total_check_micros: self.total_check_micros.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.words_checked.store(0, Ordering::Relaxed);
        self.valid_words.store(0, Ordering::Relaxed);
        self.misspelled_words.store(0, Ordering::Relaxed);
        self.suggestions_generated.store(0, Ordering::Relaxed);
        self.total_check_micros.store(0, Ordering::Relaxed);
    }
}

impl SpellStatsReport {
    /// Share of checked words that were valid, in `[0, 1]`.
    pub fn accuracy(&self) -> f64 {
        if self.words_checked == 0 {
            0.0
        } else {
            self.valid_words as f64 / self.words_checked as f64
        }
    }

    pub fn average_check_micros(&self) -> f64 {
        if self.words_checked == 0 {
            0.0
        } else {
            self.total_check_micros as f64 / self.words_checked as f64
        }
    }
}

/// Vocabulary and length buckets for one catalog snapshot.
#[derive(Debug, Clone)]
pub struct SpellChecker {
    vocabulary: HashSet<String>,
    by_length: BTreeMap<usize, BTreeSet<String>>,
    config: SpellingConfig,
    stats: Arc<SpellStats>,
}

impl Default for SpellChecker {
    fn default() -> Self {
        Self::from_vocabulary(HashSet::new(), SpellingConfig::default())
    }
}

fn product_words(product: &Product, normalizer: &Normalizer) -> HashSet<String> {
    product
        .text_fields()
        .flat_map(|(_, text)| normalizer.indexable_tokens(text))
        .collect()
}

impl SpellChecker {
    /// Build the vocabulary in parallel (per-product sets, merged by union).
    pub fn build(
        products: &[Arc<Product>],
        normalizer: &Normalizer,
        config: SpellingConfig,
    ) -> Self {
        let started = Instant::now();
        let vocabulary = products
            .par_iter()
            .map(|product| product_words(product, normalizer))
            .reduce(HashSet::new, |mut acc, words| {
                acc.extend(words);
                acc
            });

        let checker = Self::from_vocabulary(vocabulary, config);
        checker.log_built(started);
        checker
    }

    /// Single-threaded build. Same output as [`SpellChecker::build`].
    pub fn build_sequential(
        products: &[Arc<Product>],
        normalizer: &Normalizer,
        config: SpellingConfig,
    ) -> Self {
        let started = Instant::now();
        let mut vocabulary = HashSet::new();
        for product in products {
            vocabulary.extend(product_words(product, normalizer));
        }

        let checker = Self::from_vocabulary(vocabulary, config);
        checker.log_built(started);
        checker
    }

    fn from_vocabulary(vocabulary: HashSet<String>, config: SpellingConfig) -> Self {
        let mut by_length: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();
        for word in &vocabulary {
            by_length
                .entry(word.chars().count())
                .or_default()
                .insert(word.clone());
        }

        Self {
            vocabulary,
            by_length,
            config,
            stats: Arc::new(SpellStats::default()),
        }
    }

    fn log_built(&self, started: Instant) {
        info!(
            target: "shelfsearch::spell",
            words = self.vocabulary.len(),
            buckets = self.by_length.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "spelling vocabulary built"
        );
    }

    /// Record statistics into `stats` instead of a private counter set.
    pub fn with_stats(mut self, stats: Arc<SpellStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Case-insensitive vocabulary membership. Empty input is never valid.
    pub fn is_word_valid(&self, word: &str) -> bool {
        let word = normalize(word);
        !word.is_empty() && self.vocabulary.contains(&word)
    }

    /// Vocabulary words within `max_edit_distance` of `word`.
    ///
    /// Ordered by distance, then alphabetically; at most `max_suggestions`.
    /// The word itself is never suggested.
    pub fn get_suggestions(&self, word: &str) -> Vec<String> {
        let word = normalize(word);
        if word.is_empty() {
            return Vec::new();
        }

        let len = word.chars().count();
        let max = self.config.max_edit_distance;
        let spread = self.config.length_window;
        let window = len.saturating_sub(spread)..=len.saturating_add(spread);

        let mut scored: Vec<(usize, &String)> = self
            .by_length
            .range(window)
            .flat_map(|(_, words)| words.iter())
            .filter_map(|candidate| {
                bounded_edit_distance(&word, candidate, max)
                    .filter(|&distance| distance > 0)
                    .map(|distance| (distance, candidate))
            })
            .collect();

        scored.sort();
        let suggestions: Vec<String> = scored
            .into_iter()
            .take(self.config.max_suggestions)
            .map(|(_, candidate)| candidate.clone())
            .collect();

        check_suggestions_bounded(&word, &suggestions, max);
        suggestions
    }

    /// Validity plus suggestions for a misspelled word, recorded in the stats.
    pub fn check(&self, word: &str) -> SpellCheck {
        let started = Instant::now();
        let valid = self.is_word_valid(word);
        let suggestions = if valid {
            Vec::new()
        } else {
            self.get_suggestions(word)
        };

        self.stats.record(
            valid,
            suggestions.len(),
            started.elapsed().as_micros() as u64,
        );

        SpellCheck {
            word: normalize(word),
            valid,
            suggestions,
        }
    }

    pub fn stats(&self) -> SpellStatsReport {
        self.stats.report()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// The vocabulary, sorted.
    pub fn words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.vocabulary.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }
}
