// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind search ranking.
//!
//! Two kinds of rarity weight live here. The index uses a catalog-wide IDF,
//! `ln(1 + N / df)`, which is always positive. The ranker re-weighs terms over
//! the candidate set only, `ln(n / (1 + df))`, which goes negative for a term
//! present in every candidate; that one is clamped at zero so a ubiquitous
//! term adds no rarity mass instead of subtracting it.
//!
//! # Section score
//!
//! ```text
//! section(text, term) = exact_bonus            (term is a standalone word)
//!                     + (1 + ln(count + 1)) * tf_factor
//!                     + candidate_idf * idf_factor
//!                     + position_bonus         (0.5 at offset 0, → 0 at the end)
//! ```
//!
//! A section that does not contain the term at all scores 0.

use crate::config::RankingConfig;
use crate::normalizer::{normalize, Normalizer};

/// Maximum position bonus (matches at start of text get this bonus).
pub const MAX_POSITION_BONUS: f64 = 0.5;

/// Catalog-wide inverse document frequency: `ln(1 + total_docs / doc_freq)`.
///
/// Returns 0.0 for a term no document contains.
#[inline]
pub fn calculate_idf(total_docs: usize, doc_freq: usize) -> f64 {
    if doc_freq == 0 {
        return 0.0;
    }
    (1.0 + total_docs as f64 / doc_freq as f64).ln()
}

/// Candidate-set IDF: `max(0, ln(candidates / (1 + doc_freq)))`.
#[inline]
pub fn candidate_idf(candidate_count: usize, doc_freq: usize) -> f64 {
    if candidate_count == 0 {
        return 0.0;
    }
    (candidate_count as f64 / (1.0 + doc_freq as f64)).ln().max(0.0)
}

/// Dampened term frequency: `1 + ln(count + 1)`.
#[inline]
pub fn smoothed_tf(count: usize) -> f64 {
    1.0 + (count as f64 + 1.0).ln()
}

/// Position bonus: matches near the start of text score slightly higher.
///
/// Range `[0, MAX_POSITION_BONUS]`, monotonically non-increasing in `offset`.
pub fn position_bonus(offset: usize, text_len: usize) -> f64 {
    if text_len > 0 {
        MAX_POSITION_BONUS * (1.0 - (offset.min(text_len) as f64 / text_len as f64))
    } else {
        0.0
    }
}

/// `1 + ln(1 + frequency) * factor`; never below 1.0.
#[inline]
pub fn frequency_boost(historical_frequency: u64, factor: f64) -> f64 {
    1.0 + (historical_frequency as f64).ln_1p() * factor
}

/// One piece of product text, normalized once and queried per term.
#[derive(Debug, Clone, Default)]
pub struct Section {
    /// Canonical text ("wireless soundbar with subwoofer")
    text: String,
    /// All canonical tokens, for standalone-word checks
    tokens: Vec<String>,
    /// Index terms (stop words and short tokens removed), for phrase checks
    terms: Vec<String>,
}

impl Section {
    pub fn new(raw: &str, normalizer: &Normalizer) -> Self {
        let text = normalize(raw);
        let tokens: Vec<String> = text
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        let terms = normalizer.index_terms(&text);
        Self { text, tokens, terms }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Non-overlapping substring occurrences of `term`.
    pub fn count(&self, term: &str) -> usize {
        if term.is_empty() {
            return 0;
        }
        self.text.matches(term).count()
    }

    pub fn contains(&self, term: &str) -> bool {
        !term.is_empty() && self.text.contains(term)
    }

    /// Does `term` appear as a whole token, not just inside one?
    pub fn has_word(&self, term: &str) -> bool {
        self.tokens.iter().any(|token| token == term)
    }

    pub fn first_offset(&self, term: &str) -> Option<usize> {
        self.text.find(term)
    }

    /// Do `phrase` terms occur contiguously among this section's index terms?
    pub fn contains_phrase(&self, phrase: &[String]) -> bool {
        if phrase.is_empty() || phrase.len() > self.terms.len() {
            return false;
        }
        self.terms.windows(phrase.len()).any(|window| window == phrase)
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }
}

/// Score one section against one query term.
pub fn section_score(section: &Section, term: &str, idf: f64, config: &RankingConfig) -> f64 {
    let count = section.count(term);
    if count == 0 {
        return 0.0;
    }

    let exact = if section.has_word(term) {
        config.exact_boundary_bonus
    } else {
        0.0
    };
    let position = section
        .first_offset(term)
        .map(|offset| position_bonus(offset, section.len()))
        .unwrap_or(0.0);

    exact + smoothed_tf(count) * config.tf_factor + idf * config.idf_factor + position
}

/// Mean section score over a list of sections, `max(1, n)` denominator.
pub fn average_section_score(
    sections: &[Section],
    term: &str,
    idf: f64,
    config: &RankingConfig,
) -> f64 {
    let total: f64 = sections
        .iter()
        .map(|section| section_score(section, term, idf, config))
        .sum();
    total / sections.len().max(1) as f64
}
