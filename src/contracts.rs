// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for the derived structures.
//!
//! Debug-mode assertions that verify the properties the rest of the crate
//! relies on. These contracts:
//!
//! 1. Are **zero-cost in release builds** (use `debug_assert!`)
//! 2. Provide **early failure detection** during development
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! | Contract Function             | Property                                      |
//! |-------------------------------|-----------------------------------------------|
//! | `check_index_well_formed`     | `doc_freq == postings.len() <= N`, tf/weight > 0 |
//! | `check_ranking_normalized`    | sorted by score, top is 1.0, all in `[0, 1]`  |
//! | `check_suggestions_bounded`   | every suggestion within the edit distance     |
//! | `check_suggestions_sorted`    | completions by frequency desc, then word      |
//!
//! # Usage
//!
//! ```ignore
//! use shelfsearch::contracts::*;
//!
//! // In debug builds, this panics if invariant is violated
//! check_index_well_formed(&index);
//!
//! // In release builds, this is a no-op
//! ```

use crate::fuzzy::edit_distance;
use crate::inverted::InvertedIndex;
use crate::types::{RankedProduct, Suggestion};

// ============================================================================
// INDEX CONTRACTS
// ============================================================================

/// Check that every index entry is consistent with its postings.
///
/// # Panics (debug builds only)
/// Panics if a term has no postings, if `doc_freq` disagrees with the posting
/// count or exceeds the number of products, or if a posting has zero
/// frequency or non-positive weight.
#[inline]
pub fn check_index_well_formed(index: &InvertedIndex) {
    if !cfg!(debug_assertions) {
        return;
    }

    let total = index.total_documents();
    for (term, entry) in index.terms() {
        debug_assert!(
            !entry.postings.is_empty(),
            "Contract violation: term {:?} has no postings",
            term
        );
        debug_assert_eq!(
            entry.doc_freq,
            entry.postings.len(),
            "Contract violation: doc_freq of {:?} does not match its postings",
            term
        );
        debug_assert!(
            entry.doc_freq <= total,
            "Contract violation: doc_freq {} of {:?} > total documents {}",
            entry.doc_freq,
            term,
            total
        );
        for (product_id, posting) in &entry.postings {
            debug_assert!(
                posting.term_frequency >= 1 && posting.weight > 0.0,
                "Contract violation: posting ({:?}, {:?}) has tf {} weight {}",
                term,
                product_id,
                posting.term_frequency,
                posting.weight
            );
        }
    }
}

// ============================================================================
// RANKING CONTRACTS
// ============================================================================

/// Check that ranked results are sorted and normalized.
///
/// # Panics (debug builds only)
/// Panics if scores are not descending, if any normalized score leaves
/// `[0, 1]`, or if the top normalized score is not exactly 1.0.
#[inline]
pub fn check_ranking_normalized(ranked: &[RankedProduct]) {
    for pair in ranked.windows(2) {
        debug_assert!(
            pair[0].score >= pair[1].score,
            "Contract violation: ranking not sorted ({} before {})",
            pair[0].score,
            pair[1].score
        );
    }
    for result in ranked {
        debug_assert!(
            (0.0..=1.0).contains(&result.normalized_score),
            "Contract violation: normalized score {} of {:?} outside [0, 1]",
            result.normalized_score,
            result.product.id
        );
    }
    if let Some(top) = ranked.first() {
        debug_assert!(
            top.normalized_score == 1.0,
            "Contract violation: top normalized score is {}",
            top.normalized_score
        );
    }
}

// ============================================================================
// SPELLING CONTRACTS
// ============================================================================

/// Check that no suggestion is further than `max_distance` from `word`,
/// and that the word itself is not suggested.
#[inline]
pub fn check_suggestions_bounded(word: &str, suggestions: &[String], max_distance: usize) {
    if !cfg!(debug_assertions) {
        return;
    }

    for suggestion in suggestions {
        let distance = edit_distance(word, suggestion);
        debug_assert!(
            (1..=max_distance).contains(&distance),
            "Contract violation: suggestion {:?} for {:?} at distance {} (max {})",
            suggestion,
            word,
            distance,
            max_distance
        );
    }
}

// ============================================================================
// COMPLETION CONTRACTS
// ============================================================================

/// Check that completions come out by frequency descending, ties by word,
/// and that each exact product set is contained in its prefix set.
#[inline]
pub fn check_suggestions_sorted(suggestions: &[Suggestion]) {
    if !cfg!(debug_assertions) {
        return;
    }

    for pair in suggestions.windows(2) {
        debug_assert!(
            pair[0].frequency > pair[1].frequency
                || (pair[0].frequency == pair[1].frequency && pair[0].word < pair[1].word),
            "Contract violation: completion {:?} ({}) before {:?} ({})",
            pair[0].word,
            pair[0].frequency,
            pair[1].word,
            pair[1].frequency
        );
    }
    for suggestion in suggestions {
        debug_assert!(
            suggestion
                .exact_product_ids
                .iter()
                .all(|id| suggestion.product_ids.contains(id)),
            "Contract violation: exact products of {:?} missing from its prefix products",
            suggestion.word
        );
    }
}
