// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy matching: typo tolerance via edit distance.
//!
//! A plain two-row Levenshtein for exact distances and a bounded variant
//! that bails out as soon as the bound is provably exceeded. The spell
//! checker uses the bounded one for every vocabulary candidate.

mod levenshtein;

pub use levenshtein::*;
