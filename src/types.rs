// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of the catalog index.
//!
//! Products come in from outside (a crawler, a feed, a test fixture) and are
//! never mutated. Everything else here is derived from a snapshot of them.
//!
//! # Invariants
//!
//! - **IndexEntry**: `doc_freq == postings.len()`. A product bumps the
//!   document frequency once, on its first occurrence of the term.
//! - **Posting**: `term_frequency >= 1` and `weight > 0` for every stored
//!   posting (zero-weight fields are never indexed).
//! - **RankedProduct**: in a non-empty result set the best `normalized_score`
//!   is exactly 1.0 and all of them lie in `[0, 1]`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// PRODUCT
// =============================================================================

/// A catalog record as handed over by the fetch/parse pipeline.
///
/// Text fields may be missing; they read as empty text everywhere.
/// Identity is `id` alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: String,
    pub name: Option<String>,
    pub price: f64,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub specifications: BTreeMap<String, String>,
    pub category: Option<String>,
    pub images: Vec<String>,
    pub url: Option<String>,
    pub currency: Option<String>,
    pub in_stock: bool,
    pub rating: Option<f64>,
    pub review_count: u32,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    pub fn with_specification(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.specifications.insert(key.into(), value.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    /// Every searchable piece of text, tagged with the field it came from.
    ///
    /// Order: name, description, features, specification values, category.
    /// Specification keys are labels, not product text, and are skipped.
    pub fn text_fields(&self) -> impl Iterator<Item = (ProductField, &str)> + '_ {
        let name = self.name.as_deref().map(|t| (ProductField::Name, t));
        let description = self
            .description
            .as_deref()
            .map(|t| (ProductField::Description, t));
        let features = self
            .features
            .iter()
            .map(|t| (ProductField::Feature, t.as_str()));
        let specifications = self
            .specifications
            .values()
            .map(|t| (ProductField::Specification, t.as_str()));
        let category = self.category.as_deref().map(|t| (ProductField::Category, t));

        name.into_iter()
            .chain(description)
            .chain(features)
            .chain(specifications)
            .chain(category)
    }
}

/// Which part of a product a piece of text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductField {
    Name,
    Description,
    Feature,
    Specification,
    Category,
}

// =============================================================================
// INDEX TYPES
// =============================================================================

/// Occurrence statistics of one term inside one product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Posting {
    /// How many times the term occurred, across all fields
    pub term_frequency: u32,
    /// Sum of the field weights of those occurrences
    pub weight: f64,
}

impl Posting {
    pub fn add_occurrence(&mut self, weight: f64) {
        self.term_frequency += 1;
        self.weight += weight;
    }
}

/// Everything the index knows about one term.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexEntry {
    /// Keyed by product id
    pub postings: HashMap<String, Posting>,
    /// Number of distinct products containing the term
    pub doc_freq: usize,
}

impl IndexEntry {
    /// Record one occurrence. Only the first occurrence per product counts
    /// towards `doc_freq`.
    pub fn add_occurrence(&mut self, product_id: &str, weight: f64) {
        let posting = self.postings.entry(product_id.to_string()).or_default();
        posting.add_occurrence(weight);

        if posting.term_frequency == 1 {
            self.doc_freq += 1;
        }
    }
}

/// One candidate returned by an index lookup.
#[derive(Debug, Clone, Serialize)]
pub struct IndexMatch {
    pub product: Arc<Product>,
    /// Raw TF-IDF score
    pub score: f64,
    pub matched_terms: BTreeSet<String>,
}

// =============================================================================
// RANKING TYPES
// =============================================================================

/// Where a ranked score came from.
///
/// The first five are additive; the two boosts multiply their sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub title: f64,
    pub description: f64,
    pub features: f64,
    pub specifications: f64,
    pub phrase: f64,
    pub category_boost: f64,
    pub frequency_boost: f64,
}

impl ScoreBreakdown {
    /// Additive part, before boosts.
    pub fn base(&self) -> f64 {
        self.title + self.description + self.features + self.specifications + self.phrase
    }

    /// `base * category_boost * frequency_boost`
    pub fn total(&self) -> f64 {
        self.base() * self.category_boost * self.frequency_boost
    }

    /// Named components, for display.
    pub fn components(&self) -> [(&'static str, f64); 7] {
        [
            ("title", self.title),
            ("description", self.description),
            ("features", self.features),
            ("specifications", self.specifications),
            ("phrase", self.phrase),
            ("category_boost", self.category_boost),
            ("frequency_boost", self.frequency_boost),
        ]
    }
}

/// A product with its final score.
#[derive(Debug, Clone, Serialize)]
pub struct RankedProduct {
    pub product: Arc<Product>,
    pub score: f64,
    /// `score / max score in this result set`
    pub normalized_score: f64,
    pub breakdown: ScoreBreakdown,
}

// =============================================================================
// SUGGESTION AND STATISTICS TYPES
// =============================================================================

/// A word completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub word: String,
    /// How many times the word was inserted while building
    pub frequency: u32,
    /// Products with some word starting with this one (sorted)
    pub product_ids: Vec<String>,
    /// Products containing exactly this word (sorted, subset of `product_ids`)
    pub exact_product_ids: Vec<String>,
}

/// Result of checking a single word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpellCheck {
    pub word: String,
    pub valid: bool,
    pub suggestions: Vec<String>,
}

/// A word and how often it occurs across the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

/// History of one normalized query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchTermStat {
    pub query: String,
    pub count: u64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl SearchTermStat {
    pub(crate) fn new(query: String, now: DateTime<Utc>) -> Self {
        Self {
            query,
            count: 0,
            first_seen: now,
            last_seen: now,
        }
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.count += 1;
        self.last_seen = now;
    }
}

/// Everything a single `search` call produces.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub query: String,
    pub spelling_suggestions: Vec<String>,
    pub completions: Vec<Suggestion>,
    pub index_matches: Vec<IndexMatch>,
    pub ranked_results: Vec<RankedProduct>,
    pub search_time_millis: u64,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.ranked_results.is_empty()
    }
}
