// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Inverted index construction and TF-IDF lookup.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **DOC_FREQ_CORRECT**: `doc_freq` equals the number of distinct products
//!    in the posting map
//! 2. **NON_EMPTY**: every term has at least one posting
//! 3. **DOC_FREQ_BOUNDED**: `doc_freq <= total_documents`
//! 4. **POSITIVE_WEIGHT**: every posting has `term_frequency >= 1`, `weight > 0`

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::FieldWeights;
use crate::contracts::check_index_well_formed;
use crate::normalizer::Normalizer;
use crate::scoring::calculate_idf;
use crate::types::{IndexEntry, IndexMatch, Product};

/// Term → postings, over one catalog snapshot.
#[derive(Debug, Clone)]
pub struct InvertedIndex {
    terms: HashMap<String, IndexEntry>,
    products: HashMap<String, Arc<Product>>,
    normalizer: Normalizer,
    field_weights: FieldWeights,
}

impl Default for InvertedIndex {
    fn default() -> Self {
        Self::new(Normalizer::default(), FieldWeights::default())
    }
}

/// Weighted term occurrences of one product, in field order.
fn product_occurrences(
    product: &Product,
    normalizer: &Normalizer,
    field_weights: &FieldWeights,
) -> Vec<(String, f64)> {
    let mut occurrences = Vec::new();
    for (field, text) in product.text_fields() {
        let weight = field_weights.weight(field);
        if weight <= 0.0 {
            continue;
        }
        for term in normalizer.index_terms(text) {
            occurrences.push((term, weight));
        }
    }
    occurrences
}

impl InvertedIndex {
    /// An empty index: every search returns nothing.
    pub fn new(normalizer: Normalizer, field_weights: FieldWeights) -> Self {
        Self {
            terms: HashMap::new(),
            products: HashMap::new(),
            normalizer,
            field_weights,
        }
    }

    /// Build an index using parallel map-reduce.
    ///
    /// 1. **Map phase**: tokenize and weigh each product on the rayon pool
    /// 2. **Reduce phase**: fold occurrences into the index in catalog order
    ///
    /// The reduce runs in catalog order, so the result is identical to
    /// [`InvertedIndex::build_sequential`].
    pub fn build(
        products: &[Arc<Product>],
        normalizer: &Normalizer,
        field_weights: FieldWeights,
    ) -> Self {
        let started = Instant::now();

        // MAP PHASE
        let per_product: Vec<Vec<(String, f64)>> = products
            .par_iter()
            .map(|product| product_occurrences(product, normalizer, &field_weights))
            .collect();

        // REDUCE PHASE
        let index = Self::from_occurrences(products, per_product, normalizer, field_weights);
        index.log_built(started);
        index
    }

    /// Single-threaded build. Same output as [`InvertedIndex::build`].
    pub fn build_sequential(
        products: &[Arc<Product>],
        normalizer: &Normalizer,
        field_weights: FieldWeights,
    ) -> Self {
        let started = Instant::now();
        let per_product: Vec<Vec<(String, f64)>> = products
            .iter()
            .map(|product| product_occurrences(product, normalizer, &field_weights))
            .collect();

        let index = Self::from_occurrences(products, per_product, normalizer, field_weights);
        index.log_built(started);
        index
    }

    fn from_occurrences(
        products: &[Arc<Product>],
        per_product: Vec<Vec<(String, f64)>>,
        normalizer: &Normalizer,
        field_weights: FieldWeights,
    ) -> Self {
        let mut index = Self::new(normalizer.clone(), field_weights);

        for (product, occurrences) in products.iter().zip(per_product) {
            if index.products.contains_key(&product.id) {
                warn!(
                    target: "shelfsearch::index",
                    product_id = %product.id,
                    "duplicate product id, keeping first occurrence"
                );
                continue;
            }
            index
                .products
                .insert(product.id.clone(), Arc::clone(product));

            for (term, weight) in occurrences {
                index.add_occurrence(&term, &product.id, weight);
            }
        }

        // INVARIANT: DOC_FREQ_CORRECT, NON_EMPTY, DOC_FREQ_BOUNDED
        check_index_well_formed(&index);
        index
    }

    fn log_built(&self, started: Instant) {
        info!(
            target: "shelfsearch::index",
            terms = self.terms.len(),
            products = self.products.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "inverted index built"
        );
    }

    /// Record one occurrence of `term` in `product_id` with the given field weight.
    ///
    /// Document frequency moves only on the product's first occurrence.
    pub fn add_occurrence(&mut self, term: &str, product_id: &str, weight: f64) {
        match self.terms.get_mut(term) {
            Some(entry) => entry.add_occurrence(product_id, weight),
            None => {
                let mut entry = IndexEntry::default();
                entry.add_occurrence(product_id, weight);
                self.terms.insert(term.to_string(), entry);
            }
        }
    }

    /// TF-IDF lookup.
    ///
    /// For every query term present in the index, each posting contributes
    /// `tf * idf * accumulated_weight` with `idf = ln(1 + N / df)`.
    /// Results are sorted by score (descending), then product id.
    pub fn search(&self, query: &str) -> Vec<IndexMatch> {
        let mut scores: HashMap<&str, f64> = HashMap::new();
        let mut matched: HashMap<&str, BTreeSet<String>> = HashMap::new();

        for term in self.normalizer.query_terms(query) {
            let Some(entry) = self.terms.get(&term) else {
                continue;
            };
            let idf = calculate_idf(self.total_documents(), entry.doc_freq);

            for (product_id, posting) in &entry.postings {
                let score = f64::from(posting.term_frequency) * idf * posting.weight;
                *scores.entry(product_id.as_str()).or_insert(0.0) += score;
                matched
                    .entry(product_id.as_str())
                    .or_default()
                    .insert(term.clone());
            }
        }

        let mut results: Vec<IndexMatch> = scores
            .into_iter()
            .filter_map(|(product_id, score)| {
                let product = self.products.get(product_id)?;
                Some(IndexMatch {
                    product: Arc::clone(product),
                    score,
                    matched_terms: matched.remove(product_id).unwrap_or_default(),
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.product.id.cmp(&b.product.id))
        });

        debug!(
            target: "shelfsearch::index",
            query,
            matches = results.len(),
            "index lookup"
        );
        results
    }

    /// Rarity weight of a term over the whole catalog; 0.0 if unknown.
    pub fn idf(&self, term: &str) -> f64 {
        self.terms
            .get(term)
            .map(|entry| calculate_idf(self.total_documents(), entry.doc_freq))
            .unwrap_or(0.0)
    }

    pub fn entry(&self, term: &str) -> Option<&IndexEntry> {
        self.terms.get(term)
    }

    pub fn doc_freq(&self, term: &str) -> usize {
        self.terms.get(term).map(|entry| entry.doc_freq).unwrap_or(0)
    }

    pub fn total_documents(&self) -> usize {
        self.products.len()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.terms.iter().map(|(term, entry)| (term.as_str(), entry))
    }

    pub fn product(&self, product_id: &str) -> Option<&Arc<Product>> {
        self.products.get(product_id)
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }
}
