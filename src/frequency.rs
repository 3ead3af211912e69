// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Word and search frequency statistics.
//!
//! Two kinds of counters live here:
//!
//! - **Catalog counters**: how often each word occurs globally and in each
//!   product. Rebuilt from scratch with every catalog snapshot.
//! - **Search log**: how often each normalized query was searched, with
//!   first/last timestamps. That is user behavior, not catalog data, so the
//!   log is shared (`Arc<SearchLog>`) across rebuilds.
//!
//! All counters are `DashMap`s: increments on different keys never contend
//! on a global lock, and increments on the same key are serialized by the
//! shard lock, so none are lost.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use dashmap::DashMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::normalizer::{normalize, Normalizer};
use crate::types::{Product, SearchTermStat, WordCount};

/// Word counts of a single product.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductFrequency {
    pub words: HashMap<String, u32>,
    pub total_words: u64,
}

impl ProductFrequency {
    fn from_product(product: &Product, normalizer: &Normalizer) -> Self {
        let mut frequency = Self::default();
        for (_, text) in product.text_fields() {
            for word in normalizer.indexable_tokens(text) {
                *frequency.words.entry(word).or_insert(0) += 1;
                frequency.total_words += 1;
            }
        }
        frequency
    }
}

/// Normalized query → search statistics.
#[derive(Debug, Default)]
pub struct SearchLog {
    entries: DashMap<String, SearchTermStat>,
}

impl SearchLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one search. Queries that normalize to nothing are ignored.
    ///
    /// `first_seen` is set once; `last_seen` moves on every call.
    pub fn record(&self, query: &str) -> Option<SearchTermStat> {
        let query = normalize(query);
        if query.is_empty() {
            return None;
        }

        let now = Utc::now();
        let mut stat = self
            .entries
            .entry(query.clone())
            .or_insert_with(|| SearchTermStat::new(query, now));
        stat.touch(now);
        Some(stat.clone())
    }

    /// How many times `query` was searched.
    pub fn count(&self, query: &str) -> u64 {
        self.entries
            .get(&normalize(query))
            .map(|stat| stat.count)
            .unwrap_or(0)
    }

    pub fn get(&self, query: &str) -> Option<SearchTermStat> {
        self.entries.get(&normalize(query)).map(|stat| stat.clone())
    }

    /// Most searched queries, ties alphabetical. `limit == 0` is empty.
    pub fn top(&self, limit: usize) -> Vec<SearchTermStat> {
        if limit == 0 {
            return Vec::new();
        }
        let mut stats: Vec<SearchTermStat> =
            self.entries.iter().map(|entry| entry.value().clone()).collect();
        stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.query.cmp(&b.query)));
        stats.truncate(limit);
        stats
    }

    /// Number of distinct queries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every recorded query.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// Catalog word counters plus the (shared) search log.
#[derive(Debug)]
pub struct FrequencyAnalyzer {
    normalizer: Normalizer,
    global: DashMap<String, u64>,
    products: DashMap<String, ProductFrequency>,
    searches: Arc<SearchLog>,
}

impl Default for FrequencyAnalyzer {
    fn default() -> Self {
        Self::new(Normalizer::default())
    }
}

impl FrequencyAnalyzer {
    /// Empty counters and a fresh search log.
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            global: DashMap::new(),
            products: DashMap::new(),
            searches: Arc::new(SearchLog::new()),
        }
    }

    /// Record searches into an existing log instead of a fresh one.
    pub fn with_search_log(mut self, searches: Arc<SearchLog>) -> Self {
        self.searches = searches;
        self
    }

    pub fn search_log(&self) -> &Arc<SearchLog> {
        &self.searches
    }

    /// Count the words of every product.
    ///
    /// Products are tokenized on the rayon pool, registered in catalog order
    /// (a repeated id keeps its first record), and the global counters are
    /// then bumped concurrently.
    pub fn analyze_products(&self, products: &[Arc<Product>]) {
        let started = Instant::now();

        let counted: Vec<(&str, ProductFrequency)> = products
            .par_iter()
            .map(|product| {
                (
                    product.id.as_str(),
                    ProductFrequency::from_product(product, &self.normalizer),
                )
            })
            .collect();

        let mut accepted = Vec::with_capacity(counted.len());
        for (product_id, frequency) in counted {
            if self.products.contains_key(product_id) {
                warn!(
                    target: "shelfsearch::frequency",
                    product_id,
                    "duplicate product id, keeping first occurrence"
                );
                continue;
            }
            self.products
                .insert(product_id.to_string(), frequency.clone());
            accepted.push(frequency);
        }

        accepted.par_iter().for_each(|frequency| {
            for (word, count) in &frequency.words {
                *self.global.entry(word.clone()).or_insert(0) += u64::from(*count);
            }
        });

        info!(
            target: "shelfsearch::frequency",
            unique_words = self.global.len(),
            products = self.products.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "word frequencies analyzed"
        );
    }

    /// Count one search in the shared log.
    pub fn record_search(&self, query: &str) -> Option<SearchTermStat> {
        let stat = self.searches.record(query);
        if let Some(stat) = &stat {
            debug!(
                target: "shelfsearch::frequency",
                query = %stat.query,
                count = stat.count,
                "search recorded"
            );
        }
        stat
    }

    /// Most frequent catalog words, ties alphabetical. `limit == 0` is empty.
    pub fn top_words(&self, limit: usize) -> Vec<WordCount> {
        if limit == 0 {
            return Vec::new();
        }
        let mut words: Vec<WordCount> = self
            .global
            .iter()
            .map(|entry| WordCount {
                word: entry.key().clone(),
                count: *entry.value(),
            })
            .collect();
        words.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
        words.truncate(limit);
        words
    }

    pub fn top_searches(&self, limit: usize) -> Vec<SearchTermStat> {
        self.searches.top(limit)
    }

    /// Occurrences of `word` in one product; 0 for unknown word or product.
    pub fn word_frequency(&self, word: &str, product_id: &str) -> u64 {
        let word = normalize(word);
        self.products
            .get(product_id)
            .and_then(|frequency| frequency.words.get(&word).copied())
            .map(u64::from)
            .unwrap_or(0)
    }

    /// Occurrences of `word` across the catalog.
    pub fn global_word_frequency(&self, word: &str) -> u64 {
        self.global
            .get(&normalize(word))
            .map(|count| *count)
            .unwrap_or(0)
    }

    /// Share of a product's words that are `word`, in `[0, 1]`.
    pub fn word_frequency_ratio(&self, word: &str, product_id: &str) -> f64 {
        let total = self.total_words(product_id);
        if total == 0 {
            return 0.0;
        }
        self.word_frequency(word, product_id) as f64 / total as f64
    }

    /// Word counts of one product, sorted by word.
    pub fn words_for_product(&self, product_id: &str) -> BTreeMap<String, u32> {
        self.products
            .get(product_id)
            .map(|frequency| {
                frequency
                    .words
                    .iter()
                    .map(|(word, count)| (word.clone(), *count))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of counted words in one product.
    pub fn total_words(&self, product_id: &str) -> u64 {
        self.products
            .get(product_id)
            .map(|frequency| frequency.total_words)
            .unwrap_or(0)
    }

    pub fn search_count(&self, query: &str) -> u64 {
        self.searches.count(query)
    }

    pub fn unique_words(&self) -> usize {
        self.global.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}
