// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search engine: builds every structure from one catalog snapshot and
//! answers queries against it.
//!
//! # Build
//!
//! The inverted index, spell checker, completion trie and frequency counters
//! depend only on the products, never on each other, so they are built
//! concurrently with nested `rayon::join`. The result is one immutable
//! [`EngineSnapshot`].
//!
//! # Swap
//!
//! The engine holds `RwLock<Arc<EngineSnapshot>>`. A query clones the `Arc`
//! under a read lock and works on that snapshot for its whole duration. A
//! rebuild constructs the new snapshot without holding any lock and then
//! takes the write lock only to replace the pointer, so readers see either
//! the old snapshot or the new one, never a mix.
//!
//! # Query pipeline
//!
//! ```text
//! query ─► spell check ─► completion ─► index lookup ─► ranking ─► record search
//! ```

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::completion::WordCompletion;
use crate::config::EngineConfig;
use crate::error::{ConfigError, PatternError};
use crate::frequency::{FrequencyAnalyzer, SearchLog};
use crate::inverted::InvertedIndex;
use crate::normalizer::Normalizer;
use crate::patterns::{self, FeatureKind, PatternMatch, ProductMetrics};
use crate::scoring::Ranker;
use crate::spell::{SpellChecker, SpellStats, SpellStatsReport};
use crate::types::{Product, SearchResult, SearchTermStat, Suggestion, WordCount};

/// Everything derived from one catalog snapshot.
#[derive(Debug)]
pub struct EngineSnapshot {
    products: Vec<Arc<Product>>,
    index: InvertedIndex,
    spell_checker: SpellChecker,
    completion: WordCompletion,
    frequencies: FrequencyAnalyzer,
    ranker: Ranker,
    built_at: DateTime<Utc>,
}

/// Drop repeated ids, keeping the first record of each.
fn dedupe_products(products: Vec<Product>) -> Vec<Arc<Product>> {
    let mut seen = HashSet::with_capacity(products.len());
    let mut unique = Vec::with_capacity(products.len());
    for product in products {
        if !seen.insert(product.id.clone()) {
            warn!(
                target: "shelfsearch::engine",
                product_id = %product.id,
                "duplicate product id, keeping first occurrence"
            );
            continue;
        }
        unique.push(Arc::new(product));
    }
    unique
}

impl EngineSnapshot {
    /// Build all four structures concurrently.
    pub fn build(
        products: Vec<Product>,
        config: &EngineConfig,
        search_log: Arc<SearchLog>,
        spell_stats: Arc<SpellStats>,
    ) -> Self {
        let normalizer = Normalizer::new(&config.normalizer);
        let products = dedupe_products(products);

        let ((index, spell_checker), (completion, frequencies)) = rayon::join(
            || {
                rayon::join(
                    || InvertedIndex::build(&products, &normalizer, config.field_weights),
                    || SpellChecker::build(&products, &normalizer, config.spelling),
                )
            },
            || {
                rayon::join(
                    || WordCompletion::build(&products, &normalizer, config.completion),
                    || {
                        let frequencies = FrequencyAnalyzer::new(normalizer.clone())
                            .with_search_log(search_log);
                        frequencies.analyze_products(&products);
                        frequencies
                    },
                )
            },
        );

        Self {
            ranker: Ranker::new(config.ranking.clone(), normalizer),
            spell_checker: spell_checker.with_stats(spell_stats),
            products,
            index,
            completion,
            frequencies,
            built_at: Utc::now(),
        }
    }

    /// Build the four structures one after another on the calling thread.
    pub fn build_sequential(
        products: Vec<Product>,
        config: &EngineConfig,
        search_log: Arc<SearchLog>,
        spell_stats: Arc<SpellStats>,
    ) -> Self {
        let normalizer = Normalizer::new(&config.normalizer);
        let products = dedupe_products(products);

        let index = InvertedIndex::build_sequential(&products, &normalizer, config.field_weights);
        let spell_checker = SpellChecker::build_sequential(&products, &normalizer, config.spelling)
            .with_stats(spell_stats);
        let completion =
            WordCompletion::build_sequential(&products, &normalizer, config.completion);
        let frequencies =
            FrequencyAnalyzer::new(normalizer.clone()).with_search_log(search_log);
        frequencies.analyze_products(&products);

        Self {
            ranker: Ranker::new(config.ranking.clone(), normalizer),
            products,
            index,
            spell_checker,
            completion,
            frequencies,
            built_at: Utc::now(),
        }
    }

    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn spell_checker(&self) -> &SpellChecker {
        &self.spell_checker
    }

    pub fn completion(&self) -> &WordCompletion {
        &self.completion
    }

    pub fn frequencies(&self) -> &FrequencyAnalyzer {
        &self.frequencies
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Run the full query pipeline against this snapshot.
    pub fn search(&self, query: &str) -> SearchResult {
        let started = Instant::now();

        let mut spelling_suggestions: Vec<String> = Vec::new();
        for term in self.index.normalizer().query_terms(query) {
            let check = self.spell_checker.check(&term);
            for suggestion in check.suggestions {
                if !spelling_suggestions.contains(&suggestion) {
                    spelling_suggestions.push(suggestion);
                }
            }
        }

        let completions = self.completion.get_suggestions(query);

        let index_matches = self.index.search(query);
        let candidates: Vec<Arc<Product>> = index_matches
            .iter()
            .map(|m| Arc::clone(&m.product))
            .collect();
        let ranked_results = self
            .ranker
            .rank_products(&candidates, query, &self.frequencies);

        self.frequencies.record_search(query);

        let search_time_millis = started.elapsed().as_millis() as u64;
        debug!(
            target: "shelfsearch::engine",
            query,
            spelling = spelling_suggestions.len(),
            completions = completions.len(),
            matches = index_matches.len(),
            elapsed_ms = search_time_millis,
            "search completed"
        );

        SearchResult {
            query: query.to_string(),
            spelling_suggestions,
            completions,
            index_matches,
            ranked_results,
            search_time_millis,
        }
    }
}

/// Catalog search with atomic rebuilds.
///
/// Safe to share across threads: queries take a read lock only long enough
/// to clone the current snapshot pointer.
#[derive(Debug)]
pub struct SearchEngine {
    config: EngineConfig,
    snapshot: RwLock<Arc<EngineSnapshot>>,
    search_log: Arc<SearchLog>,
    spell_stats: Arc<SpellStats>,
}

impl SearchEngine {
    /// Validate `config` and start with an empty catalog.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let search_log = Arc::new(SearchLog::new());
        let spell_stats = Arc::new(SpellStats::default());
        let empty = EngineSnapshot::build_sequential(
            Vec::new(),
            &config,
            Arc::clone(&search_log),
            Arc::clone(&spell_stats),
        );

        Ok(Self {
            config,
            snapshot: RwLock::new(Arc::new(empty)),
            search_log,
            spell_stats,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build every structure from `products` and publish them.
    pub fn initialize(&self, products: Vec<Product>) {
        self.rebuild(products);
    }

    /// Replace the catalog. The search log and spell statistics carry over.
    pub fn rebuild(&self, products: Vec<Product>) {
        let started = Instant::now();
        let submitted = products.len();
        let snapshot = EngineSnapshot::build(
            products,
            &self.config,
            Arc::clone(&self.search_log),
            Arc::clone(&self.spell_stats),
        );

        info!(
            target: "shelfsearch::engine",
            submitted,
            products = snapshot.products.len(),
            terms = snapshot.index.term_count(),
            vocabulary = snapshot.spell_checker.vocabulary_size(),
            trie_nodes = snapshot.completion.node_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog snapshot published"
        );

        *self.snapshot.write() = Arc::new(snapshot);
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<EngineSnapshot> {
        Arc::clone(&self.snapshot.read())
    }

    pub fn search(&self, query: &str) -> SearchResult {
        self.snapshot().search(query)
    }

    pub fn product_count(&self) -> usize {
        self.snapshot().products.len()
    }

    pub fn top_words(&self, limit: usize) -> Vec<WordCount> {
        self.snapshot().frequencies.top_words(limit)
    }

    pub fn top_searches(&self, limit: usize) -> Vec<SearchTermStat> {
        self.search_log.top(limit)
    }

    pub fn word_frequency(&self, word: &str, product_id: &str) -> u64 {
        self.snapshot().frequencies.word_frequency(word, product_id)
    }

    pub fn completion_suggestions(&self, prefix: &str) -> Vec<Suggestion> {
        self.snapshot().completion.get_suggestions(prefix)
    }

    pub fn spelling_suggestions(&self, word: &str) -> Vec<String> {
        self.snapshot().spell_checker.get_suggestions(word)
    }

    pub fn spell_stats(&self) -> SpellStatsReport {
        self.spell_stats.report()
    }

    /// Products in the current catalog with any text matching the regular
    /// expression `pattern` (case-insensitive).
    pub fn find_products_matching(
        &self,
        pattern: &str,
    ) -> Result<Vec<Arc<Product>>, PatternError> {
        patterns::find_products_matching(&self.snapshot().products, pattern)
    }

    /// The current catalog bucketed by detected audio features.
    pub fn categorize_by_features(&self) -> BTreeMap<FeatureKind, Vec<Arc<Product>>> {
        patterns::categorize_by_features(&self.snapshot().products)
    }

    /// Feature occurrences in one product, or `None` for an unknown id.
    pub fn find_patterns(&self, product_id: &str) -> Option<Vec<PatternMatch>> {
        let snapshot = self.snapshot();
        snapshot.index.product(product_id).map(|p| patterns::find_patterns(p))
    }

    /// Power and channel figures of one product, or `None` for an unknown id.
    pub fn product_metrics(&self, product_id: &str) -> Option<ProductMetrics> {
        let snapshot = self.snapshot();
        snapshot.index.product(product_id).map(|p| patterns::extract_metrics(p))
    }

    /// Drop the search history. Catalog counters are untouched.
    pub fn clear_search_log(&self) {
        self.search_log.clear();
        info!(target: "shelfsearch::engine", "search log cleared");
    }
}
