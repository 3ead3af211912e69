// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Prefix completion over the catalog vocabulary.
//!
//! A character trie stored as an arena (`Vec<TrieNode>`, root at index 0).
//! Children are kept in a `BTreeMap`, so sibling order is lexicographic and
//! traversal order is deterministic.
//!
//! # Node bookkeeping
//!
//! - Every node on an inserted word's path records the product id, so a node
//!   knows which products have *some* word with that prefix.
//! - The terminal node counts insertions (`frequency`) and separately keeps
//!   the products the exact word came from.
//! - Every node also keeps `max_frequency`, the highest word frequency in its
//!   subtree. Lookups walk the subtree best-first on that bound, so the first
//!   `max_suggestions` words popped are exactly the most frequent ones and
//!   the rest of the subtree is never visited.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use crate::config::CompletionConfig;
use crate::contracts::check_suggestions_sorted;
use crate::normalizer::{tokenize, Normalizer};
use crate::types::{Product, Suggestion};

const ROOT: usize = 0;

#[derive(Debug, Clone, Default, PartialEq)]
struct TrieNode {
    children: BTreeMap<char, usize>,
    end_of_word: bool,
    frequency: u32,
    /// Highest `frequency` of any word ending in this subtree
    max_frequency: u32,
    /// Products with a word passing through this node
    product_ids: BTreeSet<String>,
    /// Products containing the word ending here
    word_product_ids: BTreeSet<String>,
}

/// Pending work in a best-first lookup: either a subtree still to expand or
/// a complete word ready to emit.
#[derive(Debug, PartialEq, Eq)]
struct Frontier {
    /// Subtree bound, or the exact frequency of a complete word
    bound: u32,
    word: String,
    index: usize,
    complete: bool,
}

impl Ord for Frontier {
    /// Max-heap order: higher bound first, then smaller word.
    fn cmp(&self, other: &Self) -> Ordering {
        self.bound
            .cmp(&other.bound)
            .then_with(|| other.word.cmp(&self.word))
            .then_with(|| self.complete.cmp(&other.complete))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Word trie for one catalog snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct WordCompletion {
    nodes: Vec<TrieNode>,
    word_count: usize,
    config: CompletionConfig,
}

impl Default for WordCompletion {
    fn default() -> Self {
        Self::new(CompletionConfig::default())
    }
}

fn product_words<'a>(product: &'a Product, normalizer: &Normalizer) -> (&'a str, Vec<String>) {
    let words = product
        .text_fields()
        .flat_map(|(_, text)| normalizer.indexable_tokens(text))
        .collect();
    (product.id.as_str(), words)
}

impl WordCompletion {
    /// An empty trie: every prefix completes to nothing.
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            word_count: 0,
            config,
        }
    }

    /// Tokenize products on the rayon pool, then insert in catalog order.
    pub fn build(
        products: &[Arc<Product>],
        normalizer: &Normalizer,
        config: CompletionConfig,
    ) -> Self {
        let started = Instant::now();
        let per_product: Vec<(&str, Vec<String>)> = products
            .par_iter()
            .map(|product| product_words(product, normalizer))
            .collect();

        let trie = Self::from_words(per_product, config);
        trie.log_built(started);
        trie
    }

    /// Single-threaded build. Same output as [`WordCompletion::build`].
    pub fn build_sequential(
        products: &[Arc<Product>],
        normalizer: &Normalizer,
        config: CompletionConfig,
    ) -> Self {
        let started = Instant::now();
        let per_product: Vec<(&str, Vec<String>)> = products
            .iter()
            .map(|product| product_words(product, normalizer))
            .collect();

        let trie = Self::from_words(per_product, config);
        trie.log_built(started);
        trie
    }

    fn from_words(per_product: Vec<(&str, Vec<String>)>, config: CompletionConfig) -> Self {
        let mut trie = Self::new(config);
        for (product_id, words) in per_product {
            for word in words {
                trie.insert(&word, product_id);
            }
        }
        trie
    }

    fn log_built(&self, started: Instant) {
        info!(
            target: "shelfsearch::completion",
            words = self.word_count,
            nodes = self.nodes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "completion trie built"
        );
    }

    /// Insert one occurrence of an already-normalized word.
    pub fn insert(&mut self, word: &str, product_id: &str) {
        if word.is_empty() {
            return;
        }

        let mut current = ROOT;
        let mut path = Vec::with_capacity(word.len() + 1);
        path.push(ROOT);
        for c in word.chars() {
            let next = match self.nodes[current].children.get(&c) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[current].children.insert(c, child);
                    child
                }
            };
            current = next;
            path.push(current);
            self.nodes[current].product_ids.insert(product_id.to_string());
        }

        let node = &mut self.nodes[current];
        if !node.end_of_word {
            node.end_of_word = true;
            self.word_count += 1;
        }
        node.frequency += 1;
        node.word_product_ids.insert(product_id.to_string());

        let frequency = node.frequency;
        for index in path {
            let bound = &mut self.nodes[index].max_frequency;
            *bound = (*bound).max(frequency);
        }
    }

    fn find(&self, prefix: &str) -> Option<usize> {
        prefix
            .chars()
            .try_fold(ROOT, |node, c| self.nodes[node].children.get(&c).copied())
    }

    /// Completions of the last word of `input`.
    ///
    /// Highest frequency first, ties alphabetical, at most `max_suggestions`
    /// (and never more than `max_scan_words`).
    pub fn get_suggestions(&self, input: &str) -> Vec<Suggestion> {
        let Some(prefix) = tokenize(input).pop() else {
            return Vec::new();
        };
        let Some(start) = self.find(&prefix) else {
            return Vec::new();
        };

        let limit = self.config.max_suggestions.min(self.config.max_scan_words);
        let mut suggestions = Vec::with_capacity(limit.min(self.word_count));
        let mut frontier = BinaryHeap::new();
        frontier.push(Frontier {
            bound: self.nodes[start].max_frequency,
            word: prefix,
            index: start,
            complete: false,
        });

        while let Some(item) = frontier.pop() {
            if suggestions.len() >= limit {
                break;
            }
            let node = &self.nodes[item.index];
            if item.complete {
                suggestions.push(Suggestion {
                    word: item.word,
                    frequency: node.frequency,
                    product_ids: node.product_ids.iter().cloned().collect(),
                    exact_product_ids: node.word_product_ids.iter().cloned().collect(),
                });
                continue;
            }

            if node.end_of_word {
                frontier.push(Frontier {
                    bound: node.frequency,
                    word: item.word.clone(),
                    index: item.index,
                    complete: true,
                });
            }
            for (&c, &child) in &node.children {
                let mut next = item.word.clone();
                next.push(c);
                frontier.push(Frontier {
                    bound: self.nodes[child].max_frequency,
                    word: next,
                    index: child,
                    complete: false,
                });
            }
        }

        check_suggestions_sorted(&suggestions);
        suggestions
    }

    /// Is `word` a complete word in the trie (not just a prefix)?
    pub fn contains(&self, word: &str) -> bool {
        self.find(word)
            .map(|index| self.nodes[index].end_of_word)
            .unwrap_or(false)
    }

    /// Products having some word that starts with `prefix`.
    pub fn products_with_prefix(&self, prefix: &str) -> Vec<String> {
        match self.find(prefix) {
            Some(index) if index != ROOT => self.nodes[index].product_ids.iter().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Number of distinct words.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every word in lexicographic order.
    pub fn words(&self) -> Vec<String> {
        let mut words = Vec::with_capacity(self.word_count);
        let mut stack = vec![(ROOT, String::new())];
        while let Some((index, word)) = stack.pop() {
            let node = &self.nodes[index];
            if node.end_of_word {
                words.push(word.clone());
            }
            for (&c, &child) in node.children.iter().rev() {
                let mut next = word.clone();
                next.push(c);
                stack.push((child, next));
            }
        }
        words
    }
}
