// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Product catalog search: TF-IDF index, multi-signal ranking, spelling
//! suggestions and word completion over one shared vocabulary.
//!
//! # Architecture
//!
//! ```text
//!                       ┌───────────────┐
//!                       │ normalizer.rs │  one tokenizer for everything
//!                       └───────┬───────┘
//!        ┌────────────────┬─────┴──────────┬──────────────────┐
//!        ▼                ▼                ▼                  ▼
//! ┌─────────────┐  ┌────────────┐  ┌───────────────┐  ┌──────────────┐
//! │ inverted.rs │  │  spell.rs  │  │ completion.rs │  │ frequency.rs │
//! │  (TF-IDF)   │  │(Levenshtein│  │    (trie)     │  │  (DashMap    │
//! │             │  │  buckets)  │  │               │  │   counters)  │
//! └──────┬──────┘  └─────┬──────┘  └───────┬───────┘  └──────┬───────┘
//!        │               │                 │                 │
//!        │      ┌────────┴─────────────────┴──┐     ┌────────▼───────┐
//!        └─────▶│          engine.rs          │◀────│ scoring/       │
//!               │ (parallel build, Arc swap,  │     │ (ranker)       │
//!               │  query pipeline)            │     └────────────────┘
//!               └─────────────────────────────┘
//! ```
//!
//! The four structures in the middle row are independent and built
//! concurrently from one immutable catalog snapshot. `patterns.rs` sits
//! beside them and runs regular expressions over the raw product records of
//! the same snapshot.
//!
//! # Usage
//!
//! ```
//! use shelfsearch::{EngineConfig, Product, SearchEngine};
//!
//! let engine = SearchEngine::new(EngineConfig::default()).unwrap();
//! engine.initialize(vec![
//!     Product::new("sb-1", "Wireless Soundbar").with_description("Dolby Atmos soundbar"),
//!     Product::new("sp-2", "Bluetooth Speaker").with_description("Portable speaker"),
//! ]);
//!
//! let result = engine.search("wireless soundbarr");
//! assert_eq!(result.ranked_results[0].product.id, "sb-1");
//! assert!(result.spelling_suggestions.contains(&"soundbar".to_string()));
//! ```
//!
//! # Logging
//!
//! Every component logs through `tracing` under the `shelfsearch::*`
//! targets. The library never installs a subscriber.

pub mod completion;
pub mod config;
pub mod contracts;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod fuzzy;
pub mod inverted;
pub mod normalizer;
pub mod patterns;
pub mod scoring;
pub mod spell;
pub mod types;

pub mod testing;

pub use completion::WordCompletion;
pub use config::{
    CategoryBoosts, CompletionConfig, EngineConfig, FieldWeights, NormalizerConfig, RankingConfig,
    SpellingConfig,
};
pub use engine::{EngineSnapshot, SearchEngine};
pub use error::{ConfigError, PatternError};
pub use frequency::{FrequencyAnalyzer, ProductFrequency, SearchLog};
pub use fuzzy::{bounded_edit_distance, edit_distance, levenshtein_within};
pub use inverted::InvertedIndex;
pub use normalizer::{normalize, tokenize, Normalizer};
pub use patterns::{FeatureKind, PatternMatch, ProductMetrics};
pub use scoring::ranking::compare_ranked;
pub use scoring::{calculate_idf, candidate_idf, position_bonus, Ranker};
pub use spell::{SpellChecker, SpellStats, SpellStatsReport};
pub use types::{
    IndexEntry, IndexMatch, Posting, Product, ProductField, RankedProduct, ScoreBreakdown,
    SearchResult, SearchTermStat, SpellCheck, Suggestion, WordCount,
};
