// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Engine configuration.
//!
//! Every knob has a default that reproduces the stock behavior, so
//! `EngineConfig::default()` is a complete configuration. Configs can also be
//! loaded from JSON; missing fields fall back to their defaults.
//!
//! ```ignore
//! let config = EngineConfig::default()
//!     .with_category_boost("refurbished", 0.8)?
//!     .with_min_token_length(2);
//! config.validate()?;
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::normalizer::{default_stop_words, normalize};
use crate::types::ProductField;

/// Shared tokenization rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Tokens shorter than this are not indexable
    pub min_token_length: usize,
    /// Keep tokens made only of digits ("2024", "1000")
    pub keep_numeric_tokens: bool,
    /// Dropped from index and query terms (not from the vocabulary)
    pub stop_words: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            min_token_length: 3,
            keep_numeric_tokens: false,
            stop_words: default_stop_words(),
        }
    }
}

/// Per-field weights used while building the inverted index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub name: f64,
    pub description: f64,
    pub feature: f64,
    pub specification: f64,
    pub category: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 2.0,
            description: 1.0,
            feature: 1.5,
            specification: 1.0,
            category: 1.2,
        }
    }
}

impl FieldWeights {
    pub fn weight(&self, field: ProductField) -> f64 {
        match field {
            ProductField::Name => self.name,
            ProductField::Description => self.description,
            ProductField::Feature => self.feature,
            ProductField::Specification => self.specification,
            ProductField::Category => self.category,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_weight("field_weights.name", self.name)?;
        check_weight("field_weights.description", self.description)?;
        check_weight("field_weights.feature", self.feature)?;
        check_weight("field_weights.specification", self.specification)?;
        check_weight("field_weights.category", self.category)
    }
}

/// Category keyword → score multiplier.
///
/// A product gets the largest multiplier whose keyword occurs in its
/// normalized category, or 1.0 when none does. Keywords are normalized on
/// insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct CategoryBoosts {
    boosts: BTreeMap<String, f64>,
}

impl Default for CategoryBoosts {
    fn default() -> Self {
        let boosts = [
            ("premium", 1.2),
            ("wireless", 1.1),
            ("bluetooth", 1.1),
            ("standard", 1.0),
        ]
        .into_iter()
        .map(|(keyword, boost)| (keyword.to_string(), boost))
        .collect();
        Self { boosts }
    }
}

impl From<BTreeMap<String, f64>> for CategoryBoosts {
    fn from(raw: BTreeMap<String, f64>) -> Self {
        let boosts = raw
            .into_iter()
            .map(|(keyword, boost)| (normalize(&keyword), boost))
            .collect();
        Self { boosts }
    }
}

impl From<CategoryBoosts> for BTreeMap<String, f64> {
    fn from(boosts: CategoryBoosts) -> Self {
        boosts.boosts
    }
}

impl CategoryBoosts {
    /// No boosts at all; every category scores 1.0.
    pub fn empty() -> Self {
        Self {
            boosts: BTreeMap::new(),
        }
    }

    /// Add or replace a rule.
    pub fn insert(&mut self, keyword: &str, multiplier: f64) -> Result<(), ConfigError> {
        let key = normalize(keyword);
        if key.is_empty() {
            return Err(ConfigError::EmptyCategoryKeyword(keyword.to_string()));
        }
        check_boost(&key, multiplier)?;
        self.boosts.insert(key, multiplier);
        Ok(())
    }

    /// Change an existing rule. Fails if the keyword was never configured.
    pub fn update(&mut self, keyword: &str, multiplier: f64) -> Result<(), ConfigError> {
        let key = normalize(keyword);
        check_boost(&key, multiplier)?;
        match self.boosts.get_mut(&key) {
            Some(slot) => {
                *slot = multiplier;
                Ok(())
            }
            None => Err(ConfigError::UnknownCategoryBoost(keyword.to_string())),
        }
    }

    /// Remove a rule, returning its multiplier.
    pub fn remove(&mut self, keyword: &str) -> Result<f64, ConfigError> {
        self.boosts
            .remove(&normalize(keyword))
            .ok_or_else(|| ConfigError::UnknownCategoryBoost(keyword.to_string()))
    }

    pub fn get(&self, keyword: &str) -> Option<f64> {
        self.boosts.get(&normalize(keyword)).copied()
    }

    pub fn len(&self) -> usize {
        self.boosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boosts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.boosts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Multiplier for a raw (unnormalized) category string.
    pub fn boost_for(&self, category: &str) -> f64 {
        let category = normalize(category);
        self.boosts
            .iter()
            .filter(|(keyword, _)| category.contains(keyword.as_str()))
            .map(|(_, boost)| *boost)
            .fold(None, |best: Option<f64>, boost| {
                Some(best.map_or(boost, |b| b.max(boost)))
            })
            .unwrap_or(1.0)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (keyword, boost) in &self.boosts {
            if keyword.is_empty() {
                return Err(ConfigError::EmptyCategoryKeyword(keyword.clone()));
            }
            check_boost(keyword, *boost)?;
        }
        Ok(())
    }
}

/// Weights and factors used by the ranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub title_weight: f64,
    pub description_weight: f64,
    pub features_weight: f64,
    pub specifications_weight: f64,
    /// Added when the term is a standalone word in the section
    pub exact_boundary_bonus: f64,
    pub tf_factor: f64,
    pub idf_factor: f64,
    /// Scaled by the section weight when the whole query occurs as a phrase
    pub phrase_bonus: f64,
    /// Scales `ln(1 + historical frequency)` in the frequency boost
    pub frequency_boost_factor: f64,
    pub category_boosts: CategoryBoosts,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            title_weight: 0.4,
            description_weight: 0.3,
            features_weight: 0.2,
            specifications_weight: 0.1,
            exact_boundary_bonus: 2.0,
            tf_factor: 1.0,
            idf_factor: 1.0,
            phrase_bonus: 1.0,
            frequency_boost_factor: 1.0,
            category_boosts: CategoryBoosts::default(),
        }
    }
}

impl RankingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_weight("ranking.title_weight", self.title_weight)?;
        check_weight("ranking.description_weight", self.description_weight)?;
        check_weight("ranking.features_weight", self.features_weight)?;
        check_weight("ranking.specifications_weight", self.specifications_weight)?;
        check_weight("ranking.exact_boundary_bonus", self.exact_boundary_bonus)?;
        check_weight("ranking.tf_factor", self.tf_factor)?;
        check_weight("ranking.idf_factor", self.idf_factor)?;
        check_weight("ranking.phrase_bonus", self.phrase_bonus)?;
        check_weight("ranking.frequency_boost_factor", self.frequency_boost_factor)?;
        self.category_boosts.validate()
    }
}

/// Largest accepted `max_edit_distance`. The bounded DP is quadratic in
/// word length and anything wider suggests unrelated words.
pub const MAX_EDIT_DISTANCE: usize = 8;

/// Largest accepted `length_window`.
pub const MAX_LENGTH_WINDOW: usize = 16;

/// Spell checker bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellingConfig {
    pub max_edit_distance: usize,
    pub max_suggestions: usize,
    /// Vocabulary buckets searched: query length ± this many characters
    pub length_window: usize,
}

impl Default for SpellingConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: 2,
            max_suggestions: 5,
            length_window: 1,
        }
    }
}

/// Completion bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub max_suggestions: usize,
    /// Hard cap on complete words collected per lookup, whatever
    /// `max_suggestions` says
    pub max_scan_words: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 10,
            max_scan_words: 1_000,
        }
    }
}

/// Everything the engine needs to know up front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub normalizer: NormalizerConfig,
    pub field_weights: FieldWeights,
    pub ranking: RankingConfig,
    pub spelling: SpellingConfig,
    pub completion: CompletionConfig,
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_min_token_length(mut self, min_token_length: usize) -> Self {
        self.normalizer.min_token_length = min_token_length;
        self
    }

    pub fn with_numeric_tokens(mut self, keep: bool) -> Self {
        self.normalizer.keep_numeric_tokens = keep;
        self
    }

    pub fn with_stop_words(mut self, stop_words: Vec<String>) -> Self {
        self.normalizer.stop_words = stop_words;
        self
    }

    pub fn with_field_weights(mut self, field_weights: FieldWeights) -> Self {
        self.field_weights = field_weights;
        self
    }

    pub fn with_ranking(mut self, ranking: RankingConfig) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_category_boost(
        mut self,
        keyword: &str,
        multiplier: f64,
    ) -> Result<Self, ConfigError> {
        self.ranking.category_boosts.insert(keyword, multiplier)?;
        Ok(self)
    }

    pub fn with_spelling(mut self, spelling: SpellingConfig) -> Self {
        self.spelling = spelling;
        self
    }

    pub fn with_completion(mut self, completion: CompletionConfig) -> Self {
        self.completion = completion;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.field_weights.validate()?;
        self.ranking.validate()?;
        if self.spelling.max_suggestions == 0 {
            return Err(ConfigError::ZeroLimit("spelling.max_suggestions"));
        }
        check_at_most(
            "spelling.max_edit_distance",
            self.spelling.max_edit_distance,
            MAX_EDIT_DISTANCE,
        )?;
        check_at_most(
            "spelling.length_window",
            self.spelling.length_window,
            MAX_LENGTH_WINDOW,
        )?;
        if self.completion.max_suggestions == 0 {
            return Err(ConfigError::ZeroLimit("completion.max_suggestions"));
        }
        if self.completion.max_scan_words == 0 {
            return Err(ConfigError::ZeroLimit("completion.max_scan_words"));
        }
        Ok(())
    }
}

fn check_weight(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeight { name, value })
    }
}

fn check_at_most(name: &'static str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value, max })
    }
}

fn check_boost(keyword: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidBoost {
            keyword: keyword.to_string(),
            value,
        })
    }
}
