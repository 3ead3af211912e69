// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ranking: how candidate products get sorted.
//!
//! The index lookup already found the candidates. Ranking rescores them with
//! more context than TF-IDF has: which section a term landed in, whether it
//! is a whole word there, whether the query occurs as a phrase, the
//! product's category, and how often the product's text used the query terms.
//!
//! ```text
//! base  = title_weight          * Σ_t section(name, t)
//!       + description_weight    * Σ_t section(description, t)
//!       + features_weight       * Σ_t mean_f section(feature_f, t)
//!       + specifications_weight * Σ_t mean_s section(spec_value_s, t)
//!       + phrase
//! score = base * category_boost * frequency_boost
//! ```
//!
//! Scores are then normalized against the best one, so the top result always
//! reads 1.0 and the rest lie in `[0, 1]`.

use std::cmp::Ordering;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use super::core::{average_section_score, candidate_idf, frequency_boost, section_score, Section};
use crate::config::RankingConfig;
use crate::contracts::check_ranking_normalized;
use crate::frequency::FrequencyAnalyzer;
use crate::normalizer::Normalizer;
use crate::types::{Product, RankedProduct, ScoreBreakdown};

/// Product text split into the sections the ranker weighs separately.
struct ProductSections {
    name: Section,
    description: Section,
    features: Vec<Section>,
    specifications: Vec<Section>,
}

impl ProductSections {
    fn new(product: &Product, normalizer: &Normalizer) -> Self {
        Self {
            name: Section::new(product.name(), normalizer),
            description: Section::new(product.description(), normalizer),
            features: product
                .features
                .iter()
                .map(|feature| Section::new(feature, normalizer))
                .collect(),
            specifications: product
                .specifications
                .values()
                .map(|value| Section::new(value, normalizer))
                .collect(),
        }
    }

    fn contains(&self, term: &str) -> bool {
        self.name.contains(term)
            || self.description.contains(term)
            || self.features.iter().any(|s| s.contains(term))
            || self.specifications.iter().any(|s| s.contains(term))
    }
}

/// Compare two ranked products.
///
/// Sort order:
/// 1. **Score** - higher wins
/// 2. **Name** - alphabetical tiebreaker for determinism
/// 3. **Product ID** - final tiebreaker when everything else is equal
pub fn compare_ranked(a: &RankedProduct, b: &RankedProduct) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.product.name().cmp(b.product.name()))
        .then_with(|| a.product.id.cmp(&b.product.id))
}

/// Multi-signal ranker over a candidate set.
#[derive(Debug, Clone)]
pub struct Ranker {
    config: RankingConfig,
    normalizer: Normalizer,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(RankingConfig::default(), Normalizer::default())
    }
}

impl Ranker {
    pub fn new(config: RankingConfig, normalizer: Normalizer) -> Self {
        Self { config, normalizer }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Score, sort and normalize `candidates` for `query`.
    ///
    /// Every candidate appears exactly once in the output. An empty query
    /// scores everything 0, and an all-zero result set normalizes to 1.0
    /// across the board.
    pub fn rank_products(
        &self,
        candidates: &[Arc<Product>],
        query: &str,
        frequencies: &FrequencyAnalyzer,
    ) -> Vec<RankedProduct> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let terms = self.normalizer.query_terms(query);
        let sections: Vec<ProductSections> = candidates
            .par_iter()
            .map(|product| ProductSections::new(product, &self.normalizer))
            .collect();

        // Rarity over the candidate set, not the whole catalog
        let idfs: Vec<f64> = terms
            .iter()
            .map(|term| {
                let doc_freq = sections.iter().filter(|s| s.contains(term)).count();
                candidate_idf(candidates.len(), doc_freq)
            })
            .collect();

        let mut ranked: Vec<RankedProduct> = candidates
            .par_iter()
            .zip(sections.par_iter())
            .map(|(product, sections)| {
                let breakdown = self.score(product, sections, &terms, &idfs, frequencies);
                RankedProduct {
                    product: Arc::clone(product),
                    score: breakdown.total(),
                    normalized_score: 0.0,
                    breakdown,
                }
            })
            .collect();

        ranked.sort_by(compare_ranked);
        normalize_scores(&mut ranked);

        // INVARIANT: top result is 1.0, all in [0, 1]
        check_ranking_normalized(&ranked);

        debug!(
            target: "shelfsearch::ranking",
            query,
            terms = terms.len(),
            candidates = ranked.len(),
            top_score = ranked.first().map(|r| r.score).unwrap_or(0.0),
            "ranked candidates"
        );
        ranked
    }

    fn score(
        &self,
        product: &Product,
        sections: &ProductSections,
        terms: &[String],
        idfs: &[f64],
        frequencies: &FrequencyAnalyzer,
    ) -> ScoreBreakdown {
        let config = &self.config;
        let mut breakdown = ScoreBreakdown::default();

        for (term, &idf) in terms.iter().zip(idfs) {
            breakdown.title += section_score(&sections.name, term, idf, config);
            breakdown.description += section_score(&sections.description, term, idf, config);
            breakdown.features += average_section_score(&sections.features, term, idf, config);
            breakdown.specifications +=
                average_section_score(&sections.specifications, term, idf, config);
        }
        breakdown.title *= config.title_weight;
        breakdown.description *= config.description_weight;
        breakdown.features *= config.features_weight;
        breakdown.specifications *= config.specifications_weight;

        if terms.len() >= 2 {
            if sections.name.contains_phrase(terms) {
                breakdown.phrase += config.phrase_bonus * config.title_weight;
            }
            if sections.description.contains_phrase(terms) {
                breakdown.phrase += config.phrase_bonus * config.description_weight;
            }
        }

        breakdown.category_boost = config.category_boosts.boost_for(product.category());

        let historical: u64 = terms
            .iter()
            .map(|term| frequencies.word_frequency(term, &product.id))
            .sum();
        breakdown.frequency_boost = frequency_boost(historical, config.frequency_boost_factor);

        breakdown
    }
}

/// Divide by the best score. A zero (or empty) best makes everything 1.0.
fn normalize_scores(ranked: &mut [RankedProduct]) {
    let max = ranked.iter().map(|r| r.score).fold(0.0_f64, f64::max);
    for result in ranked.iter_mut() {
        result.normalized_score = if max > 0.0 {
            (result.score / max).clamp(0.0, 1.0)
        } else {
            1.0
        };
    }
}
