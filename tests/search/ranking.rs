//! Ranking through the engine: weights, boosts, normalization, explanation.

use shelfsearch::{EngineConfig, Product, RankingConfig, SearchEngine};

use crate::common::{assert_normalized, catalog_engine, engine_with, make_product, ranked_ids};

#[test]
fn test_ranked_results_normalized() {
    let engine = catalog_engine();
    for query in ["soundbar", "wireless", "bluetooth speaker", "deep bass", "optical"] {
        let result = engine.search(query);
        assert!(!result.ranked_results.is_empty(), "no results for {:?}", query);
        assert_normalized(&result.ranked_results);
    }
}

#[test]
fn test_every_candidate_ranked_once() {
    let engine = catalog_engine();
    let result = engine.search("wireless bluetooth bass");
    let mut matched: Vec<String> = result
        .index_matches
        .iter()
        .map(|m| m.product.id.clone())
        .collect();
    let mut ranked = ranked_ids(&result.ranked_results);
    matched.sort();
    ranked.sort();
    assert_eq!(matched, ranked);
}

#[test]
fn test_name_match_ranks_first() {
    let engine = catalog_engine();
    let result = engine.search("subwoofer");
    assert_eq!(result.ranked_results[0].product.id, "sw-500");
}

#[test]
fn test_breakdown_explains_score() {
    let engine = catalog_engine();
    let result = engine.search("wireless soundbar");
    for r in &result.ranked_results {
        assert!((r.breakdown.total() - r.score).abs() < 1e-9);
        assert!(r.breakdown.category_boost >= 1.0);
        assert!(r.breakdown.frequency_boost >= 1.0);
        assert_eq!(r.breakdown.components().len(), 7);
    }
    let top = &result.ranked_results[0];
    assert_eq!(top.product.id, "sb-100");
    assert!(top.breakdown.phrase > 0.0);
}

#[test]
fn test_custom_category_boost() {
    let config = EngineConfig::default()
        .with_category_boost("refurbished", 3.0)
        .unwrap();
    let engine = SearchEngine::new(config).unwrap();
    engine.initialize(vec![
        make_product("new", "Soundbar", "").with_category("Audio"),
        make_product("refurb", "Soundbar", "").with_category("Refurbished Audio"),
    ]);
    let result = engine.search("soundbar");
    assert_eq!(ranked_ids(&result.ranked_results), vec!["refurb", "new"]);
    assert_eq!(result.ranked_results[0].breakdown.category_boost, 3.0);
}

#[test]
fn test_zero_weights_zero_scores() {
    let ranking = RankingConfig {
        title_weight: 0.0,
        description_weight: 0.0,
        features_weight: 0.0,
        specifications_weight: 0.0,
        ..RankingConfig::default()
    };
    let engine = SearchEngine::new(EngineConfig::default().with_ranking(ranking)).unwrap();
    engine.initialize(vec![
        make_product("b", "Soundbar", ""),
        make_product("a", "Soundbar Pro", ""),
    ]);
    let result = engine.search("soundbar");
    assert!(result.ranked_results.iter().all(|r| r.score == 0.0));
    assert!(result.ranked_results.iter().all(|r| r.normalized_score == 1.0));
    // Tied scores fall back to name order
    assert_eq!(ranked_ids(&result.ranked_results), vec!["b", "a"]);
}

#[test]
fn test_features_and_specifications_contribute() {
    let engine = engine_with(vec![
        Product::new("feat", "Speaker").with_feature("Waterproof"),
        Product::new("spec", "Speaker").with_specification("Rating", "Waterproof"),
        Product::new("none", "Speaker waterproof-ish"),
    ]);
    let result = engine.search("waterproof");
    let feat = result.ranked_results.iter().find(|r| r.product.id == "feat").unwrap();
    let spec = result.ranked_results.iter().find(|r| r.product.id == "spec").unwrap();
    assert!(feat.breakdown.features > 0.0);
    assert_eq!(feat.breakdown.specifications, 0.0);
    assert!(spec.breakdown.specifications > 0.0);
    assert!(feat.score > spec.score);
}
