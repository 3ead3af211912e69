//! End-to-end query pipeline.

use std::sync::Arc;
use std::thread;

use shelfsearch::{EngineConfig, Product, SearchEngine, SearchResult};

use crate::common::{catalog_engine, engine_with, make_catalog, make_product};

#[test]
fn test_full_result_shape() {
    let engine = catalog_engine();
    let result = engine.search("bluetooth speakr");

    assert_eq!(result.query, "bluetooth speakr");
    assert!(result.spelling_suggestions.contains(&"speaker".to_string()));
    // Completion works on the last word, and nothing starts with "speakr"
    assert!(result.completions.is_empty());
    assert!(!result.index_matches.is_empty());
    assert_eq!(result.ranked_results.len(), result.index_matches.len());
}

#[test]
fn test_empty_query() {
    let engine = catalog_engine();
    let result = engine.search("");
    assert!(result.is_empty());
    assert!(result.index_matches.is_empty());
    assert!(result.spelling_suggestions.is_empty());
    assert!(result.completions.is_empty());
    assert!(engine.top_searches(10).is_empty());
}

#[test]
fn test_stop_word_query() {
    let engine = catalog_engine();
    let result = engine.search("the and with");
    assert!(result.ranked_results.is_empty());
    // Recorded anyway: the query was made
    assert_eq!(engine.top_searches(1)[0].query, "the and with");
}

#[test]
fn test_empty_catalog() {
    let engine = engine_with(Vec::new());
    assert_eq!(engine.product_count(), 0);
    let result = engine.search("soundbar");
    assert!(result.is_empty());
    assert!(result.spelling_suggestions.is_empty());
    assert!(engine.top_words(10).is_empty());
}

#[test]
fn test_products_with_missing_fields() {
    let json = r#"[
        {"id": "a", "name": "Soundbar", "description": null, "features": []},
        {"id": "b"},
        {"id": "c", "name": null, "category": "Soundbar Accessories"}
    ]"#;
    let products: Vec<Product> = serde_json::from_str(json).unwrap();
    let engine = engine_with(products);
    assert_eq!(engine.product_count(), 3);

    let result = engine.search("soundbar");
    let ids: Vec<&str> = result
        .ranked_results
        .iter()
        .map(|r| r.product.id.as_str())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"a") && ids.contains(&"c"));
}

#[test]
fn test_result_serializes_camel_case() {
    let engine = catalog_engine();
    let result: SearchResult = engine.search("soundbar");
    let json = serde_json::to_value(&result).unwrap();
    assert!(json.get("rankedResults").is_some());
    assert!(json.get("spellingSuggestions").is_some());
    assert!(json.get("searchTimeMillis").is_some());
}

#[test]
fn test_readers_see_whole_snapshots_during_rebuild() {
    let engine = Arc::new(engine_with(make_catalog()));
    let catalog_size = make_catalog().len();

    let reader = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for _ in 0..200 {
                let snapshot = engine.snapshot();
                let n = snapshot.products().len();
                // Every structure in a snapshot agrees on its catalog
                assert_eq!(snapshot.index().total_documents(), n);
                assert_eq!(snapshot.frequencies().product_count(), n);
                assert!(n == catalog_size || n == 1);
            }
        })
    };

    for i in 0..20 {
        if i % 2 == 0 {
            engine.rebuild(vec![make_product("t1", "Turntable", "")]);
        } else {
            engine.rebuild(make_catalog());
        }
    }
    reader.join().unwrap();
}

#[test]
fn test_invalid_json_config_rejected() {
    assert!(EngineConfig::from_json(r#"{"spelling": {"max_suggestions": 0}}"#).is_err());
    let config = EngineConfig::from_json(r#"{"completion": {"max_suggestions": 3}}"#).unwrap();
    let engine = SearchEngine::new(config).unwrap();
    engine.initialize(make_catalog());
    assert!(engine.completion_suggestions("s").len() <= 3);
}
