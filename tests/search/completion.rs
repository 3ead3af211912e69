//! Word completion through the engine.

use shelfsearch::{CompletionConfig, EngineConfig, SearchEngine};

use crate::common::{catalog_engine, engine_with, make_product};

#[test]
fn test_prefix_completion() {
    let engine = catalog_engine();
    let words: Vec<String> = engine
        .completion_suggestions("sou")
        .into_iter()
        .map(|s| s.word)
        .collect();
    assert!(words.contains(&"soundbar".to_string()));
    assert!(engine.completion_suggestions("zzz").is_empty());
}

#[test]
fn test_completion_carries_products() {
    let engine = catalog_engine();
    let soundbar = engine
        .completion_suggestions("soundb")
        .into_iter()
        .find(|s| s.word == "soundbar")
        .unwrap();
    assert_eq!(soundbar.product_ids, vec!["sb-100", "sb-200"]);
    assert_eq!(soundbar.exact_product_ids, soundbar.product_ids);
    assert!(soundbar.frequency >= 4);
}

#[test]
fn test_deterministic_tie_order() {
    let engine = engine_with(vec![make_product("p1", "spark spare spade", "")]);
    let first: Vec<String> = engine
        .completion_suggestions("spa")
        .into_iter()
        .map(|s| s.word)
        .collect();
    assert_eq!(first, vec!["spade", "spare", "spark"]);
    for _ in 0..5 {
        let again: Vec<String> = engine
            .completion_suggestions("spa")
            .into_iter()
            .map(|s| s.word)
            .collect();
        assert_eq!(again, first);
    }
}

#[test]
fn test_completion_limit_configurable() {
    let config = EngineConfig::default().with_completion(CompletionConfig {
        max_suggestions: 2,
        ..CompletionConfig::default()
    });
    let engine = SearchEngine::new(config).unwrap();
    engine.initialize(vec![make_product("p1", "spark spare spade", "")]);
    assert_eq!(engine.completion_suggestions("sp").len(), 2);
}

#[test]
fn test_rebuild_replaces_trie() {
    let engine = catalog_engine();
    assert!(!engine.completion_suggestions("sou").is_empty());
    engine.rebuild(vec![make_product("t1", "Turntable", "")]);
    assert!(engine.completion_suggestions("sou").is_empty());
    assert_eq!(engine.completion_suggestions("tur")[0].word, "turntable");
}

#[test]
fn test_frequent_word_beats_many_rare_ones() {
    let rare: Vec<String> = (0..1_500).map(|i| format!("sa{:04}x", i)).collect();
    let mut products = vec![make_product("rare", &rare.join(" "), "")];
    products.extend((0..40).map(|i| make_product(&format!("sp{}", i), "Speaker", "")));
    let engine = engine_with(products);

    let top = engine.completion_suggestions("s");
    assert_eq!(top[0].word, "speaker");
    assert_eq!(top[0].frequency, 40);
    assert_eq!(top[0].product_ids.len(), 40);
}
