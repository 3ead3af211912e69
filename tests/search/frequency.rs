//! Word and search statistics through the engine.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::common::{catalog_engine, make_product};

#[test]
fn test_search_recorded_twice() {
    let engine = catalog_engine();
    engine.search("Wireless Soundbar");
    thread::sleep(Duration::from_millis(10));
    engine.search("wireless soundbar");

    let top = engine.top_searches(1);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].query, "wireless soundbar");
    assert_eq!(top[0].count, 2);
    assert!(top[0].last_seen > top[0].first_seen);
}

#[test]
fn test_top_words_limit() {
    let engine = catalog_engine();
    assert!(engine.top_words(0).is_empty());
    let top = engine.top_words(3);
    assert_eq!(top.len(), 3);
    assert!(top[0].count >= top[1].count && top[1].count >= top[2].count);
    assert!(engine.top_searches(0).is_empty());
}

#[test]
fn test_word_frequency_per_product() {
    let engine = catalog_engine();
    // name, description and category of sb-100
    assert_eq!(engine.word_frequency("wireless", "sb-100"), 3);
    assert_eq!(engine.word_frequency("wireless", "cb-600"), 0);
    assert_eq!(engine.word_frequency("wireless", "nope"), 0);
}

#[test]
fn test_catalog_counters_rebuilt_fresh() {
    let engine = catalog_engine();
    engine.rebuild(vec![make_product("p1", "Soundbar", "")]);
    assert_eq!(engine.word_frequency("soundbar", "p1"), 1);
    assert_eq!(engine.word_frequency("soundbar", "sb-100"), 0);
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.frequencies().global_word_frequency("soundbar"), 1);
}

#[test]
fn test_concurrent_searches_all_counted() {
    let engine = Arc::new(catalog_engine());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..25 {
                    engine.search("bluetooth speaker");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(engine.top_searches(1)[0].count, 200);
}

#[test]
fn test_clear_search_log_keeps_catalog_counters() {
    let engine = catalog_engine();
    engine.search("soundbar");
    engine.search("speaker");
    assert_eq!(engine.top_searches(10).len(), 2);

    engine.clear_search_log();
    assert!(engine.top_searches(10).is_empty());
    assert_eq!(engine.word_frequency("wireless", "sb-100"), 3);

    engine.search("soundbar");
    assert_eq!(engine.top_searches(10)[0].count, 1);
}
