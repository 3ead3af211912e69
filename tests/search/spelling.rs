//! Spelling suggestions through the engine.

use shelfsearch::{EngineConfig, SearchEngine, SpellingConfig};

use crate::common::{catalog_engine, make_catalog};

#[test]
fn test_typo_suggests_catalog_word() {
    let engine = catalog_engine();
    assert_eq!(
        engine.spelling_suggestions("soundbarr").first().map(String::as_str),
        Some("soundbar")
    );
    assert!(engine
        .spelling_suggestions("Headphnes")
        .contains(&"headphones".to_string()));
}

#[test]
fn test_valid_word_is_checked_valid() {
    let engine = catalog_engine();
    let snapshot = engine.snapshot();
    assert!(snapshot.spell_checker().is_word_valid("soundbar"));
    assert!(snapshot.spell_checker().is_word_valid("SOUNDBAR"));
    let check = snapshot.spell_checker().check("soundbar");
    assert!(check.valid);
    assert!(check.suggestions.is_empty());
}

#[test]
fn test_empty_and_unknown_input() {
    let engine = catalog_engine();
    assert!(engine.spelling_suggestions("").is_empty());
    assert!(engine.spelling_suggestions("qqqqqqqqqqqq").is_empty());
}

#[test]
fn test_suggestion_limit_configurable() {
    let config = EngineConfig::default().with_spelling(SpellingConfig {
        max_suggestions: 1,
        ..SpellingConfig::default()
    });
    let engine = SearchEngine::new(config).unwrap();
    engine.initialize(make_catalog());
    assert_eq!(engine.spelling_suggestions("soundbr"), vec!["soundbar".to_string()]);
}

#[test]
fn test_wider_window_finds_longer_words() {
    // "sound" is three edits from "soundbar": outside the default window
    let engine = catalog_engine();
    assert!(!engine.spelling_suggestions("sound").contains(&"soundbar".to_string()));
    assert!(engine.spelling_suggestions("soundba").contains(&"soundbar".to_string()));

    let config = EngineConfig::default().with_spelling(SpellingConfig {
        max_edit_distance: 3,
        length_window: 3,
        max_suggestions: 100,
    });
    let engine = SearchEngine::new(config).unwrap();
    engine.initialize(make_catalog());
    assert!(engine.spelling_suggestions("sound").contains(&"soundbar".to_string()));
}

#[test]
fn test_search_misspelling_counted_in_stats() {
    let engine = catalog_engine();
    let result = engine.search("wireles headphones");
    assert!(result.spelling_suggestions.contains(&"wireless".to_string()));

    let stats = engine.spell_stats();
    assert_eq!(stats.words_checked, 2);
    assert_eq!(stats.misspelled_words, 1);
    assert!(stats.average_check_micros() >= 0.0);
}
