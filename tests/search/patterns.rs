//! Pattern search and feature buckets through the engine.

use shelfsearch::{FeatureKind, PatternError, ProductField};

use crate::common::{catalog_engine, make_product};

fn ids(products: &[std::sync::Arc<shelfsearch::Product>]) -> Vec<&str> {
    products.iter().map(|p| p.id.as_str()).collect()
}

#[test]
fn test_pattern_search_over_catalog() {
    let engine = catalog_engine();
    let found = engine.find_products_matching(r"\d+\s*hours?").unwrap();
    assert_eq!(ids(&found), vec!["hp-400"]);

    let found = engine.find_products_matching("optical").unwrap();
    assert_eq!(ids(&found), vec!["sb-100", "sb-200", "cb-600"]);
}

#[test]
fn test_bad_pattern_is_an_error() {
    let engine = catalog_engine();
    assert!(matches!(
        engine.find_products_matching("[a-"),
        Err(PatternError::Invalid { .. })
    ));
    assert_eq!(engine.find_products_matching(""), Err(PatternError::Empty));
}

#[test]
fn test_feature_buckets_follow_rebuild() {
    let engine = catalog_engine();
    let buckets = engine.categorize_by_features();
    assert_eq!(ids(&buckets[&FeatureKind::Dolby]), vec!["sb-100"]);
    assert!(!buckets.contains_key(&FeatureKind::Channels));

    engine.rebuild(vec![make_product("av-1", "Receiver", "7.1 channel surround receiver")]);
    let buckets = engine.categorize_by_features();
    assert_eq!(ids(&buckets[&FeatureKind::Channels]), vec!["av-1"]);
    assert_eq!(ids(&buckets[&FeatureKind::Dolby]), vec!["av-1"]);
    assert!(!buckets.contains_key(&FeatureKind::Bluetooth));
}

#[test]
fn test_patterns_and_metrics_by_id() {
    let engine = catalog_engine();
    let matches = engine.find_patterns("sp-300").unwrap();
    assert!(matches
        .iter()
        .any(|m| m.feature == FeatureKind::Bluetooth && m.field == ProductField::Name));

    let metrics = engine.product_metrics("sb-200").unwrap();
    assert_eq!(metrics.power.as_deref(), Some("120W"));

    assert!(engine.find_patterns("missing").is_none());
    assert!(engine.product_metrics("missing").is_none());
}
