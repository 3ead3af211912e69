//! Inverted index behavior through the public API.

use std::sync::Arc;

use shelfsearch::{calculate_idf, FieldWeights, InvertedIndex, Normalizer, Product};

use crate::common::{make_catalog, make_product};

fn build(products: Vec<Product>) -> InvertedIndex {
    let products: Vec<Arc<Product>> = products.into_iter().map(Arc::new).collect();
    InvertedIndex::build(&products, &Normalizer::default(), FieldWeights::default())
}

#[test]
fn test_doc_freq_moves_once_per_product() {
    let before = build(vec![make_product("p1", "Speaker", "")]);
    assert_eq!(before.doc_freq("bluetooth"), 0);

    let after = build(vec![
        make_product("p1", "Speaker", ""),
        make_product("p2", "Speaker", "bluetooth bluetooth bluetooth"),
    ]);
    assert_eq!(after.doc_freq("bluetooth"), 1);
    assert_eq!(after.entry("bluetooth").unwrap().postings["p2"].term_frequency, 3);
}

#[test]
fn test_idf_ordering() {
    assert!(calculate_idf(100, 1) > calculate_idf(100, 50));

    let index = build(vec![
        make_product("p1", "Soundbar", "rare"),
        make_product("p2", "Soundbar", ""),
        make_product("p3", "Soundbar", ""),
    ]);
    assert!(index.idf("rare") > index.idf("soundbar"));
    assert_eq!(index.idf("missing"), 0.0);
}

#[test]
fn test_specification_keys_not_indexed() {
    let index = build(vec![
        Product::new("p1", "Soundbar").with_specification("Connectivity", "Optical")
    ]);
    assert!(index.entry("optical").is_some());
    assert!(index.entry("connectivity").is_none());
}

#[test]
fn test_missing_fields_are_empty_text() {
    let product = Product {
        id: "bare".to_string(),
        ..Product::default()
    };
    let index = build(vec![product]);
    assert_eq!(index.total_documents(), 1);
    assert_eq!(index.term_count(), 0);
    assert!(index.product("bare").is_some());
}

#[test]
fn test_repeated_query_terms_scored_once() {
    let index = build(make_catalog());
    let once = index.search("soundbar");
    let twice = index.search("soundbar soundbar SOUNDBAR");
    assert_eq!(once.len(), twice.len());
    for (a, b) in once.iter().zip(&twice) {
        assert_eq!(a.product.id, b.product.id);
        assert!((a.score - b.score).abs() < 1e-12);
    }
}

#[test]
fn test_score_formula() {
    let index = build(vec![
        make_product("p1", "Soundbar", "soundbar"),
        make_product("p2", "Speaker", ""),
    ]);
    let results = index.search("soundbar");
    assert_eq!(results.len(), 1);
    // tf 2, weight 2.0 + 1.0, idf ln(1 + 2/1)
    let expected = 2.0 * 3.0_f64.ln() * 3.0;
    assert!((results[0].score - expected).abs() < 1e-9);
}

#[test]
fn test_ties_break_by_product_id() {
    let index = build(vec![
        make_product("b", "Soundbar", ""),
        make_product("a", "Soundbar", ""),
        make_product("c", "Speaker", ""),
    ]);
    let results = index.search("soundbar");
    let ids: Vec<&str> = results.iter().map(|m| m.product.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}
