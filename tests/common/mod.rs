//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::sync::Arc;

use shelfsearch::{EngineConfig, Product, RankedProduct, SearchEngine};

// Re-export canonical test utilities from shelfsearch::testing
pub use shelfsearch::testing::{make_catalog, make_product, make_synthetic_catalog};

/// An engine initialized with the default config and the audio catalog.
pub fn catalog_engine() -> SearchEngine {
    engine_with(make_catalog())
}

/// An engine initialized with the default config and `products`.
pub fn engine_with(products: Vec<Product>) -> SearchEngine {
    let engine = SearchEngine::new(EngineConfig::default()).expect("default config is valid");
    engine.initialize(products);
    engine
}

/// Owned copies of shared products.
pub fn owned(products: &[Arc<Product>]) -> Vec<Product> {
    products.iter().map(|p| Product::clone(p)).collect()
}

/// Product ids of a ranked result, in order.
pub fn ranked_ids(results: &[RankedProduct]) -> Vec<String> {
    results.iter().map(|r| r.product.id.clone()).collect()
}

/// Assert the normalization contract of a ranked result set.
pub fn assert_normalized(results: &[RankedProduct]) {
    if let Some(top) = results.first() {
        assert_eq!(top.normalized_score, 1.0, "top result must normalize to 1.0");
    }
    for r in results {
        assert!(
            (0.0..=1.0).contains(&r.normalized_score),
            "normalized score {} of {} outside [0, 1]",
            r.normalized_score,
            r.product.id
        );
    }
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score, "results not sorted by score");
    }
}
