//! Parallel builds must produce exactly what sequential builds produce.

use std::sync::Arc;

use shelfsearch::{EngineConfig, EngineSnapshot, SearchLog, SpellStats};

use crate::common::{make_synthetic_catalog, owned};

fn snapshots(n: usize) -> (EngineSnapshot, EngineSnapshot) {
    let products = owned(&make_synthetic_catalog(n));
    let config = EngineConfig::default();
    let parallel = EngineSnapshot::build(
        products.clone(),
        &config,
        Arc::new(SearchLog::new()),
        Arc::new(SpellStats::default()),
    );
    let sequential = EngineSnapshot::build_sequential(
        products,
        &config,
        Arc::new(SearchLog::new()),
        Arc::new(SpellStats::default()),
    );
    (parallel, sequential)
}

#[test]
fn test_parallel_build_equivalence_1000_products() {
    let (parallel, sequential) = snapshots(1_000);

    assert_eq!(parallel.products().len(), 1_000);
    assert_eq!(parallel.index().term_count(), sequential.index().term_count());
    for (term, entry) in sequential.index().terms() {
        assert_eq!(parallel.index().entry(term), Some(entry), "index differs at {:?}", term);
    }

    assert_eq!(
        parallel.spell_checker().words(),
        sequential.spell_checker().words()
    );
    assert_eq!(parallel.completion(), sequential.completion());

    assert_eq!(
        parallel.frequencies().top_words(usize::MAX),
        sequential.frequencies().top_words(usize::MAX)
    );
    for product in sequential.products().iter().take(50) {
        assert_eq!(
            parallel.frequencies().words_for_product(&product.id),
            sequential.frequencies().words_for_product(&product.id)
        );
    }
}

#[test]
fn test_query_results_identical_across_builds() {
    let (parallel, sequential) = snapshots(1_000);
    for query in ["wireless soundbar", "dolby atmos", "subwofer", "noise cancelling", "smart"] {
        let a = parallel.search(query);
        let b = sequential.search(query);
        assert_eq!(a.spelling_suggestions, b.spelling_suggestions);
        assert_eq!(a.completions, b.completions);

        let a_ranked: Vec<(&str, f64)> = a
            .ranked_results
            .iter()
            .map(|r| (r.product.id.as_str(), r.score))
            .collect();
        let b_ranked: Vec<(&str, f64)> = b
            .ranked_results
            .iter()
            .map(|r| (r.product.id.as_str(), r.score))
            .collect();
        assert_eq!(a_ranked, b_ranked, "ranking differs for {:?}", query);
    }
}

#[test]
fn test_repeated_searches_stable() {
    let (parallel, _) = snapshots(200);
    let first: Vec<String> = parallel
        .search("portable speaker")
        .ranked_results
        .iter()
        .map(|r| r.product.id.clone())
        .collect();
    for _ in 0..10 {
        let again: Vec<String> = parallel
            .search("portable speaker")
            .ranked_results
            .iter()
            .map(|r| r.product.id.clone())
            .collect();
        assert_eq!(again, first);
    }
}
