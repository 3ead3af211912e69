// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit tests, integration tests and benches.
//!
//! This module is always compiled but hidden from documentation.

#![doc(hidden)]

use std::sync::Arc;

use crate::types::Product;

/// Create a product with just a name and a description.
pub fn make_product(id: &str, name: &str, description: &str) -> Product {
    Product::new(id, name).with_description(description)
}

/// A small audio catalog used throughout the tests.
pub fn make_catalog() -> Vec<Product> {
    vec![
        Product::new("sb-100", "Wireless Soundbar")
            .with_description("Slim wireless soundbar with Dolby Atmos and a compact subwoofer")
            .with_feature("Bluetooth 5.3 streaming")
            .with_feature("HDMI eARC")
            .with_specification("Power Output", "300W")
            .with_specification("Connectivity", "Bluetooth, HDMI, Optical")
            .with_category("Premium Wireless Audio")
            .with_price(399.0),
        Product::new("sb-200", "Compact Soundbar")
            .with_description("Compact soundbar for small rooms")
            .with_feature("Optical input")
            .with_specification("Power Output", "120W")
            .with_category("Standard Audio")
            .with_price(149.0),
        Product::new("sp-300", "Bluetooth Speaker")
            .with_description("Portable bluetooth speaker with deep bass")
            .with_feature("Waterproof housing")
            .with_feature("Twelve hour battery")
            .with_category("Bluetooth Speakers")
            .with_price(89.0),
        Product::new("hp-400", "Wireless Headphones")
            .with_description("Over-ear wireless headphones with noise cancelling")
            .with_feature("Active noise cancelling")
            .with_feature("Bluetooth multipoint")
            .with_specification("Battery Life", "30 hours")
            .with_category("Wireless Headphones")
            .with_price(249.0),
        Product::new("sw-500", "Subwoofer")
            .with_description("Powered subwoofer with deep bass response")
            .with_specification("Driver", "10 inch")
            .with_category("Home Cinema")
            .with_price(299.0),
        Product::new("cb-600", "Optical Cable")
            .with_description("Gold plated optical audio cable")
            .with_category("Accessories")
            .with_price(15.0),
    ]
}

/// [`make_catalog`] as shared pointers, ready for the builders.
pub fn make_shared_catalog() -> Vec<Arc<Product>> {
    make_catalog().into_iter().map(Arc::new).collect()
}

const ADJECTIVES: &[&str] = &[
    "wireless", "compact", "premium", "portable", "smart", "powered", "slim", "rugged",
];
const NOUNS: &[&str] = &[
    "soundbar", "speaker", "headphones", "subwoofer", "amplifier", "receiver", "turntable",
    "earbuds",
];
const FEATURES: &[&str] = &[
    "bluetooth streaming",
    "noise cancelling",
    "dolby atmos",
    "voice control",
    "multiroom audio",
    "waterproof housing",
];
const CATEGORIES: &[&str] = &[
    "Premium Audio",
    "Wireless Audio",
    "Bluetooth Speakers",
    "Home Cinema",
    "Standard Audio",
];

/// Deterministic catalog of `n` products for scale tests and benchmarks.
pub fn make_synthetic_catalog(n: usize) -> Vec<Arc<Product>> {
    (0..n)
        .map(|i| {
            let adjective = ADJECTIVES[i % ADJECTIVES.len()];
            let noun = NOUNS[(i / ADJECTIVES.len()) % NOUNS.len()];
            let feature = FEATURES[i % FEATURES.len()];
            let other = FEATURES[(i + 3) % FEATURES.len()];
            let category = CATEGORIES[i % CATEGORIES.len()];

            Arc::new(
                Product::new(format!("p-{:05}", i), format!("{} {} model{}", adjective, noun, i))
                    .with_description(format!(
                        "A {} {} with {} and {} for every room",
                        adjective, noun, feature, other
                    ))
                    .with_feature(feature)
                    .with_feature(other)
                    .with_specification("Series", format!("series{}", i % 17))
                    .with_category(category)
                    .with_price(50.0 + (i % 40) as f64 * 10.0),
            )
        })
        .collect()
}
