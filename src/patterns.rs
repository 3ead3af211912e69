// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Regular-expression search and audio feature detection over a catalog.
//!
//! Unlike the index, nothing here is normalized: patterns run over the raw
//! product text, case-insensitively, and match offsets are byte offsets into
//! the field they were found in.
//!
//! # Feature patterns
//!
//! | Kind        | Matches                                   |
//! |-------------|-------------------------------------------|
//! | `bluetooth` | `bluetooth`, `wireless`                   |
//! | `dolby`     | `dolby`, `atmos`, `surround`              |
//! | `power`     | `300W`, `120 watts`                       |
//! | `channels`  | `5.1ch`, `2.1 channel`, `7 channels`      |

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};
use std::time::Instant;

use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::debug;

use crate::error::PatternError;
use crate::types::{Product, ProductField};

/// Compiled size cap for caller-supplied patterns.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// An audio feature recognized in product text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Bluetooth,
    Dolby,
    Power,
    Channels,
}

static FEATURE_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        r"(?i)bluetooth|wireless",
        r"(?i)dolby|atmos|surround",
        r"(?i)\b(\d+)\s*w(?:atts)?\b",
        r"(?i)\b(\d+(?:\.\d+)?)[\s-]*ch(?:annel)?s?\b",
    ]
    .map(|pattern| Regex::new(pattern).expect("feature patterns are valid"))
});

impl FeatureKind {
    pub const ALL: [FeatureKind; 4] = [
        FeatureKind::Bluetooth,
        FeatureKind::Dolby,
        FeatureKind::Power,
        FeatureKind::Channels,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureKind::Bluetooth => "bluetooth",
            FeatureKind::Dolby => "dolby",
            FeatureKind::Power => "power",
            FeatureKind::Channels => "channels",
        }
    }

    fn regex(self) -> &'static Regex {
        &FEATURE_PATTERNS[self as usize]
    }
}

/// One feature occurrence inside one product field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    pub feature: FeatureKind,
    pub field: ProductField,
    pub matched: String,
    /// Byte offsets into the field text
    pub start: usize,
    pub end: usize,
}

/// Headline numbers pulled out of a product's text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductMetrics {
    /// e.g. `"300W"`
    pub power: Option<String>,
    /// e.g. `"5.1 channels"`
    pub channels: Option<String>,
}

/// Compile a caller-supplied pattern, case-insensitively.
pub fn compile_pattern(pattern: &str) -> Result<Regex, PatternError> {
    if pattern.trim().is_empty() {
        return Err(PatternError::Empty);
    }
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|source| PatternError::Invalid {
            pattern: pattern.to_string(),
            source,
        })
}

/// Text a caller pattern is tried against: name, description, features,
/// then each specification key and value.
fn pattern_texts(product: &Product) -> impl Iterator<Item = &str> + '_ {
    let specifications = product
        .specifications
        .iter()
        .flat_map(|(key, value)| [key.as_str(), value.as_str()]);

    product
        .name
        .as_deref()
        .into_iter()
        .chain(product.description.as_deref())
        .chain(product.features.iter().map(String::as_str))
        .chain(specifications)
}

/// Fields scanned for feature occurrences.
fn feature_fields(product: &Product) -> impl Iterator<Item = (ProductField, &str)> + '_ {
    product
        .name
        .as_deref()
        .map(|t| (ProductField::Name, t))
        .into_iter()
        .chain(
            product
                .description
                .as_deref()
                .map(|t| (ProductField::Description, t)),
        )
        .chain(
            product
                .features
                .iter()
                .map(|t| (ProductField::Feature, t.as_str())),
        )
}

/// Products with any text matching `pattern`, in catalog order.
pub fn find_products_matching(
    products: &[Arc<Product>],
    pattern: &str,
) -> Result<Vec<Arc<Product>>, PatternError> {
    let started = Instant::now();
    let regex = compile_pattern(pattern)?;

    let matching: Vec<Arc<Product>> = products
        .par_iter()
        .filter(|product| pattern_texts(product).any(|text| regex.is_match(text)))
        .cloned()
        .collect();

    debug!(
        target: "shelfsearch::patterns",
        pattern,
        matches = matching.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "pattern search completed"
    );
    Ok(matching)
}

/// Does the product's description or any of its features mention `kind`?
pub fn has_feature(product: &Product, kind: FeatureKind) -> bool {
    let regex = kind.regex();
    product.features.iter().any(|feature| regex.is_match(feature))
        || regex.is_match(product.description())
}

/// Bucket products by the features their description or feature list
/// mentions. A product can land in several buckets; empty buckets are left
/// out.
pub fn categorize_by_features(
    products: &[Arc<Product>],
) -> BTreeMap<FeatureKind, Vec<Arc<Product>>> {
    FeatureKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let matching: Vec<Arc<Product>> = products
                .par_iter()
                .filter(|product| has_feature(product, kind))
                .cloned()
                .collect();
            (!matching.is_empty()).then_some((kind, matching))
        })
        .collect()
}

/// Every feature occurrence in a product's name, description and features.
///
/// Grouped by feature kind, then field order, then position.
pub fn find_patterns(product: &Product) -> Vec<PatternMatch> {
    let mut matches = Vec::new();
    for kind in FeatureKind::ALL {
        for (field, text) in feature_fields(product) {
            matches.extend(kind.regex().find_iter(text).map(|m| PatternMatch {
                feature: kind,
                field,
                matched: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
            }));
        }
    }
    matches
}

/// First power rating and channel layout found in the features, the
/// description, then the specification values.
pub fn extract_metrics(product: &Product) -> ProductMetrics {
    let texts = product
        .features
        .iter()
        .map(String::as_str)
        .chain(product.description.as_deref())
        .chain(product.specifications.values().map(String::as_str));

    let mut metrics = ProductMetrics::default();
    for text in texts {
        if metrics.power.is_none() {
            metrics.power = first_group(FeatureKind::Power, text).map(|n| format!("{}W", n));
        }
        if metrics.channels.is_none() {
            metrics.channels =
                first_group(FeatureKind::Channels, text).map(|n| format!("{} channels", n));
        }
        if metrics.power.is_some() && metrics.channels.is_some() {
            break;
        }
    }
    metrics
}

fn first_group(kind: FeatureKind, text: &str) -> Option<&str> {
    kind.regex()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}
