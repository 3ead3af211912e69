// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Configuration and pattern errors.
//!
//! Building and querying never fail: bad product data degrades to empty
//! text and unknown terms score zero. What a caller can get wrong is the
//! configuration, rejected up front, and a raw regular expression handed to
//! pattern search.

/// Rejected configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Update or removal of a category boost that was never configured
    #[error("unknown category boost keyword: {0:?}")]
    UnknownCategoryBoost(String),

    /// Category keyword that normalizes to nothing
    #[error("category boost keyword {0:?} is empty after normalization")]
    EmptyCategoryKeyword(String),

    /// Boost multipliers must be finite and strictly positive
    #[error("invalid boost multiplier {value} for category {keyword:?}")]
    InvalidBoost { keyword: String, value: f64 },

    /// Weights and factors must be finite and non-negative
    #[error("invalid value {value} for {name}")]
    InvalidWeight { name: &'static str, value: f64 },

    /// Search bounds past what the spell checker accepts
    #[error("{name} is {value}, at most {max} is allowed")]
    OutOfRange {
        name: &'static str,
        value: usize,
        max: usize,
    },

    /// A result limit of zero would silently disable a component
    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),

    /// Malformed JSON configuration
    #[error("invalid configuration JSON: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Rejected pattern-search expression.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("invalid pattern {pattern:?}: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
