// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and ranking: how search results get their numbers.
//!
//! `core` holds the formulas (IDF variants, smoothed TF, position and
//! frequency boosts, per-section scores). `ranking` applies them to a
//! candidate set and produces the sorted, normalized, explainable list.

mod core;
pub mod ranking;

pub use self::core::*;
pub use ranking::Ranker;
