// ABOUTME: Product health analysis crate: dictionary, tagger, grade calculator, and merger
// ABOUTME: Deterministic scoring core with no I/O beyond optional dictionary file loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Ingredient risk tagging and nutrition grading.
//!
//! Data flows leaf first: the [`dictionary`] feeds the [`tagger`], the
//! [`grade`] calculator scores nutrients, and the [`analyzer`] merges both with
//! any grade a source reported into the frontend-facing `ProductView`.

// Re-export tattvam-core modules so analysis code can use `crate::models::*` etc.
pub use tattvam_core::constants;
pub use tattvam_core::errors;
pub use tattvam_core::models;

/// Merges tagger and calculator output into product views
pub mod analyzer;
/// Ordered keyword dictionary of risky ingredients
pub mod dictionary;
/// Nutrition grade calculator and nutrient threshold warnings
pub mod grade;
/// Ingredient risk tagger
pub mod tagger;

pub use analyzer::{HealthAnalyzer, ProductAnalysis};
pub use dictionary::{DictionaryEntry, IngredientDictionary};
pub use grade::{compute_grade, is_beverage, nutrient_warnings};
pub use tagger::{tag_ingredient_values, tag_ingredients};
