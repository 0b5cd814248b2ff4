// ABOUTME: Core data models for the Tattvam nutrition scanning core
// ABOUTME: Re-exports ProductRecord, ProductView, grade, ingredient, and scan structures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! One canonical schema, [`ProductRecord`], is produced by every source adapter
//! and by user submissions. Ingredient tags, grades, and warnings are derived
//! from it on every read and presented through [`ProductView`], so a dictionary
//! change alters displayed output without migrating stored records.
//!
//! ## Core Models
//!
//! - `ProductRecord`: stored product, one per barcode
//! - `NutrientValues`: per-100g nutrients, lenient about nulls and strings
//! - `NutriScore` / `Grade` / `GradeResult`: letter grade, rating, warnings
//! - `AnalyzedIngredient` / `Safety`: ingredient risk tags
//! - `ScanRecord`: scan history entry with analytics summaries

mod grade;
mod ingredient;
mod product;
mod scan;

pub use grade::{Grade, GradeOrigin, GradeResult, NutriScore};
pub use ingredient::{AnalyzedIngredient, Safety, TaggedIngredients};
pub use product::{
    NewProduct, NutrientValues, ProductEdits, ProductRecord, ProductStatus, ProductView,
};
pub use scan::{Achievement, DailyScanCount, RatingSummary, ScanRecord, WeeklyTrend};

/// Append `item` to `items` unless an equal entry is already present
///
/// Keeps first-seen order, which is the order warnings are shown in.
pub fn push_unique(items: &mut Vec<String>, item: &str) {
    if !items.iter().any(|existing| existing == item) {
        items.push(item.to_owned());
    }
}
