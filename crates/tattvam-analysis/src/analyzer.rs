// ABOUTME: Health analyzer merging ingredient tags, calculator grade, and source grade
// ABOUTME: Produces ProductAnalysis for scoring and ProductView for the frontend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dictionary::IngredientDictionary;
use crate::grade::{compute_grade, is_beverage, nutrient_warnings};
use crate::models::{
    push_unique, Grade, GradeOrigin, GradeResult, ProductRecord, ProductView, TaggedIngredients,
};
use crate::tagger::tag_ingredients;

/// Tagger and calculator output for one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAnalysis {
    /// Tagged ingredients and ingredient warnings
    pub ingredients: TaggedIngredients,
    /// Calculator grade with the merged warning set
    pub grade: GradeResult,
    /// Whether the beverage branch was used
    pub beverage: bool,
}

/// Runs the tagger and the calculator against a shared dictionary
#[derive(Debug, Clone)]
pub struct HealthAnalyzer {
    dictionary: Arc<IngredientDictionary>,
}

impl HealthAnalyzer {
    /// Create an analyzer over the given dictionary
    #[must_use]
    pub const fn new(dictionary: Arc<IngredientDictionary>) -> Self {
        Self { dictionary }
    }

    /// Create an analyzer over the built-in dictionary
    #[must_use]
    pub fn with_builtin_dictionary() -> Self {
        Self::new(Arc::new(IngredientDictionary::builtin()))
    }

    /// Dictionary in use
    #[must_use]
    pub fn dictionary(&self) -> &IngredientDictionary {
        &self.dictionary
    }

    /// Grade the calculator assigns to this record, ignoring any stored grade
    #[must_use]
    pub fn calculator_grade(&self, record: &ProductRecord) -> Grade {
        compute_grade(
            &record.nutrition,
            is_beverage(&record.nutrition, &record.ingredients),
        )
    }

    /// Tag ingredients, compute the calculator grade, and merge warnings
    #[must_use]
    pub fn analyze(&self, record: &ProductRecord) -> ProductAnalysis {
        let ingredients = tag_ingredients(&self.dictionary, &record.ingredients);
        let beverage = is_beverage(&record.nutrition, &record.ingredients);
        let grade = compute_grade(&record.nutrition, beverage);
        let warnings = merge_warnings(&ingredients, record);

        ProductAnalysis {
            ingredients,
            grade: GradeResult {
                nutri_score: grade.nutri_score,
                rating: grade.rating,
                warnings,
            },
            beverage,
        }
    }

    /// Build the frontend view
    ///
    /// A record carrying a grade keeps it and reports `origin`. A record
    /// without one is graded by the calculator and reports
    /// [`GradeOrigin::Calculator`].
    #[must_use]
    pub fn view(&self, record: &ProductRecord, origin: GradeOrigin) -> ProductView {
        let analysis = self.analyze(record);
        let (grade, origin) = record.nutri_score.map_or_else(
            || {
                (
                    Grade {
                        nutri_score: analysis.grade.nutri_score,
                        rating: analysis.grade.rating,
                    },
                    GradeOrigin::Calculator,
                )
            },
            |letter| (Grade::from(letter), origin),
        );

        ProductView {
            barcode: record.barcode.clone(),
            name: record.name.clone(),
            brand: record.brand.clone(),
            image_url: record.image_url.clone(),
            category: record.category.clone(),
            bad_ingredients: analysis.ingredients.unhealthy_names(),
            ingredients: analysis.ingredients.tagged,
            nutrition: record.nutrition,
            nutri_score: grade.nutri_score,
            rating: grade.rating,
            warnings: analysis.grade.warnings,
            status: record.status,
            grade_origin: origin,
        }
    }

    /// Build views for many records in parallel, preserving input order
    #[must_use]
    pub fn view_all(&self, records: &[ProductRecord], origin: GradeOrigin) -> Vec<ProductView> {
        records
            .par_iter()
            .map(|record| self.view(record, origin))
            .collect()
    }
}

impl Default for HealthAnalyzer {
    fn default() -> Self {
        Self::with_builtin_dictionary()
    }
}

/// Ingredient warnings, then nutrient warnings, then source warnings, deduplicated
fn merge_warnings(ingredients: &TaggedIngredients, record: &ProductRecord) -> Vec<String> {
    let mut warnings = Vec::new();
    let nutrient = nutrient_warnings(&record.nutrition);
    for warning in ingredients
        .warnings
        .iter()
        .chain(nutrient.iter())
        .chain(record.source_warnings.iter())
    {
        push_unique(&mut warnings, warning);
    }
    warnings
}
