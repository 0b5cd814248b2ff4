// ABOUTME: Nutrition grade calculator using penalty points for food and sugar bands for beverages
// ABOUTME: Computes the letter grade, the star rating, and nutrient threshold warnings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Nutrition Grade Calculator
//!
//! Two branches decide the letter grade:
//!
//! - **Beverage**: energy below 80 kcal and a first ingredient containing
//!   "water". Graded on sugar alone.
//! - **Solid food**: penalty points for energy, sugar, fat, and sodium. There
//!   are no positive offsets; protein or fiber never improve the grade.
//!
//! The star rating is a fixed lookup on the letter. Non-finite nutrient values
//! are treated as zero, so every input produces one of the five letters.

use crate::constants::{beverage, food, nutrient_warnings as limits};
use crate::models::{Grade, NutriScore, NutrientValues};

/// Whether the beverage branch applies
#[must_use]
pub fn is_beverage<S: AsRef<str>>(nutrition: &NutrientValues, ingredients: &[S]) -> bool {
    let calories = nutrition.sanitized().calories;
    calories < beverage::MAX_CALORIES
        && ingredients.first().is_some_and(|first| {
            first
                .as_ref()
                .to_lowercase()
                .contains(beverage::WATER_KEYWORD)
        })
}

/// Letter grade and rating for the given nutrients
#[must_use]
pub fn compute_grade(nutrition: &NutrientValues, is_beverage: bool) -> Grade {
    let nutrition = nutrition.sanitized();
    let letter = if is_beverage {
        beverage_grade(nutrition.sugar)
    } else {
        grade_from_points(food_penalty_points(&nutrition))
    };
    Grade::from(letter)
}

/// Beverage grade from sugar per 100 ml
#[must_use]
pub fn beverage_grade(sugar: f64) -> NutriScore {
    if sugar > beverage::SUGAR_E {
        NutriScore::E
    } else if sugar > beverage::SUGAR_D {
        NutriScore::D
    } else if sugar > beverage::SUGAR_C {
        NutriScore::C
    } else if sugar > beverage::SUGAR_B {
        NutriScore::B
    } else {
        NutriScore::A
    }
}

/// Penalty points for a solid food
#[must_use]
pub fn food_penalty_points(nutrition: &NutrientValues) -> u32 {
    let tier = |value: f64, high: f64, high_points: u32, medium: f64, medium_points: u32| {
        if value > high {
            high_points
        } else if value > medium {
            medium_points
        } else {
            0
        }
    };

    tier(
        nutrition.calories,
        food::CALORIES_HIGH,
        food::CALORIES_HIGH_POINTS,
        food::CALORIES_MEDIUM,
        food::CALORIES_MEDIUM_POINTS,
    ) + tier(
        nutrition.sugar,
        food::SUGAR_HIGH,
        food::SUGAR_HIGH_POINTS,
        food::SUGAR_MEDIUM,
        food::SUGAR_MEDIUM_POINTS,
    ) + tier(
        nutrition.fat,
        food::FAT_HIGH,
        food::FAT_HIGH_POINTS,
        food::FAT_MEDIUM,
        food::FAT_MEDIUM_POINTS,
    ) + tier(
        nutrition.sodium,
        food::SODIUM_HIGH,
        food::SODIUM_HIGH_POINTS,
        food::SODIUM_MEDIUM,
        food::SODIUM_MEDIUM_POINTS,
    )
}

/// Map penalty points to a letter
#[must_use]
pub const fn grade_from_points(points: u32) -> NutriScore {
    if points >= food::GRADE_E_POINTS {
        NutriScore::E
    } else if points >= food::GRADE_D_POINTS {
        NutriScore::D
    } else if points >= food::GRADE_C_POINTS {
        NutriScore::C
    } else if points >= food::GRADE_B_POINTS {
        NutriScore::B
    } else {
        NutriScore::A
    }
}

/// Threshold warnings for sugar, fat, and salt
#[must_use]
pub fn nutrient_warnings(nutrition: &NutrientValues) -> Vec<String> {
    let nutrition = nutrition.sanitized();
    let mut warnings = Vec::new();
    if nutrition.sugar > limits::SUGAR_LIMIT {
        warnings.push(limits::HIGH_SUGAR.to_owned());
    }
    if nutrition.fat > limits::FAT_LIMIT {
        warnings.push(limits::HIGH_FAT.to_owned());
    }
    if nutrition.sodium > limits::SODIUM_LIMIT_MG {
        warnings.push(limits::HIGH_SALT.to_owned());
    }
    warnings
}
