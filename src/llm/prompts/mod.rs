// ABOUTME: Prompt templates for AI grade estimation and product questions loaded at compile time
// ABOUTME: Renders the dietitian JSON prompt and the plain-text advisor prompt from product data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompts
//!
//! Templates live in markdown files next to this module and use `{{field}}`
//! placeholders.

use crate::models::{NutrientValues, ProductRecord};

/// Dietitian prompt asking for `{nutriScore, cleanIngredients, badIngredients}`
pub const GRADE_ESTIMATION_PROMPT: &str = include_str!("grade_estimation.md");

/// Advisor prompt for short plain-text answers
pub const PRODUCT_ADVISOR_PROMPT: &str = include_str!("product_advisor.md");

/// Render the grade estimation prompt for a record
#[must_use]
pub fn grade_estimation_prompt(record: &ProductRecord) -> String {
    let ingredients = if record.ingredients.is_empty() {
        "not listed".to_owned()
    } else {
        record.ingredients.join(", ")
    };
    let nutrition = serde_json::to_string(&record.nutrition.sanitized()).unwrap_or_default();

    GRADE_ESTIMATION_PROMPT
        .replace("{{name}}", &record.name)
        .replace("{{ingredients}}", &ingredients)
        .replace("{{nutrition}}", &nutrition)
}

/// Render the advisor prompt for a record, its displayed grade, and a question
#[must_use]
pub fn product_advisor_prompt(record: &ProductRecord, grade: &str, question: &str) -> String {
    let NutrientValues {
        calories,
        fat,
        sugar,
        sodium,
        ..
    } = record.nutrition.sanitized();

    PRODUCT_ADVISOR_PROMPT
        .replace("{{name}}", &record.name)
        .replace("{{brand}}", &record.brand)
        .replace("{{ingredients}}", &record.ingredients.join(", "))
        .replace("{{calories}}", &calories.to_string())
        .replace("{{sugar}}", &sugar.to_string())
        .replace("{{fat}}", &fat.to_string())
        .replace("{{sodium}}", &sodium.to_string())
        .replace("{{grade}}", grade)
        .replace("{{question}}", question.trim())
}
