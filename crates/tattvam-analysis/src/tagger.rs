// ABOUTME: Ingredient risk tagger classifying each ingredient as unhealthy, moderate, or neutral
// ABOUTME: Pure function over a dictionary and an ingredient list with deduplicated warnings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::Value;

use crate::constants::labels::INVALID_INGREDIENT;
use crate::dictionary::IngredientDictionary;
use crate::models::{push_unique, AnalyzedIngredient, Safety, TaggedIngredients};

/// Tag a list of ingredient names
///
/// Each name is lower-cased and matched against the dictionary in order; the
/// first keyword found as a substring decides the safety level and warning.
/// Blank entries become the `"Invalid Ingredient Data"` placeholder.
#[must_use]
pub fn tag_ingredients<S: AsRef<str>>(
    dictionary: &IngredientDictionary,
    ingredients: &[S],
) -> TaggedIngredients {
    let mut result = TaggedIngredients::default();
    for ingredient in ingredients {
        tag_one(dictionary, Some(ingredient.as_ref()), &mut result);
    }
    result
}

/// Tag an untyped JSON ingredient payload
///
/// Accepts an array whose entries are strings or objects with a string `name`.
/// Any other entry becomes the placeholder; a non-array value yields an empty
/// result with no warnings.
#[must_use]
pub fn tag_ingredient_values(dictionary: &IngredientDictionary, value: &Value) -> TaggedIngredients {
    let mut result = TaggedIngredients::default();
    let Some(entries) = value.as_array() else {
        return result;
    };

    for entry in entries {
        let name = match entry {
            Value::String(name) => Some(name.as_str()),
            Value::Object(fields) => fields.get("name").and_then(Value::as_str),
            _ => None,
        };
        tag_one(dictionary, name, &mut result);
    }
    result
}

fn tag_one(dictionary: &IngredientDictionary, raw: Option<&str>, result: &mut TaggedIngredients) {
    let Some(name) = raw.map(str::trim).filter(|name| !name.is_empty()) else {
        result.tagged.push(AnalyzedIngredient {
            name: INVALID_INGREDIENT.to_owned(),
            safety: Safety::Neutral,
        });
        return;
    };

    let safety = match dictionary.lookup(&name.to_lowercase()) {
        Some(entry) => {
            if !entry.warning.is_empty() {
                push_unique(&mut result.warnings, &entry.warning);
            }
            entry.safety
        }
        None => Safety::Neutral,
    };

    result.tagged.push(AnalyzedIngredient {
        name: name.to_owned(),
        safety,
    });
}
