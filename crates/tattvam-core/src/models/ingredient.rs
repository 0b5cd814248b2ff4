// ABOUTME: Ingredient risk classification models
// ABOUTME: Safety levels, AnalyzedIngredient, and the tagger's TaggedIngredients output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Risk level of a single ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Safety {
    /// Matched an unhealthy dictionary keyword
    Unhealthy,
    /// Matched a moderate dictionary keyword
    Moderate,
    /// No dictionary match
    #[default]
    Neutral,
}

impl Safety {
    /// Convert to string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unhealthy => "unhealthy",
            Self::Moderate => "moderate",
            Self::Neutral => "neutral",
        }
    }

    /// Parse from string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unhealthy" => Some(Self::Unhealthy),
            "moderate" => Some(Self::Moderate),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

/// Ingredient name with its risk tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedIngredient {
    /// Ingredient name as supplied (trimmed)
    pub name: String,
    /// Risk tag
    pub safety: Safety,
}

/// Output of the ingredient risk tagger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedIngredients {
    /// One entry per input ingredient, in input order
    pub tagged: Vec<AnalyzedIngredient>,
    /// Unique warnings in first-seen order
    pub warnings: Vec<String>,
}

impl TaggedIngredients {
    /// Names of ingredients tagged unhealthy
    #[must_use]
    pub fn unhealthy_names(&self) -> Vec<String> {
        self.tagged
            .iter()
            .filter(|ingredient| ingredient.safety == Safety::Unhealthy)
            .map(|ingredient| ingredient.name.clone())
            .collect()
    }
}
