// ABOUTME: Ordered keyword dictionary mapping risky ingredients to a safety level and warning
// ABOUTME: Built-in reference table plus YAML loading; first matching keyword wins
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Ingredient Dictionary
//!
//! The dictionary is an ordered list, not a map: lookups scan entries in
//! insertion order and return the first keyword that is a substring of the
//! lower-cased ingredient. Order therefore matters. `refined palm oil` must
//! precede `palm oil`, and `iodised salt` must precede `salt`.
//!
//! The dictionary is immutable once built. Services receive it as an
//! `Arc<IngredientDictionary>`; the built-in table is also available process
//! wide through [`IngredientDictionary::global`].
//!
//! ## YAML format
//!
//! ```yaml
//! - keyword: palm oil
//!   safety: unhealthy
//!   warning: High in saturated fat.
//! - keyword: salt
//!   safety: moderate
//!   warning: High sodium content can be a concern.
//! ```

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::models::Safety;

/// Built-in reference entries, in match order
const BUILTIN_ENTRIES: &[(&str, Safety, &str)] = &[
    ("sugar", Safety::Unhealthy, "High in added sugar."),
    (
        "refined wheat flour (maida)",
        Safety::Unhealthy,
        "Refined grain, lacks fiber and nutrients.",
    ),
    ("refined palm oil", Safety::Unhealthy, "High in saturated fat."),
    ("palm oil", Safety::Unhealthy, "High in saturated fat."),
    ("invert sugar syrup", Safety::Unhealthy, "A form of added sugar."),
    ("high fructose corn syrup", Safety::Unhealthy, "High in added sugar."),
    ("hydrogenated oil", Safety::Unhealthy, "Contains trans fats."),
    (
        "monosodium glutamate",
        Safety::Unhealthy,
        "MSG can cause reactions in sensitive individuals.",
    ),
    (
        "msg",
        Safety::Unhealthy,
        "MSG can cause reactions in sensitive individuals.",
    ),
    (
        "iodised salt",
        Safety::Moderate,
        "High sodium content can be a concern.",
    ),
    ("salt", Safety::Moderate, "High sodium content can be a concern."),
    (
        "caffeine",
        Safety::Moderate,
        "Stimulant, not recommended for children.",
    ),
    (
        "artificial flavouring substances",
        Safety::Moderate,
        "Contains artificial flavors.",
    ),
    (
        "sweeteners (955, 950)",
        Safety::Moderate,
        "Contains artificial sweeteners.",
    ),
];

static GLOBAL_DICTIONARY: OnceLock<IngredientDictionary> = OnceLock::new();

/// One keyword rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Lower-case keyword matched as a substring
    pub keyword: String,
    /// Safety level assigned on match
    pub safety: Safety,
    /// Warning added on match
    pub warning: String,
}

/// Immutable, ordered ingredient dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientDictionary {
    entries: Vec<DictionaryEntry>,
}

impl IngredientDictionary {
    /// The built-in reference table
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_ENTRIES
                .iter()
                .map(|(keyword, safety, warning)| DictionaryEntry {
                    keyword: (*keyword).to_owned(),
                    safety: *safety,
                    warning: (*warning).to_owned(),
                })
                .collect(),
        }
    }

    /// Process-wide built-in dictionary
    pub fn global() -> &'static Self {
        GLOBAL_DICTIONARY.get_or_init(Self::builtin)
    }

    /// Build a dictionary from entries, normalizing keywords to lower case
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `entries` is empty or any keyword is blank.
    pub fn from_entries(entries: Vec<DictionaryEntry>) -> AppResult<Self> {
        if entries.is_empty() {
            return Err(AppError::config_invalid(
                "Ingredient dictionary must contain at least one entry",
            ));
        }

        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let keyword = entry.keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    return Err(AppError::config_invalid(format!(
                        "Ingredient dictionary entry {index} has an empty keyword"
                    )));
                }
                Ok(DictionaryEntry {
                    keyword,
                    safety: entry.safety,
                    warning: entry.warning.trim().to_owned(),
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self { entries })
    }

    /// Parse a YAML list of entries
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the YAML is malformed, empty, or has a blank keyword.
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        let entries: Option<Vec<DictionaryEntry>> = serde_yaml::from_str(yaml).map_err(|e| {
            AppError::config_invalid(format!("Invalid ingredient dictionary YAML: {e}"))
        })?;
        Self::from_entries(entries.unwrap_or_default())
    }

    /// Load a YAML dictionary file
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let yaml = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!(
                "Failed to read ingredient dictionary {}: {e}",
                path.display()
            ))
        })?;
        let dictionary = Self::from_yaml_str(&yaml)?;
        info!(
            path = %path.display(),
            entries = dictionary.len(),
            "Loaded ingredient dictionary"
        );
        Ok(dictionary)
    }

    /// First entry whose keyword is a substring of `lowercase_ingredient`
    #[must_use]
    pub fn lookup(&self, lowercase_ingredient: &str) -> Option<&DictionaryEntry> {
        self.entries
            .iter()
            .find(|entry| lowercase_ingredient.contains(entry.keyword.as_str()))
    }

    /// Entries in match order
    #[must_use]
    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for IngredientDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}
