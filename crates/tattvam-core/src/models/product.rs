// ABOUTME: Canonical product record, nutrient values, review status, and the frontend view
// ABOUTME: ProductRecord, NutrientValues, ProductStatus, NewProduct, and ProductView definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use super::grade::{deserialize_optional_grade, serialize_optional_grade};
use super::{AnalyzedIngredient, GradeOrigin, NutriScore};
use crate::constants::labels::{DEFAULT_CATEGORY, UNKNOWN_BRAND};

// ============================================================================
// Nutrient Values
// ============================================================================

/// Nutrients per 100 g (or 100 ml)
///
/// Absent fields, `null`, and non-numeric strings deserialize as `0.0`, so a
/// sparse source payload never fails to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientValues {
    /// Energy in kcal
    #[serde(default, deserialize_with = "lenient_f64")]
    pub calories: f64,
    /// Protein in g
    #[serde(default, deserialize_with = "lenient_f64")]
    pub protein: f64,
    /// Carbohydrates in g
    #[serde(default, deserialize_with = "lenient_f64")]
    pub carbs: f64,
    /// Fat in g
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fat: f64,
    /// Sugar in g
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sugar: f64,
    /// Sodium in mg
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sodium: f64,
}

impl NutrientValues {
    /// Copy with every non-finite value replaced by `0.0`
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let clean = |value: f64| if value.is_finite() { value } else { 0.0 };
        Self {
            calories: clean(self.calories),
            protein: clean(self.protein),
            carbs: clean(self.carbs),
            fat: clean(self.fat),
            sugar: clean(self.sugar),
            sodium: clean(self.sodium),
        }
    }

    /// True when no nutrient carries a value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let clean = self.sanitized();
        [
            clean.calories,
            clean.protein,
            clean.carbs,
            clean.fat,
            clean.sugar,
            clean.sodium,
        ]
        .iter()
        .all(|value| *value == 0.0)
    }
}

/// Accept numbers, numeric strings, and `null`; everything else becomes `0.0`
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Number(value)) => value,
        Some(Lenient::Text(text)) => text.trim().parse().unwrap_or(0.0),
        Some(Lenient::Other(_)) | None => 0.0,
    })
}

// ============================================================================
// Review Status
// ============================================================================

/// Review status of a stored product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Visible in search, trending, and alternatives
    #[default]
    Approved,
    /// User submission awaiting review
    Pending,
    /// Rejected by a reviewer
    Rejected,
}

impl ProductStatus {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pending" => Self::Pending,
            "rejected" => Self::Rejected,
            _ => Self::Approved,
        }
    }
}

// ============================================================================
// Product Record
// ============================================================================

fn default_category() -> String {
    DEFAULT_CATEGORY.to_owned()
}

/// Canonical product record, one per barcode
///
/// Built once by a source adapter or a user submission and persisted as is.
/// Ingredient tags and the derived grade are never stored here; they are
/// recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Unique product barcode
    pub barcode: String,
    /// Product name
    pub name: String,
    /// Brand name
    pub brand: String,
    /// Product image URL, empty when unknown
    #[serde(default)]
    pub image_url: String,
    /// Product category
    #[serde(default = "default_category")]
    pub category: String,
    /// Raw ingredient list in label order
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Nutrients per 100 g
    #[serde(default)]
    pub nutrition: NutrientValues,
    /// Grade reported by a source or persisted by an earlier resolution
    #[serde(
        default,
        serialize_with = "serialize_optional_grade",
        deserialize_with = "deserialize_optional_grade"
    )]
    pub nutri_score: Option<NutriScore>,
    /// Warnings attached by the source adapter
    #[serde(default)]
    pub source_warnings: Vec<String>,
    /// Review status
    #[serde(default)]
    pub status: ProductStatus,
    /// Caller id for user submissions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl ProductRecord {
    /// Create an approved record with no ingredients, nutrition, or grade
    #[must_use]
    pub fn new(
        barcode: impl Into<String>,
        name: impl Into<String>,
        brand: impl Into<String>,
    ) -> Self {
        Self {
            barcode: barcode.into(),
            name: name.into(),
            brand: brand.into(),
            image_url: String::new(),
            category: default_category(),
            ingredients: Vec::new(),
            nutrition: NutrientValues::default(),
            nutri_score: None,
            source_warnings: Vec::new(),
            status: ProductStatus::Approved,
            submitted_by: None,
            updated_at: Utc::now(),
        }
    }

    /// Set the ingredient list
    #[must_use]
    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    /// Set the nutrient values
    #[must_use]
    pub const fn with_nutrition(mut self, nutrition: NutrientValues) -> Self {
        self.nutrition = nutrition;
        self
    }

    /// Set the grade
    #[must_use]
    pub const fn with_nutri_score(mut self, nutri_score: Option<NutriScore>) -> Self {
        self.nutri_score = nutri_score;
        self
    }

    /// Set the image URL
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Set the category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the review status
    #[must_use]
    pub const fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = status;
        self
    }

    /// A source result is usable only with a non-empty name and barcode
    #[must_use]
    pub fn has_identity(&self) -> bool {
        !self.name.trim().is_empty() && !self.barcode.trim().is_empty()
    }

    /// True when an image URL is present
    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.image_url.trim().is_empty()
    }

    /// Whether smart-fill should look for a missing image or nutrition
    #[must_use]
    pub fn needs_smart_fill(&self) -> bool {
        !self.has_image() || self.nutrition.is_empty()
    }

    /// Split a comma separated ingredient label into trimmed, non-empty entries
    #[must_use]
    pub fn split_ingredient_text(text: &str) -> Vec<String> {
        text.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

// ============================================================================
// Submissions
// ============================================================================

/// User submitted product awaiting review
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    /// Product barcode (required)
    pub barcode: String,
    /// Product name (required)
    pub name: String,
    /// Brand name, `"Unknown"` when omitted
    #[serde(default)]
    pub brand: Option<String>,
    /// Ingredient list
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Nutrients per 100 g
    #[serde(default)]
    pub nutrition: NutrientValues,
    /// Category, `"General"` when omitted
    #[serde(default)]
    pub category: Option<String>,
    /// Image URL
    #[serde(default)]
    pub image_url: Option<String>,
    /// Caller id supplied by the auth collaborator
    #[serde(default)]
    pub submitted_by: Option<String>,
}

impl NewProduct {
    /// Convert into a pending product record
    #[must_use]
    pub fn into_pending_record(self) -> ProductRecord {
        let brand = self
            .brand
            .filter(|brand| !brand.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_BRAND.to_owned());
        let mut record = ProductRecord::new(self.barcode.trim(), self.name.trim(), brand)
            .with_ingredients(self.ingredients)
            .with_nutrition(self.nutrition)
            .with_status(ProductStatus::Pending);
        if let Some(category) = self.category.filter(|c| !c.trim().is_empty()) {
            record.category = category;
        }
        if let Some(image_url) = self.image_url {
            record.image_url = image_url;
        }
        record.submitted_by = self.submitted_by;
        record
    }
}

/// Reviewer corrections applied when a product is approved
///
/// Absent fields, blank strings, and empty ingredient lists leave the stored
/// value as it is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEdits {
    /// Corrected name
    #[serde(default)]
    pub name: Option<String>,
    /// Corrected brand
    #[serde(default)]
    pub brand: Option<String>,
    /// Corrected image URL
    #[serde(default)]
    pub image_url: Option<String>,
    /// Corrected category
    #[serde(default)]
    pub category: Option<String>,
    /// Corrected ingredient list
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    /// Corrected nutrients per 100 g
    #[serde(default)]
    pub nutrition: Option<NutrientValues>,
}

impl ProductEdits {
    /// True when no field would change a record
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let blank = |field: &Option<String>| field.as_deref().is_none_or(|v| v.trim().is_empty());
        blank(&self.name)
            && blank(&self.brand)
            && blank(&self.image_url)
            && blank(&self.category)
            && self.ingredients.as_ref().is_none_or(Vec::is_empty)
            && self.nutrition.is_none()
    }

    /// Overwrite the fields of `record` this edit carries
    pub fn apply_to(self, record: &mut ProductRecord) {
        let present = |field: Option<String>| {
            field
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        if let Some(name) = present(self.name) {
            record.name = name;
        }
        if let Some(brand) = present(self.brand) {
            record.brand = brand;
        }
        if let Some(image_url) = present(self.image_url) {
            record.image_url = image_url;
        }
        if let Some(category) = present(self.category) {
            record.category = category;
        }
        if let Some(ingredients) = self.ingredients.filter(|list| !list.is_empty()) {
            record.ingredients = ingredients;
        }
        if let Some(nutrition) = self.nutrition {
            record.nutrition = nutrition;
        }
    }
}

// ============================================================================
// Frontend View
// ============================================================================

/// Frontend-facing product JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    /// Product barcode
    pub barcode: String,
    /// Product name
    pub name: String,
    /// Brand name
    pub brand: String,
    /// Product image URL
    pub image_url: String,
    /// Product category
    pub category: String,
    /// Tagged ingredients in label order
    pub ingredients: Vec<AnalyzedIngredient>,
    /// Names of ingredients tagged unhealthy
    pub bad_ingredients: Vec<String>,
    /// Nutrients per 100 g
    pub nutrition: NutrientValues,
    /// Letter grade
    pub nutri_score: NutriScore,
    /// Star rating
    pub rating: f64,
    /// Ingredient, nutrient, and source warnings
    pub warnings: Vec<String>,
    /// Review status
    pub status: ProductStatus,
    /// Where the grade came from
    pub grade_origin: GradeOrigin,
}
