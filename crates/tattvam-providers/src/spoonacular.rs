// ABOUTME: Spoonacular grocery product client resolving products by UPC
// ABOUTME: Maps the Spoonacular product payload and its named nutrient list onto ProductRecord
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::constants::labels::UNKNOWN_BRAND;
use crate::errors::{AppError, AppResult};
use crate::http_client::{read_json_or_none, shared_client};
use crate::models::{NutrientValues, ProductRecord};
use crate::spi::ProductSource;

const SERVICE: &str = "Spoonacular";

/// Spoonacular client configuration
#[derive(Debug, Clone)]
pub struct SpoonacularConfig {
    /// API key
    pub api_key: String,
    /// Base URL (default: <https://api.spoonacular.com>)
    pub base_url: String,
}

impl Default for SpoonacularConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.spoonacular.com".to_owned(),
        }
    }
}

/// Spoonacular grocery product
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroceryProduct {
    /// Product title
    #[serde(default)]
    pub title: Option<String>,
    /// Brand name
    #[serde(default)]
    pub brand: Option<String>,
    /// Primary image
    #[serde(default)]
    pub image: Option<String>,
    /// Additional images
    #[serde(default)]
    pub images: Vec<String>,
    /// Comma separated ingredient label
    #[serde(default, rename = "ingredientList")]
    pub ingredient_list: Option<String>,
    /// Nutrition block
    #[serde(default)]
    pub nutrition: Option<Nutrition>,
}

/// Spoonacular nutrition block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Nutrition {
    /// Named nutrient amounts
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
}

/// One named nutrient
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Nutrient {
    /// Nutrient name, e.g. `Calories`
    #[serde(default)]
    pub name: String,
    /// Amount
    #[serde(default)]
    pub amount: Option<f64>,
}

impl GroceryProduct {
    fn nutrient(&self, name: &str) -> f64 {
        self.nutrition
            .as_ref()
            .and_then(|n| n.nutrients.iter().find(|nutrient| nutrient.name == name))
            .and_then(|nutrient| nutrient.amount)
            .unwrap_or(0.0)
    }

    /// Map onto the canonical record for `barcode`
    #[must_use]
    pub fn into_record(self, barcode: &str) -> ProductRecord {
        let nutrition = NutrientValues {
            calories: self.nutrient("Calories"),
            protein: self.nutrient("Protein"),
            carbs: self.nutrient("Carbohydrates"),
            fat: self.nutrient("Fat"),
            sugar: self.nutrient("Sugar"),
            sodium: self.nutrient("Sodium"),
        };
        let image_url = self
            .image
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.images.into_iter().next())
            .unwrap_or_default();
        let brand = self
            .brand
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_BRAND.to_owned());
        let ingredients = self
            .ingredient_list
            .map(|text| ProductRecord::split_ingredient_text(&text))
            .unwrap_or_default();

        ProductRecord::new(
            barcode.trim(),
            self.title.unwrap_or_default().trim(),
            brand,
        )
        .with_ingredients(ingredients)
        .with_nutrition(nutrition)
        .with_image_url(image_url)
    }
}

/// Spoonacular API client
pub struct SpoonacularClient {
    config: SpoonacularConfig,
    http_client: Client,
}

impl SpoonacularClient {
    /// Create a new client on the shared HTTP connection pool
    #[must_use]
    pub fn new(config: SpoonacularConfig) -> Self {
        Self {
            config,
            http_client: shared_client().clone(),
        }
    }
}

#[async_trait]
impl ProductSource for SpoonacularClient {
    fn name(&self) -> &'static str {
        "spoonacular"
    }

    #[instrument(skip(self), fields(source = "spoonacular"))]
    async fn fetch_by_barcode(&self, barcode: &str) -> AppResult<Option<ProductRecord>> {
        if self.config.api_key.is_empty() {
            return Err(AppError::config("Spoonacular API key is not configured"));
        }

        let url = format!(
            "{}/food/products/upc/{}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(barcode)
        );
        let response = self
            .http_client
            .get(&url)
            .query(&[("apiKey", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(AppError::from)?;

        Ok(read_json_or_none::<GroceryProduct>(SERVICE, response)
            .await?
            .map(|product| product.into_record(barcode)))
    }
}
