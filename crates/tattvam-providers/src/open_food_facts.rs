// ABOUTME: Open Food Facts client, the primary barcode source and the smart-fill text search
// ABOUTME: Maps the v2 product payload onto ProductRecord with source grade and threshold warnings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Open Food Facts API Client
//!
//! Open Food Facts is a free, crowd-sourced database and needs no API key.
//!
//! # API Reference
//! <https://openfoodfacts.github.io/openfoodfacts-server/api/>
//!
//! - Barcode lookup: `GET {base}/api/v2/product/{barcode}.json`
//! - Text search: `GET {base}/cgi/search.pl?search_terms=..&json=1`

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::constants::labels::UNKNOWN_BRAND;
use crate::constants::nutrient_warnings::{
    FAT_LIMIT, HIGH_FAT, HIGH_SALT, HIGH_SUGAR, SALT_LIMIT_G, SUGAR_LIMIT,
};
use crate::errors::{AppError, AppResult};
use crate::http_client::{read_json_or_none, shared_client};
use crate::models::{NutriScore, NutrientValues, ProductRecord};
use crate::spi::{ProductSearch, ProductSource};

const SERVICE: &str = "Open Food Facts";

/// Open Food Facts client configuration
#[derive(Debug, Clone)]
pub struct OpenFoodFactsConfig {
    /// Base URL (default: <https://world.openfoodfacts.org>)
    pub base_url: String,
    /// Results requested from the text search
    pub search_page_size: u32,
}

impl Default for OpenFoodFactsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://world.openfoodfacts.org".to_owned(),
            search_page_size: 1,
        }
    }
}

/// Barcode lookup envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductResponse {
    /// `1` when found, `0` when the barcode is unknown
    #[serde(default)]
    pub status: Option<Value>,
    /// The product, absent when not found
    #[serde(default)]
    pub product: Option<OffProduct>,
}

/// Text search envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Matching products, best first
    #[serde(default)]
    pub products: Vec<OffProduct>,
}

/// The subset of an Open Food Facts product we read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OffProduct {
    /// Barcode as stored by Open Food Facts
    #[serde(default)]
    pub code: Option<String>,
    /// Product name
    #[serde(default)]
    pub product_name: Option<String>,
    /// Comma separated brand list
    #[serde(default)]
    pub brands: Option<String>,
    /// Front image, preferred
    #[serde(default)]
    pub image_url: Option<String>,
    /// Alternate front image
    #[serde(default)]
    pub image_front_url: Option<String>,
    /// Nutri-Score letter, or `unknown` / `not-applicable`
    #[serde(default)]
    pub nutriscore_grade: Option<String>,
    /// Comma separated category list
    #[serde(default)]
    pub categories: Option<String>,
    /// English ingredient label
    #[serde(default)]
    pub ingredients_text_en: Option<String>,
    /// Ingredient label in the product's main language
    #[serde(default)]
    pub ingredients_text: Option<String>,
    /// Nutriment values; numbers are sometimes sent as strings
    #[serde(default)]
    pub nutriments: HashMap<String, Value>,
}

impl OffProduct {
    fn nutriment(&self, key: &str) -> f64 {
        match self.nutriments.get(key) {
            Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
            Some(Value::String(text)) => text.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Nutrients per 100 g; sodium is converted from g to mg
    #[must_use]
    pub fn nutrient_values(&self) -> NutrientValues {
        NutrientValues {
            calories: self.nutriment("energy-kcal_100g"),
            protein: self.nutriment("proteins_100g"),
            carbs: self.nutriment("carbohydrates_100g"),
            fat: self.nutriment("fat_100g"),
            sugar: self.nutriment("sugars_100g"),
            sodium: self.nutriment("sodium_100g") * 1000.0,
        }
    }

    /// Threshold warnings on the raw nutriments (salt in g)
    #[must_use]
    pub fn threshold_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.nutriment("sugars_100g") > SUGAR_LIMIT {
            warnings.push(HIGH_SUGAR.to_owned());
        }
        if self.nutriment("fat_100g") > FAT_LIMIT {
            warnings.push(HIGH_FAT.to_owned());
        }
        if self.nutriment("salt_100g") > SALT_LIMIT_G {
            warnings.push(HIGH_SALT.to_owned());
        }
        warnings
    }

    /// Map onto the canonical record
    ///
    /// `fallback_barcode` fills in for products without a `code`. A missing
    /// name stays empty so the resolver rejects the result.
    #[must_use]
    pub fn into_record(self, fallback_barcode: &str) -> ProductRecord {
        let nutrition = self.nutrient_values();
        let source_warnings = self.threshold_warnings();
        let nutri_score = self.nutriscore_grade.as_deref().and_then(NutriScore::parse);

        let barcode = non_blank(self.code).unwrap_or_else(|| fallback_barcode.to_owned());
        let name = non_blank(self.product_name).unwrap_or_default();
        let brand = non_blank(self.brands).unwrap_or_else(|| UNKNOWN_BRAND.to_owned());
        let image_url = non_blank(self.image_url)
            .or_else(|| non_blank(self.image_front_url))
            .unwrap_or_default();
        let ingredients = non_blank(self.ingredients_text_en)
            .or_else(|| non_blank(self.ingredients_text))
            .map(|text| ProductRecord::split_ingredient_text(&text))
            .unwrap_or_default();

        let mut record = ProductRecord::new(barcode, name, brand)
            .with_ingredients(ingredients)
            .with_nutrition(nutrition)
            .with_nutri_score(nutri_score)
            .with_image_url(image_url);
        if let Some(category) = self
            .categories
            .as_deref()
            .and_then(|list| list.split(',').map(str::trim).find(|c| !c.is_empty()))
        {
            record = record.with_category(category);
        }
        record.source_warnings = source_warnings;
        record
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Map a barcode lookup response, `None` when the product is absent
#[must_use]
pub fn record_from_response(barcode: &str, response: ProductResponse) -> Option<ProductRecord> {
    let not_found = response
        .status
        .as_ref()
        .is_some_and(|status| status.as_i64() == Some(0) || status.as_str() == Some("0"));
    if not_found {
        return None;
    }
    response.product.map(|product| product.into_record(barcode))
}

/// Open Food Facts API client
pub struct OpenFoodFactsClient {
    config: OpenFoodFactsConfig,
    http_client: Client,
}

impl OpenFoodFactsClient {
    /// Create a new client on the shared HTTP connection pool
    #[must_use]
    pub fn new(config: OpenFoodFactsConfig) -> Self {
        Self {
            config,
            http_client: shared_client().clone(),
        }
    }

    /// Client configuration
    #[must_use]
    pub const fn config(&self) -> &OpenFoodFactsConfig {
        &self.config
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }
}

impl Default for OpenFoodFactsClient {
    fn default() -> Self {
        Self::new(OpenFoodFactsConfig::default())
    }
}

#[async_trait]
impl ProductSource for OpenFoodFactsClient {
    fn name(&self) -> &'static str {
        "open_food_facts"
    }

    #[instrument(skip(self), fields(source = "open_food_facts"))]
    async fn fetch_by_barcode(&self, barcode: &str) -> AppResult<Option<ProductRecord>> {
        let url = format!(
            "{}/api/v2/product/{}.json",
            self.base_url(),
            urlencoding::encode(barcode)
        );
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(AppError::from)?;

        let Some(body) = read_json_or_none::<ProductResponse>(SERVICE, response).await? else {
            return Ok(None);
        };
        let record = record_from_response(barcode, body);
        debug!(found = record.is_some(), "Open Food Facts lookup finished");
        Ok(record)
    }
}

#[async_trait]
impl ProductSearch for OpenFoodFactsClient {
    #[instrument(skip(self), fields(source = "open_food_facts"))]
    async fn search_by_name(&self, query: &str) -> AppResult<Option<ProductRecord>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::invalid_input("Search query cannot be empty"));
        }

        let url = format!(
            "{}/cgi/search.pl?search_terms={}&search_simple=1&action=process&json=1&page_size={}",
            self.base_url(),
            urlencoding::encode(query),
            self.config.search_page_size.max(1)
        );
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(AppError::from)?;

        let Some(body) = read_json_or_none::<SearchResponse>(SERVICE, response).await? else {
            return Ok(None);
        };
        Ok(body
            .products
            .into_iter()
            .next()
            .map(|product| product.into_record("")))
    }
}
