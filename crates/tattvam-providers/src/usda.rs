// ABOUTME: USDA FoodData Central client resolving branded foods by GTIN/UPC barcode
// ABOUTME: Implements barcode lookup with response caching, rate limiting, and record mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! USDA `FoodData` Central API Client
//!
//! `FoodData` Central has no barcode endpoint. Branded foods carry a
//! `gtinUpc`, so a lookup searches the Branded data type for the barcode and
//! keeps the first result whose GTIN matches.
//!
//! # Features
//! - 24-hour LRU caching of barcode lookups, misses included
//! - Rate limiting (30 requests per minute by default)
//!
//! # API Reference
//! USDA `FoodData` Central API: <https://fdc.nal.usda.gov/api-guide.html>

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{debug, instrument};

use crate::constants::labels::GENERIC_BRAND;
use crate::constants::nutrient_warnings::{FAT_LIMIT, HIGH_FAT, HIGH_SUGAR, SUGAR_LIMIT};
use crate::errors::{AppError, AppResult};
use crate::http_client::{read_json_or_none, shared_client};
use crate::models::{NutrientValues, ProductRecord};
use crate::spi::ProductSource;

const SERVICE: &str = "USDA API";

const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => unreachable!(),
};

/// `FoodData` Central nutrient ids
mod nutrient_ids {
    pub const ENERGY_KCAL: u32 = 1008;
    pub const PROTEIN: u32 = 1003;
    pub const CARBOHYDRATE: u32 = 1005;
    pub const FAT: u32 = 1004;
    pub const SUGARS_TOTAL: u32 = 2000;
    pub const SODIUM: u32 = 1093;
}

/// USDA API client configuration
#[derive(Debug, Clone)]
pub struct UsdaClientConfig {
    /// USDA API key (free from <https://fdc.nal.usda.gov/api-key-signup.html>)
    pub api_key: String,
    /// Base URL for USDA API (default: <https://api.nal.usda.gov/fdc/v1>)
    pub base_url: String,
    /// Cache TTL in seconds (default: 86400 = 24 hours)
    pub cache_ttl_secs: u64,
    /// Most barcodes kept in the lookup cache (default: 1000)
    pub cache_capacity: usize,
    /// Rate limit per minute (default: 30)
    pub rate_limit_per_minute: u32,
    /// Branded candidates fetched per barcode search
    pub page_size: u32,
}

impl Default for UsdaClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.nal.usda.gov/fdc/v1".to_owned(),
            cache_ttl_secs: 86400,
            cache_capacity: DEFAULT_CACHE_CAPACITY.get(),
            rate_limit_per_minute: 30,
            page_size: 5,
        }
    }
}

/// USDA search response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Matching foods
    #[serde(default)]
    pub foods: Vec<BrandedFood>,
}

/// A branded food search hit
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandedFood {
    /// `FoodData` Central ID
    #[serde(default)]
    pub fdc_id: u64,
    /// Food description, used as the product name
    #[serde(default)]
    pub description: String,
    /// Brand owner
    #[serde(default)]
    pub brand_owner: Option<String>,
    /// Barcode printed on the package
    #[serde(default)]
    pub gtin_upc: Option<String>,
    /// Ingredient label, upper-case in most records
    #[serde(default)]
    pub ingredients: Option<String>,
    /// Branded food category
    #[serde(default)]
    pub branded_food_category: Option<String>,
    /// Nutrients per 100 g
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

/// Nutrient entry as returned by the search endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodNutrient {
    /// Nutrient ID
    #[serde(default)]
    pub nutrient_id: u32,
    /// Amount per 100 g
    #[serde(default)]
    pub value: Option<f64>,
}

impl BrandedFood {
    fn nutrient(&self, id: u32) -> f64 {
        self.food_nutrients
            .iter()
            .find(|n| n.nutrient_id == id)
            .and_then(|n| n.value)
            .unwrap_or(0.0)
    }

    /// Whether this food's GTIN matches `barcode`, ignoring leading zeros
    #[must_use]
    pub fn matches_barcode(&self, barcode: &str) -> bool {
        let wanted = barcode.trim().trim_start_matches('0');
        self.gtin_upc
            .as_deref()
            .is_some_and(|gtin| !wanted.is_empty() && gtin.trim().trim_start_matches('0') == wanted)
    }

    /// Map onto the canonical record
    #[must_use]
    pub fn into_record(self, barcode: &str) -> ProductRecord {
        let nutrition = NutrientValues {
            calories: self.nutrient(nutrient_ids::ENERGY_KCAL),
            protein: self.nutrient(nutrient_ids::PROTEIN),
            carbs: self.nutrient(nutrient_ids::CARBOHYDRATE),
            fat: self.nutrient(nutrient_ids::FAT),
            sugar: self.nutrient(nutrient_ids::SUGARS_TOTAL),
            sodium: self.nutrient(nutrient_ids::SODIUM),
        };

        let mut source_warnings = Vec::new();
        if nutrition.fat > FAT_LIMIT {
            source_warnings.push(HIGH_FAT.to_owned());
        }
        if nutrition.sugar > SUGAR_LIMIT {
            source_warnings.push(HIGH_SUGAR.to_owned());
        }

        let barcode = if barcode.trim().is_empty() {
            self.fdc_id.to_string()
        } else {
            barcode.trim().to_owned()
        };
        let brand = self
            .brand_owner
            .map(|b| b.trim().to_owned())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| GENERIC_BRAND.to_owned());
        let ingredients = self
            .ingredients
            .map(|text| ProductRecord::split_ingredient_text(&text.to_lowercase()))
            .unwrap_or_default();

        let mut record = ProductRecord::new(barcode, self.description.trim(), brand)
            .with_ingredients(ingredients)
            .with_nutrition(nutrition);
        if let Some(category) = self.branded_food_category.filter(|c| !c.trim().is_empty()) {
            record = record.with_category(category);
        }
        record.source_warnings = source_warnings;
        record
    }
}

/// Pick the search hit matching `barcode` and map it
#[must_use]
pub fn record_from_search(barcode: &str, response: SearchResponse) -> Option<ProductRecord> {
    response
        .foods
        .into_iter()
        .find(|food| food.matches_barcode(barcode))
        .map(|food| food.into_record(barcode))
}

/// Cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

/// Sliding-window rate limiter for API requests
#[derive(Debug)]
struct RateLimiter {
    requests: Vec<Instant>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    const fn new(limit: u32, window: Duration) -> Self {
        Self {
            requests: Vec::new(),
            limit,
            window,
        }
    }

    fn can_request(&mut self) -> bool {
        let now = Instant::now();
        self.requests
            .retain(|&t| now.duration_since(t) < self.window);
        self.requests.len() < self.limit.max(1) as usize
    }

    fn record_request(&mut self) {
        self.requests.push(Instant::now());
    }

    async fn wait_if_needed(&mut self) {
        while !self.can_request() {
            sleep(Duration::from_secs(1)).await;
        }
    }
}

/// USDA `FoodData` Central API Client
pub struct UsdaClient {
    config: UsdaClientConfig,
    http_client: Client,
    barcode_cache: Arc<RwLock<LruCache<String, CacheEntry<Option<ProductRecord>>>>>,
    rate_limiter: Arc<RwLock<RateLimiter>>,
}

impl UsdaClient {
    /// Create a new USDA API client
    #[must_use]
    pub fn new(config: UsdaClientConfig) -> Self {
        let rate_limiter = RateLimiter::new(config.rate_limit_per_minute, Duration::from_secs(60));
        let capacity = NonZeroUsize::new(config.cache_capacity).unwrap_or(DEFAULT_CACHE_CAPACITY);

        Self {
            config,
            http_client: shared_client().clone(),
            barcode_cache: Arc::new(RwLock::new(LruCache::new(capacity))),
            rate_limiter: Arc::new(RwLock::new(rate_limiter)),
        }
    }

    async fn cached(&self, barcode: &str) -> Option<Option<ProductRecord>> {
        // LruCache::get updates recency, so even reads take the write lock
        let mut cache = self.barcode_cache.write().await;
        let entry = cache.get(barcode)?;
        if Instant::now() < entry.expires_at {
            return Some(entry.data.clone());
        }
        cache.pop(barcode);
        drop(cache);
        debug!("Evicted expired USDA cache entry");
        None
    }

    async fn remember(&self, barcode: &str, record: Option<ProductRecord>) {
        let mut cache = self.barcode_cache.write().await;
        cache.push(
            barcode.to_owned(),
            CacheEntry {
                data: record,
                expires_at: Instant::now() + Duration::from_secs(self.config.cache_ttl_secs),
            },
        );
    }

    /// Clear the lookup cache
    pub async fn clear_cache(&self) {
        self.barcode_cache.write().await.clear();
    }

    /// Number of cached lookups
    pub async fn cache_len(&self) -> usize {
        self.barcode_cache.read().await.len()
    }
}

#[async_trait]
impl ProductSource for UsdaClient {
    fn name(&self) -> &'static str {
        "usda"
    }

    #[instrument(skip(self), fields(source = "usda"))]
    async fn fetch_by_barcode(&self, barcode: &str) -> AppResult<Option<ProductRecord>> {
        if self.config.api_key.is_empty() {
            return Err(AppError::config("USDA API key is not configured"));
        }
        if let Some(hit) = self.cached(barcode).await {
            debug!("USDA cache hit");
            return Ok(hit);
        }

        {
            let mut limiter = self.rate_limiter.write().await;
            limiter.wait_if_needed().await;
            limiter.record_request();
        }

        let url = format!("{}/foods/search", self.config.base_url.trim_end_matches('/'));
        let page_size = self.config.page_size.clamp(1, 200).to_string();
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", barcode),
                ("dataType", "Branded"),
                ("pageSize", page_size.as_str()),
                ("api_key", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(AppError::from)?;

        let record = read_json_or_none::<SearchResponse>(SERVICE, response)
            .await?
            .and_then(|body| record_from_search(barcode, body));
        self.remember(barcode, record.clone()).await;
        Ok(record)
    }
}
