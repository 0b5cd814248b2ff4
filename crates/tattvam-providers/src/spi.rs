// ABOUTME: Service Provider Interface for external product sources
// ABOUTME: ProductSource and ProductSearch traits plus the SourceKind registry used by configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Product Source SPI
//!
//! The resolver walks an ordered list of `ProductSource` trait objects. Each
//! implementation maps its own response format onto [`ProductRecord`] and
//! returns `Ok(None)` when the barcode is unknown, reserving `Err` for
//! transport failures, bad statuses, and malformed bodies.
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use tattvam_providers::errors::AppResult;
//! use tattvam_providers::models::ProductRecord;
//! use tattvam_providers::spi::ProductSource;
//!
//! struct LocalCsvSource;
//!
//! #[async_trait]
//! impl ProductSource for LocalCsvSource {
//!     fn name(&self) -> &'static str {
//!         "local_csv"
//!     }
//!
//!     async fn fetch_by_barcode(&self, _barcode: &str) -> AppResult<Option<ProductRecord>> {
//!         Ok(None)
//!     }
//! }
//! ```

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;
use crate::models::ProductRecord;

/// One external product database in the waterfall
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Stable source name used in logs and configuration
    fn name(&self) -> &'static str;

    /// Look up a product by barcode
    ///
    /// # Errors
    ///
    /// Returns an external service error when the source cannot be reached or
    /// answers with something other than a product or a clean "not found".
    async fn fetch_by_barcode(&self, barcode: &str) -> AppResult<Option<ProductRecord>>;
}

/// Free-text product search, used by smart-fill
#[async_trait]
pub trait ProductSearch: Send + Sync {
    /// Return the best match for `query`, if any
    ///
    /// # Errors
    ///
    /// Returns an external service error on transport or decoding failures.
    async fn search_by_name(&self, query: &str) -> AppResult<Option<ProductRecord>>;
}

/// Known source implementations, as named in `SOURCE_ORDER`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Open Food Facts public database
    OpenFoodFacts,
    /// USDA `FoodData` Central
    Usda,
    /// Spoonacular grocery products
    Spoonacular,
}

impl SourceKind {
    /// Default waterfall order
    pub const DEFAULT_ORDER: [Self; 3] = [Self::OpenFoodFacts, Self::Usda, Self::Spoonacular];

    /// Configuration name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenFoodFacts => "open_food_facts",
            Self::Usda => "usda",
            Self::Spoonacular => "spoonacular",
        }
    }

    /// Parse a configuration name, accepting a few common spellings
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "open_food_facts" | "openfoodfacts" | "off" => Some(Self::OpenFoodFacts),
            "usda" | "fdc" => Some(Self::Usda),
            "spoonacular" => Some(Self::Spoonacular),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
