// ABOUTME: External product sources for Open Food Facts, USDA FoodData Central, and Spoonacular
// ABOUTME: Source SPI, shared HTTP client, circuit breaker, and one adapter per external format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! External product database clients.
//!
//! Every client maps its own response format onto the canonical
//! `ProductRecord` and exposes it through the [`spi::ProductSource`] trait, so
//! the resolver can try sources in any configured order.

// Re-export tattvam-core modules so provider code can use `crate::errors::*` etc.
pub use tattvam_core::constants;
pub use tattvam_core::errors;
pub use tattvam_core::models;

/// Circuit breaker pattern for source resilience
pub mod circuit_breaker;
/// Shared HTTP client and response status mapping
pub mod http_client;
/// Open Food Facts client (primary source and smart-fill search)
pub mod open_food_facts;
/// Service Provider Interface for product sources
pub mod spi;
/// Spoonacular grocery product client
pub mod spoonacular;
/// USDA `FoodData` Central client
pub mod usda;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use open_food_facts::{OpenFoodFactsClient, OpenFoodFactsConfig};
pub use spi::{ProductSearch, ProductSource, SourceKind};
pub use spoonacular::{SpoonacularClient, SpoonacularConfig};
pub use usda::{UsdaClient, UsdaClientConfig};
