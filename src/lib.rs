// ABOUTME: Main library entry point for the Tattvam nutrition label scanning core
// ABOUTME: Wires configuration, logging, the product store, AI collaborators, and domain services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Tattvam
//!
//! Resolves a product barcode from a local store or a chain of food databases,
//! tags its ingredients against a risk dictionary, and grades it A to E with a
//! star rating and human-readable warnings.
//!
//! ## Architecture
//!
//! - **`tattvam-core`**: models, error taxonomy, constants
//! - **`tattvam-analysis`**: ingredient dictionary, tagger, grade calculator
//! - **`tattvam-providers`**: Open Food Facts, USDA, and Spoonacular clients
//! - **this crate**: configuration, logging, store, AI, services, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use tattvam::analysis::HealthAnalyzer;
//! use tattvam::config::AppConfig;
//! use tattvam::database::create_store;
//! use tattvam::errors::AppResult;
//! use tattvam::services::{GradeEstimator, ProductResolver};
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = AppConfig::from_env()?;
//!     let store = create_store(&config.database).await?;
//!     let analyzer = HealthAnalyzer::with_builtin_dictionary();
//!     let estimator = GradeEstimator::new(None, analyzer.clone());
//!     let resolver = ProductResolver::from_config(&config.sources, store, analyzer, estimator);
//!
//!     let view = resolver.resolve("8901058851298").await?;
//!     println!("{} is graded {}", view.name, view.nutri_score);
//!     Ok(())
//! }
//! ```

// Re-export tattvam-core modules so the root crate can use `crate::models::*` etc.
pub use tattvam_core::constants;
pub use tattvam_core::errors;
pub use tattvam_core::models;

/// Ingredient tagging and grading
pub use tattvam_analysis as analysis;
/// External product sources
pub use tattvam_providers as providers;

/// Environment-based configuration
pub mod config;

/// Product store trait with `SQLite` and in-process backends
pub mod database;

/// LLM provider abstraction and the Gemini client
pub mod llm;

/// Structured logging setup and domain log events
pub mod logging;

/// Resolution waterfall, catalog, advisor, and analytics services
pub mod services;
