// ABOUTME: Foundation crate for the Tattvam nutrition scanning core
// ABOUTME: Re-exports product models, grade types, the error taxonomy, and shared constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tattvam Core
//!
//! Shared building blocks used by every crate in the workspace:
//!
//! - [`models`]: the canonical `ProductRecord`, the frontend-facing `ProductView`,
//!   grade and ingredient types, and scan history records
//! - [`errors`]: `AppError` / `ErrorCode` and the `AppResult` alias
//! - [`constants`]: grading thresholds and fixed labels

/// Grading thresholds, placeholder labels, and lookup limits
pub mod constants;
/// Unified error taxonomy shared across crates
pub mod errors;
/// Product, grade, ingredient, and scan models
pub mod models;
