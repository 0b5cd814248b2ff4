// ABOUTME: Domain service layer for product resolution, review, AI questions, and scan analytics
// ABOUTME: Protocol-agnostic services reusable from the CLI or any HTTP front end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Services hold `Arc` handles to the product store and the AI provider and
//! carry no protocol concerns; callers supply identities as plain strings.

/// Free-text questions about stored products
pub mod advisor;

/// Scan history and per-user analytics
pub mod analytics;

/// Submissions, review workflow, and product listings
pub mod catalog;

/// AI grade estimation with calculator fallback
pub mod grade_estimator;

/// Barcode resolution waterfall
pub mod resolver;

/// Image and nutrition gap filling from text search
pub mod smart_fill;

pub use advisor::{AdvisorAnswer, ProductAdvisor};
pub use analytics::{AnalyticsSummary, ScanAnalytics};
pub use catalog::ProductCatalog;
pub use grade_estimator::{AiGradeReply, GradeEstimator, AI_FAILURE_GRADE};
pub use resolver::ProductResolver;
pub use smart_fill::SmartFill;
