// ABOUTME: Configuration module for the product store, source waterfall, and AI collaborator
// ABOUTME: Environment-only settings parsed into typed structs with validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment, store, and AI configuration
pub mod environment;
/// External source waterfall configuration
pub mod sources;

pub use environment::{AppConfig, DatabaseUrl, Environment, LlmConfig};
pub use sources::SourcesConfig;
