// ABOUTME: External product source configuration: waterfall order, timeouts, API keys, and circuit breakers
// ABOUTME: Parsed from environment variables into the provider crate's client configs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::time::Duration;

use tattvam_providers::{
    CircuitBreakerConfig, OpenFoodFactsConfig, SourceKind, SpoonacularConfig, UsdaClientConfig,
};

use super::environment::{env_flag, env_number, env_var_or};
use crate::errors::{AppError, AppResult};

/// Default per-source timeout in seconds
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 5;

/// Default `SOURCE_ORDER`
pub const DEFAULT_SOURCE_ORDER: &str = "open_food_facts,usda,spoonacular";

/// Waterfall configuration
#[derive(Debug, Clone)]
pub struct SourcesConfig {
    /// Source names in waterfall order, as configured
    pub order: Vec<String>,
    /// Per-source call timeout in seconds
    pub timeout_secs: u64,
    /// Query the primary source's text search for missing images or nutrition
    pub smart_fill_enabled: bool,
    /// Open Food Facts settings (no key needed)
    pub open_food_facts: OpenFoodFactsConfig,
    /// USDA settings, `None` when no API key is configured
    pub usda: Option<UsdaClientConfig>,
    /// Spoonacular settings, `None` when no API key is configured
    pub spoonacular: Option<SpoonacularConfig>,
    /// Circuit breaker settings shared by every source
    pub circuit_breaker: CircuitBreakerConfig,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            order: parse_order(DEFAULT_SOURCE_ORDER),
            timeout_secs: DEFAULT_SOURCE_TIMEOUT_SECS,
            smart_fill_enabled: true,
            open_food_facts: OpenFoodFactsConfig::default(),
            usda: None,
            spoonacular: None,
            circuit_breaker: CircuitBreakerConfig::default(),
        }
    }
}

impl SourcesConfig {
    /// Load from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a numeric or boolean variable does
    /// not parse
    pub fn from_env() -> AppResult<Self> {
        let defaults = CircuitBreakerConfig::default();
        let usda = non_empty_env("USDA_API_KEY").map(|api_key| UsdaClientConfig {
            api_key,
            base_url: env_var_or("USDA_BASE_URL", &UsdaClientConfig::default().base_url),
            ..UsdaClientConfig::default()
        });
        let spoonacular = non_empty_env("SPOONACULAR_API_KEY").map(|api_key| SpoonacularConfig {
            api_key,
            base_url: env_var_or(
                "SPOONACULAR_BASE_URL",
                &SpoonacularConfig::default().base_url,
            ),
        });

        Ok(Self {
            order: parse_order(&env_var_or("SOURCE_ORDER", DEFAULT_SOURCE_ORDER)),
            timeout_secs: env_number("SOURCE_TIMEOUT_SECS", DEFAULT_SOURCE_TIMEOUT_SECS)?,
            smart_fill_enabled: env_flag("SMART_FILL_ENABLED", true)?,
            open_food_facts: OpenFoodFactsConfig {
                base_url: env_var_or(
                    "OPEN_FOOD_FACTS_BASE_URL",
                    &OpenFoodFactsConfig::default().base_url,
                ),
                ..OpenFoodFactsConfig::default()
            },
            usda,
            spoonacular,
            circuit_breaker: CircuitBreakerConfig::new(
                env_number(
                    "CIRCUIT_BREAKER_FAILURE_THRESHOLD",
                    defaults.failure_threshold,
                )?,
                Duration::from_secs(env_number(
                    "CIRCUIT_BREAKER_RECOVERY_SECS",
                    defaults.recovery_timeout.as_secs(),
                )?),
                defaults.success_threshold,
            ),
        })
    }

    /// Per-source call timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured order mapped to known sources, unknown names dropped
    #[must_use]
    pub fn kinds(&self) -> Vec<SourceKind> {
        let mut kinds: Vec<SourceKind> = Vec::new();
        for kind in self.order.iter().filter_map(|name| SourceKind::parse(name)) {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    /// Whether `kind` has the credentials it needs
    #[must_use]
    pub const fn is_enabled(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::OpenFoodFacts => true,
            SourceKind::Usda => self.usda.is_some(),
            SourceKind::Spoonacular => self.spoonacular.is_some(),
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero timeout, a zero failure
    /// threshold, an empty order, or an unknown source name
    pub fn validate(&self) -> AppResult<()> {
        if self.timeout_secs == 0 {
            return Err(AppError::config_invalid("SOURCE_TIMEOUT_SECS must be greater than 0"));
        }
        if self.circuit_breaker.failure_threshold == 0 {
            return Err(AppError::config_invalid(
                "CIRCUIT_BREAKER_FAILURE_THRESHOLD must be greater than 0",
            ));
        }
        if self.order.is_empty() {
            return Err(AppError::config_invalid("SOURCE_ORDER must name at least one source"));
        }
        if let Some(unknown) = self.order.iter().find(|name| SourceKind::parse(name).is_none()) {
            return Err(AppError::config_invalid(format!(
                "SOURCE_ORDER contains unknown source '{unknown}'"
            )));
        }
        Ok(())
    }
}

fn parse_order(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
