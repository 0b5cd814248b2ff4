// ABOUTME: Environment configuration for the store, the AI collaborator, and the ingredient dictionary
// ABOUTME: Typed AppConfig parsed from environment variables with defaults and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration
//!
//! There is no configuration file; every setting comes from an environment
//! variable with a default.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

use super::sources::SourcesConfig;
use crate::errors::{AppError, AppResult};

/// Default `DATABASE_URL`
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/tattvam.db";

/// Default Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default AI call timeout in seconds
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 15;

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe product store location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
    /// Process-local map store, nothing touches disk
    InProcess,
}

impl DatabaseUrl {
    /// Parse from string
    ///
    /// `sqlite::memory:` is in-memory `SQLite`; `memory://` selects the
    /// process-local map store; anything else is a `SQLite` file path.
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let s = s.trim();
        if s == "memory://" || s == "memory:" {
            return Self::InProcess;
        }
        let path = s.strip_prefix("sqlite://").or_else(|| s.strip_prefix("sqlite:")).unwrap_or(s);
        if path == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path),
            }
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
            Self::InProcess => "memory://".to_owned(),
        }
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(DEFAULT_DATABASE_URL)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Gemini settings
#[derive(Clone)]
pub struct LlmConfig {
    /// API key; AI grade estimation and advice are disabled without one
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// API base URL override
    pub base_url: Option<String>,
    /// AI call timeout in seconds
    pub timeout_secs: u64,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_owned(),
            base_url: None,
            timeout_secs: DEFAULT_AI_TIMEOUT_SECS,
        }
    }
}

impl LlmConfig {
    /// AI call timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether an AI collaborator can be built
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Product store location
    pub database: DatabaseUrl,
    /// External source waterfall
    pub sources: SourcesConfig,
    /// AI collaborator
    pub llm: LlmConfig,
    /// YAML ingredient dictionary; the built-in table when `None`
    pub dictionary_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from environment variables and validate it
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a variable does not parse or the
    /// result fails [`AppConfig::validate`]
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            environment: Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development")),
            database: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL)),
            sources: SourcesConfig::from_env()?,
            llm: LlmConfig {
                api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
                model: env_var_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                base_url: env::var("GEMINI_BASE_URL").ok().filter(|u| !u.trim().is_empty()),
                timeout_secs: env_number("AI_TIMEOUT_SECS", DEFAULT_AI_TIMEOUT_SECS)?,
            },
            dictionary_path: env::var("INGREDIENT_DICTIONARY_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        };

        config.validate()?;
        info!(
            environment = %config.environment,
            database = %config.database,
            sources = ?config.sources.kinds(),
            ai_enabled = config.llm.is_enabled(),
            "Configuration loaded successfully"
        );
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a configuration error for zero timeouts or unknown source names
    pub fn validate(&self) -> AppResult<()> {
        self.sources.validate()?;
        if self.llm.timeout_secs == 0 {
            return Err(AppError::config_invalid("AI_TIMEOUT_SECS must be greater than 0"));
        }
        if self.llm.model.trim().is_empty() {
            return Err(AppError::config_invalid("GEMINI_MODEL cannot be empty"));
        }
        Ok(())
    }
}

/// Get environment variable or default value
pub(crate) fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse a numeric environment variable, falling back to `default` when unset
pub(crate) fn env_number<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config_invalid(format!("Invalid {key} value: '{raw}'"))),
        _ => Ok(default),
    }
}

/// Parse a boolean environment variable (`true/false/1/0/yes/no`)
pub(crate) fn env_flag(key: &str, default: bool) -> AppResult<bool> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "" => Ok(default),
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(AppError::config_invalid(format!("Invalid {key} value: '{raw}'"))),
        },
        Err(_) => Ok(default),
    }
}
