// ABOUTME: Logging configuration and structured logging setup for the resolver, store, and CLI
// ABOUTME: Configures log levels, formatters, noise filters, and structured domain events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging configuration
//!
//! Logs go to stderr so the CLI can keep stdout for JSON output.

use std::env;
use std::io;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tracing::{info, warn, Level};
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{registry, EnvFilter};

/// Service name reported in startup logs
pub const SERVICE_NAME: &str = "tattvam";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Include span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for terminals
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value, defaulting to pretty
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: SERVICE_NAME.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let format = env::var("LOG_FORMAT").map_or(LogFormat::Pretty, |v| LogFormat::parse(&v));
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        // In production, use more detailed logging
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| SERVICE_NAME.into()),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment,
        }
    }

    /// Raise the level to `debug` (CLI `--verbose`)
    #[must_use]
    pub fn verbose(mut self) -> Self {
        self.level = "debug".into();
        self
    }

    fn env_filter(&self) -> EnvFilter {
        let directive = |text: &str, fallback: Level| text.parse().unwrap_or_else(|_| fallback.into());

        env::var("RUST_LOG")
            .map_or_else(|_| EnvFilter::new(&self.level), |env_directive| EnvFilter::new(env_directive))
            // Always apply noise reduction regardless of RUST_LOG setting
            .add_directive(directive("hyper=warn", Level::WARN))
            .add_directive(directive("hyper_util=warn", Level::WARN))
            .add_directive(directive("reqwest=warn", Level::WARN))
            .add_directive(directive("rustls=warn", Level::WARN))
            .add_directive(directive("sqlx=warn", Level::WARN))
            .add_directive(directive(&format!("tattvam={}", self.level), Level::INFO))
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stderr)
                    .with_span_events(span_events)
                    .json();
                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stderr)
                    .with_span_events(span_events);
                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(io::stderr)
                    .with_span_events(FmtSpan::NONE);
                registry.with(compact_layer).try_init()?;
            }
        }

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        let summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
            }
        });
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            "Logging initialized: {summary}"
        );
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Outcome of one waterfall source attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOutcome {
    /// The source returned a usable record
    Found,
    /// The source answered but has no such product
    Missing,
    /// Transport error, bad status, malformed body, or timeout
    Failed,
    /// Skipped by an open circuit breaker
    Skipped,
}

impl SourceOutcome {
    /// Log field value
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::Missing => "missing",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// Structured domain events
pub struct AppLogger;

impl AppLogger {
    /// Log one source attempt in the waterfall
    pub fn log_source_attempt(
        source: &str,
        barcode: &str,
        outcome: SourceOutcome,
        elapsed: Duration,
        detail: Option<&str>,
    ) {
        let elapsed_ms = elapsed.as_millis() as u64;
        match outcome {
            SourceOutcome::Failed | SourceOutcome::Skipped => warn!(
                source.name = %source,
                product.barcode = %barcode,
                source.outcome = outcome.as_str(),
                source.duration_ms = elapsed_ms,
                source.detail = detail.unwrap_or(""),
                "Source attempt"
            ),
            SourceOutcome::Found | SourceOutcome::Missing => info!(
                source.name = %source,
                product.barcode = %barcode,
                source.outcome = outcome.as_str(),
                source.duration_ms = elapsed_ms,
                "Source attempt"
            ),
        }
    }

    /// Log product store operations
    pub fn log_store_operation(operation: &str, barcode: &str, success: bool, detail: Option<&str>) {
        if success {
            info!(
                db.operation = %operation,
                product.barcode = %barcode,
                db.success = true,
                "Store operation"
            );
        } else {
            warn!(
                db.operation = %operation,
                product.barcode = %barcode,
                db.success = false,
                db.detail = detail.unwrap_or(""),
                "Store operation failed"
            );
        }
    }

    /// Log the outcome of a grade estimation
    pub fn log_grade_estimation(barcode: &str, origin: &str, grade: &str, detail: Option<&str>) {
        info!(
            product.barcode = %barcode,
            grade.origin = %origin,
            grade.letter = %grade,
            grade.detail = detail.unwrap_or(""),
            "Grade estimated"
        );
    }
}
