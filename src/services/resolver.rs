// ABOUTME: Barcode resolution waterfall: store lookup, ordered external sources, smart-fill, grade estimation, upsert
// ABOUTME: Each source runs behind its own circuit breaker and timeout so one failing database never fails a lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Product Resolver
//!
//! ```text
//! store ──hit with grade──▶ view (stored)
//!   │ miss / unknown grade / store error
//!   ▼
//! source 1 ─▶ source 2 ─▶ ... ─▶ not found
//!   │ first record with a name and barcode
//!   ▼
//! smart-fill ─▶ grade estimation ─▶ upsert ─▶ view
//! ```
//!
//! A stored record whose grade is unknown is re-resolved; when every source
//! fails it is still returned, graded by the calculator. An AI failure grade
//! is shown to the caller but stored as unknown, so it is estimated again on
//! the next lookup.
//!
//! A source hit replaces a stored user submission and approves it; the
//! submitter id is kept. A pending submission that no source knows is served
//! with its `pending` status and a calculator grade.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tattvam_analysis::HealthAnalyzer;
use tattvam_providers::{
    CircuitBreaker, CircuitBreakerConfig, CircuitState, OpenFoodFactsClient, ProductSource,
    SourceKind, SpoonacularClient, UsdaClient,
};
use tokio::time::timeout;
use tracing::{debug, info, instrument};

use super::grade_estimator::GradeEstimator;
use super::smart_fill::SmartFill;
use crate::config::SourcesConfig;
use crate::constants::labels::NOT_FOUND_MESSAGE;
use crate::database::ProductStore;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::logging::{AppLogger, SourceOutcome};
use crate::models::{GradeOrigin, ProductRecord, ProductStatus, ProductView};

/// One waterfall step: a source and the breaker guarding it
struct SourceSlot {
    source: Arc<dyn ProductSource>,
    breaker: CircuitBreaker,
}

/// Resolves barcodes into graded product views
pub struct ProductResolver {
    store: Arc<dyn ProductStore>,
    sources: Vec<SourceSlot>,
    smart_fill: Option<SmartFill>,
    estimator: GradeEstimator,
    analyzer: HealthAnalyzer,
    source_timeout: Duration,
}

impl ProductResolver {
    /// Create a resolver with no external sources
    #[must_use]
    pub fn new(
        store: Arc<dyn ProductStore>,
        analyzer: HealthAnalyzer,
        estimator: GradeEstimator,
        source_timeout: Duration,
    ) -> Self {
        Self {
            store,
            sources: Vec::new(),
            smart_fill: None,
            estimator,
            analyzer,
            source_timeout,
        }
    }

    /// Build the waterfall from configuration
    ///
    /// Sources appear in `SOURCE_ORDER`; USDA and Spoonacular are left out
    /// when their API key is missing. Smart-fill searches Open Food Facts.
    #[must_use]
    pub fn from_config(
        config: &SourcesConfig,
        store: Arc<dyn ProductStore>,
        analyzer: HealthAnalyzer,
        estimator: GradeEstimator,
    ) -> Self {
        let open_food_facts = Arc::new(OpenFoodFactsClient::new(config.open_food_facts.clone()));
        let mut resolver = Self::new(store, analyzer, estimator, config.timeout());

        for kind in config.kinds() {
            let source: Arc<dyn ProductSource> = match (kind, &config.usda, &config.spoonacular) {
                (SourceKind::OpenFoodFacts, _, _) => open_food_facts.clone(),
                (SourceKind::Usda, Some(usda), _) => Arc::new(UsdaClient::new(usda.clone())),
                (SourceKind::Spoonacular, _, Some(spoonacular)) => {
                    Arc::new(SpoonacularClient::new(spoonacular.clone()))
                }
                (kind, _, _) => {
                    debug!(source = %kind, "Source disabled, no API key configured");
                    continue;
                }
            };
            resolver = resolver.with_source(source, config.circuit_breaker.clone());
        }

        if config.smart_fill_enabled {
            resolver = resolver.with_smart_fill(SmartFill::new(open_food_facts, config.timeout()));
        }
        resolver
    }

    /// Append a source to the end of the waterfall
    #[must_use]
    pub fn with_source(
        mut self,
        source: Arc<dyn ProductSource>,
        breaker_config: CircuitBreakerConfig,
    ) -> Self {
        let breaker = CircuitBreaker::with_config(source.name(), breaker_config);
        self.sources.push(SourceSlot { source, breaker });
        self
    }

    /// Enable smart-fill
    #[must_use]
    pub fn with_smart_fill(mut self, smart_fill: SmartFill) -> Self {
        self.smart_fill = Some(smart_fill);
        self
    }

    /// Source names in waterfall order
    #[must_use]
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|slot| slot.source.name()).collect()
    }

    /// Circuit state of the named source
    #[must_use]
    pub fn circuit_state(&self, source_name: &str) -> Option<CircuitState> {
        self.sources
            .iter()
            .find(|slot| slot.source.name() == source_name)
            .map(|slot| slot.breaker.state())
    }

    /// Analyzer shared with the catalog and the CLI
    #[must_use]
    pub const fn analyzer(&self) -> &HealthAnalyzer {
        &self.analyzer
    }

    /// Resolve a barcode into a graded product view
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty barcode and `ResourceNotFound`
    /// when neither the store nor any source knows the product.
    #[instrument(skip(self), fields(barcode = %barcode))]
    pub async fn resolve(&self, barcode: &str) -> AppResult<ProductView> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(AppError::invalid_input("Barcode cannot be empty"));
        }

        let stored = self.lookup_store(barcode).await;
        if let Some(record) = stored.as_ref().filter(|r| r.nutri_score.is_some()) {
            debug!("Store hit with known grade");
            return Ok(self.analyzer.view(record, GradeOrigin::Stored));
        }

        let Some(mut record) = self.fetch_from_sources(barcode).await else {
            return stored.map_or_else(
                || {
                    Err(AppError::new(
                        ErrorCode::ResourceNotFound,
                        NOT_FOUND_MESSAGE,
                    ))
                },
                |record| {
                    info!("Sources exhausted, serving stored record with calculator grade");
                    Ok(self.analyzer.view(&record, GradeOrigin::Calculator))
                },
            );
        };

        record.status = ProductStatus::Approved;
        record.updated_at = Utc::now();
        if record.submitted_by.is_none() {
            record.submitted_by = stored.and_then(|previous| previous.submitted_by);
        }

        if let Some(smart_fill) = &self.smart_fill {
            if smart_fill.fill(&mut record).await {
                debug!("Smart-fill enriched record");
            }
        }

        let origin = self.estimator.apply(&mut record).await;
        let view = self.analyzer.view(&record, origin);

        // The worst-case default is never stored, so the next lookup asks again
        if origin == GradeOrigin::AiFailureDefault {
            record.nutri_score = None;
        }
        self.persist(&record).await;
        Ok(view)
    }

    async fn lookup_store(&self, barcode: &str) -> Option<ProductRecord> {
        match self.store.find_by_barcode(barcode).await {
            Ok(found) => found,
            Err(e) => {
                AppLogger::log_store_operation("find_by_barcode", barcode, false, Some(&e.message));
                None
            }
        }
    }

    async fn persist(&self, record: &ProductRecord) {
        match self.store.upsert(record).await {
            Ok(()) => AppLogger::log_store_operation("upsert", &record.barcode, true, None),
            Err(e) => AppLogger::log_store_operation(
                "upsert",
                &record.barcode,
                false,
                Some(&e.message),
            ),
        }
    }

    /// Try each source in order; the first record with an identity wins
    async fn fetch_from_sources(&self, barcode: &str) -> Option<ProductRecord> {
        for slot in &self.sources {
            let name = slot.source.name();
            let attempted = AtomicBool::new(false);
            let started = Instant::now();

            let result = slot
                .breaker
                .call(async {
                    attempted.store(true, Ordering::SeqCst);
                    timeout(self.source_timeout, slot.source.fetch_by_barcode(barcode))
                        .await
                        .unwrap_or_else(|_| {
                            Err(AppError::external_unavailable(
                                name,
                                format!("timed out after {}s", self.source_timeout.as_secs()),
                            ))
                        })
                })
                .await;
            let elapsed = started.elapsed();

            match result {
                Ok(Some(record)) if record.has_identity() => {
                    AppLogger::log_source_attempt(name, barcode, SourceOutcome::Found, elapsed, None);
                    return Some(record);
                }
                Ok(Some(_)) => AppLogger::log_source_attempt(
                    name,
                    barcode,
                    SourceOutcome::Missing,
                    elapsed,
                    Some("record has no name"),
                ),
                Ok(None) => {
                    AppLogger::log_source_attempt(name, barcode, SourceOutcome::Missing, elapsed, None);
                }
                Err(e) => {
                    let outcome = if attempted.load(Ordering::SeqCst) {
                        SourceOutcome::Failed
                    } else {
                        SourceOutcome::Skipped
                    };
                    AppLogger::log_source_attempt(name, barcode, outcome, elapsed, Some(&e.message));
                }
            }
        }
        None
    }
}
