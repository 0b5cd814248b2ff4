// ABOUTME: Shared wiring for tattvam-cli commands: configuration, store, dictionary, and AI provider
// ABOUTME: Builds resolver, catalog, advisor, and analytics services on demand
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tattvam::analysis::{HealthAnalyzer, IngredientDictionary};
use tattvam::config::{AppConfig, DatabaseUrl};
use tattvam::database::{create_store, ProductStore};
use tattvam::errors::{AppError, AppResult};
use tattvam::llm::{GeminiProvider, LlmProvider};
use tattvam::providers::http_client::initialize_shared_client;
use tattvam::services::{
    GradeEstimator, ProductAdvisor, ProductCatalog, ProductResolver, ScanAnalytics,
};
use tracing::info;

/// Connect timeout for the shared source HTTP client
const CONNECT_TIMEOUT_SECS: u64 = 3;

/// Everything a command needs
pub struct CliContext {
    pub config: AppConfig,
    pub store: Arc<dyn ProductStore>,
    pub analyzer: HealthAnalyzer,
    pub llm: Option<Arc<dyn LlmProvider>>,
}

impl CliContext {
    /// Load configuration and open the store
    pub async fn bootstrap(database_url: Option<String>) -> AppResult<Self> {
        let mut config = AppConfig::from_env()?;
        if let Some(url) = database_url {
            config.database = DatabaseUrl::parse_url(&url);
        }

        initialize_shared_client(config.sources.timeout_secs, CONNECT_TIMEOUT_SECS);

        let dictionary = match &config.dictionary_path {
            Some(path) => IngredientDictionary::from_file(path)?,
            None => IngredientDictionary::builtin(),
        };
        let analyzer = HealthAnalyzer::new(Arc::new(dictionary));

        info!(database = %config.database, "Opening product store");
        let store = create_store(&config.database).await?;

        let llm: Option<Arc<dyn LlmProvider>> = if config.llm.is_enabled() {
            Some(Arc::new(GeminiProvider::from_config(&config.llm)?))
        } else {
            None
        };

        Ok(Self {
            config,
            store,
            analyzer,
            llm,
        })
    }

    pub fn resolver(&self) -> ProductResolver {
        ProductResolver::from_config(
            &self.config.sources,
            self.store.clone(),
            self.analyzer.clone(),
            GradeEstimator::new(self.llm.clone(), self.analyzer.clone()),
        )
    }

    pub fn catalog(&self) -> ProductCatalog {
        ProductCatalog::new(self.store.clone(), self.analyzer.clone())
    }

    pub fn analytics(&self) -> ScanAnalytics {
        ScanAnalytics::new(self.store.clone())
    }

    pub fn advisor(&self) -> AppResult<ProductAdvisor> {
        let llm = self
            .llm
            .clone()
            .ok_or_else(|| AppError::config("GEMINI_API_KEY is required for product questions"))?;
        Ok(ProductAdvisor::new(
            self.store.clone(),
            llm,
            self.analyzer.clone(),
        ))
    }
}
