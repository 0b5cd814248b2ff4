// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging setup, sample records, and scripted sources, AI, and store doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `tattvam`
//!
//! This module provides common test doubles so each integration test can
//! wire a resolver or service without touching the network.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use tattvam::analysis::HealthAnalyzer;
use tattvam::database::{MemoryStore, ProductStore};
use tattvam::errors::{AppError, AppResult, ErrorCode};
use tattvam::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use tattvam::models::{
    NutriScore, NutrientValues, ProductRecord, ProductStatus, ScanRecord,
};
use tattvam::providers::{ProductSearch, ProductSource};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG controls the level; quiet by default
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

// ============================================================================
// Sample Records
// ============================================================================

/// Instant noodles: unhealthy ingredients and nutrients well over every limit
pub fn noodles(barcode: &str) -> ProductRecord {
    ProductRecord::new(barcode, "Masala Noodles", "Maggi")
        .with_ingredients(["Wheat Flour", "Palm Oil", "Sugar", "Salt"])
        .with_nutrition(NutrientValues {
            calories: 500.0,
            protein: 8.0,
            carbs: 60.0,
            fat: 25.0,
            sugar: 30.0,
            sodium: 1500.0,
        })
        .with_image_url("https://images.example.org/noodles.jpg")
}

/// Rolled oats with a low nutrient load
pub fn oats(barcode: &str) -> ProductRecord {
    ProductRecord::new(barcode, "Rolled Oats", "Saffola")
        .with_ingredients(["Whole Grain Oats"])
        .with_nutrition(NutrientValues {
            calories: 340.0,
            protein: 12.0,
            carbs: 60.0,
            fat: 7.0,
            sugar: 1.0,
            sodium: 5.0,
        })
        .with_image_url("https://images.example.org/oats.jpg")
}

/// Approved record with a stored grade
pub fn graded(record: ProductRecord, grade: NutriScore) -> ProductRecord {
    record
        .with_nutri_score(Some(grade))
        .with_status(ProductStatus::Approved)
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub fn analyzer() -> HealthAnalyzer {
    HealthAnalyzer::with_builtin_dictionary()
}

// ============================================================================
// Product Sources
// ============================================================================

/// What a [`FakeSource`] answers with
#[derive(Clone)]
pub enum SourceReply {
    Found(ProductRecord),
    Missing,
    Fail(ErrorCode),
    Slow(Duration, ProductRecord),
}

/// Scripted product source that counts its calls
pub struct FakeSource {
    name: &'static str,
    reply: SourceReply,
    calls: AtomicU32,
}

impl FakeSource {
    pub fn new(name: &'static str, reply: SourceReply) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply,
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductSource for FakeSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_by_barcode(&self, _barcode: &str) -> AppResult<Option<ProductRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            SourceReply::Found(record) => Ok(Some(record.clone())),
            SourceReply::Missing => Ok(None),
            SourceReply::Fail(code) => Err(AppError::new(*code, format!("{} is down", self.name))),
            SourceReply::Slow(delay, record) => {
                tokio::time::sleep(*delay).await;
                Ok(Some(record.clone()))
            }
        }
    }
}

/// Scripted text search for smart-fill
pub struct FakeSearch {
    pub result: Option<ProductRecord>,
    pub fail: bool,
    pub queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub fn returning(result: Option<ProductRecord>) -> Arc<Self> {
        Arc::new(Self {
            result,
            fail: false,
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            result: None,
            fail: true,
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductSearch for FakeSearch {
    async fn search_by_name(&self, query: &str) -> AppResult<Option<ProductRecord>> {
        self.queries.lock().unwrap().push(query.to_owned());
        if self.fail {
            return Err(AppError::external_unavailable("search", "search is down"));
        }
        Ok(self.result.clone())
    }
}

// ============================================================================
// AI Collaborator
// ============================================================================

/// LLM double replying with fixed text, or failing when `reply` is `None`
pub struct ScriptedLlm {
    reply: Option<String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_owned()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn display_name(&self) -> &'static str {
        "Scripted LLM"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.as_ref().map_or_else(
            || {
                Err(AppError::external_unavailable(
                    "scripted",
                    "quota exceeded",
                ))
            },
            |content| {
                Ok(ChatResponse {
                    content: content.clone(),
                    model: "scripted-model".to_owned(),
                    usage: None,
                    finish_reason: Some("STOP".to_owned()),
                })
            },
        )
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(self.reply.is_some())
    }
}

// ============================================================================
// Store
// ============================================================================

/// Store whose every operation fails
pub struct FailingStore;

fn offline() -> AppError {
    AppError::database("store offline")
}

#[async_trait]
impl ProductStore for FailingStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn find_by_barcode(&self, _barcode: &str) -> AppResult<Option<ProductRecord>> {
        Err(offline())
    }

    async fn upsert(&self, _record: &ProductRecord) -> AppResult<()> {
        Err(offline())
    }

    async fn insert(&self, _record: &ProductRecord) -> AppResult<()> {
        Err(offline())
    }

    async fn delete(&self, _barcode: &str) -> AppResult<bool> {
        Err(offline())
    }

    async fn search_by_name(&self, _keyword: &str, _limit: u32) -> AppResult<Vec<ProductRecord>> {
        Err(offline())
    }

    async fn list_by_status(&self, _status: ProductStatus) -> AppResult<Vec<ProductRecord>> {
        Err(offline())
    }

    async fn healthy_alternatives(&self, _limit: u32) -> AppResult<Vec<ProductRecord>> {
        Err(offline())
    }

    async fn trending(&self, _limit: u32) -> AppResult<Vec<ProductRecord>> {
        Err(offline())
    }

    async fn record_scan(&self, _scan: &ScanRecord) -> AppResult<()> {
        Err(offline())
    }

    async fn scans_for_user(&self, _user_id: &str, _limit: u32) -> AppResult<Vec<ScanRecord>> {
        Err(offline())
    }
}
