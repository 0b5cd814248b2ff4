// ABOUTME: Product catalog and review workflow: submissions, approval, rejection, and listings
// ABOUTME: Search, healthy alternatives, and trending lists rendered as analyzed product views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use chrono::Utc;
use tattvam_analysis::HealthAnalyzer;
use tracing::{info, instrument};

use crate::database::ProductStore;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{GradeOrigin, NewProduct, ProductEdits, ProductStatus, ProductView};

/// Submission and review operations over the product store
#[derive(Clone)]
pub struct ProductCatalog {
    store: Arc<dyn ProductStore>,
    analyzer: HealthAnalyzer,
}

impl ProductCatalog {
    /// Create a catalog over `store`
    #[must_use]
    pub fn new(store: Arc<dyn ProductStore>, analyzer: HealthAnalyzer) -> Self {
        Self { store, analyzer }
    }

    /// Store a user submission as pending
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` without a name or barcode and
    /// `ResourceAlreadyExists` when the barcode is already stored
    #[instrument(skip(self, product), fields(barcode = %product.barcode))]
    pub async fn submit(&self, product: NewProduct) -> AppResult<ProductView> {
        if product.name.trim().is_empty() {
            return Err(AppError::missing_field("name"));
        }
        if product.barcode.trim().is_empty() {
            return Err(AppError::missing_field("barcode"));
        }

        let record = product.into_pending_record();
        self.store.insert(&record).await?;
        AppLogger::log_store_operation("submit", &record.barcode, true, None);
        Ok(self.analyzer.view(&record, GradeOrigin::Calculator))
    }

    /// Submissions awaiting review, oldest first
    ///
    /// # Errors
    ///
    /// Returns a database error when the store cannot be read
    pub async fn pending(&self) -> AppResult<Vec<ProductView>> {
        let records = self.store.list_by_status(ProductStatus::Pending).await?;
        Ok(self.analyzer.view_all(&records, GradeOrigin::Stored))
    }

    /// Approve a product, storing the calculator grade
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown barcode
    pub async fn approve(&self, barcode: &str) -> AppResult<ProductView> {
        self.approve_with_edits(barcode, ProductEdits::default()).await
    }

    /// Apply reviewer corrections, re-grade with the calculator, and approve
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown barcode
    #[instrument(skip(self, edits), fields(edited = !edits.is_empty()))]
    pub async fn approve_with_edits(
        &self,
        barcode: &str,
        edits: ProductEdits,
    ) -> AppResult<ProductView> {
        let mut record = self
            .store
            .find_by_barcode(barcode)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {barcode}")))?;

        edits.apply_to(&mut record);
        record.nutri_score = Some(self.analyzer.calculator_grade(&record).nutri_score);
        record.status = ProductStatus::Approved;
        record.updated_at = Utc::now();
        self.store.upsert(&record).await?;

        info!(grade = ?record.nutri_score, "Product approved");
        Ok(self.analyzer.view(&record, GradeOrigin::Calculator))
    }

    /// Reject a product, removing it from the store
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown barcode
    #[instrument(skip(self))]
    pub async fn reject(&self, barcode: &str) -> AppResult<()> {
        if self.store.delete(barcode).await? {
            info!("Product rejected and removed");
            Ok(())
        } else {
            Err(AppError::not_found(format!("Product {barcode}")))
        }
    }

    /// Case-insensitive name search across every review status
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty keyword
    pub async fn search(&self, keyword: &str, limit: u32) -> AppResult<Vec<ProductView>> {
        if keyword.trim().is_empty() {
            return Err(AppError::invalid_input("Search keyword cannot be empty"));
        }
        let records = self.store.search_by_name(keyword, limit).await?;
        Ok(self.analyzer.view_all(&records, GradeOrigin::Stored))
    }

    /// Approved products graded A or B
    ///
    /// # Errors
    ///
    /// Returns a database error when the store cannot be read
    pub async fn healthy_alternatives(&self, limit: u32) -> AppResult<Vec<ProductView>> {
        let records = self.store.healthy_alternatives(limit).await?;
        Ok(self.analyzer.view_all(&records, GradeOrigin::Stored))
    }

    /// Approved products, most recently updated first
    ///
    /// # Errors
    ///
    /// Returns a database error when the store cannot be read
    pub async fn trending(&self, limit: u32) -> AppResult<Vec<ProductView>> {
        let records = self.store.trending(limit).await?;
        Ok(self.analyzer.view_all(&records, GradeOrigin::Stored))
    }
}
