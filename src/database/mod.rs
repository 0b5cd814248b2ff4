// ABOUTME: Product store abstraction with SQLite and in-process implementations
// ABOUTME: Persists product records by barcode and per-user scan history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Product Store
//!
//! The store is a plain adapter behind [`ProductStore`]. Records are written
//! as they come from a source or a submission; ingredient tags, warnings, and
//! calculator grades are never persisted.

/// Process-local store on `DashMap`
pub mod memory;
/// `SQLite` store on sqlx
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::config::DatabaseUrl;
use crate::errors::AppResult;
use crate::models::{ProductRecord, ProductStatus, ScanRecord};

/// Persistence contract for products and scans
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Fetch a product by barcode
    async fn find_by_barcode(&self, barcode: &str) -> AppResult<Option<ProductRecord>>;

    /// Insert or replace the product with the same barcode
    async fn upsert(&self, record: &ProductRecord) -> AppResult<()>;

    /// Insert a new product
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` when the barcode is taken
    async fn insert(&self, record: &ProductRecord) -> AppResult<()>;

    /// Remove a product, returning whether it existed
    async fn delete(&self, barcode: &str) -> AppResult<bool>;

    /// Case-insensitive substring search on product names
    async fn search_by_name(&self, keyword: &str, limit: u32) -> AppResult<Vec<ProductRecord>>;

    /// Products in the given review status, oldest update first
    async fn list_by_status(&self, status: ProductStatus) -> AppResult<Vec<ProductRecord>>;

    /// Approved products graded A or B
    async fn healthy_alternatives(&self, limit: u32) -> AppResult<Vec<ProductRecord>>;

    /// Approved products, most recently updated first
    async fn trending(&self, limit: u32) -> AppResult<Vec<ProductRecord>>;

    /// Append a scan to a user's history
    async fn record_scan(&self, scan: &ScanRecord) -> AppResult<()>;

    /// A user's scans, newest first
    async fn scans_for_user(&self, user_id: &str, limit: u32) -> AppResult<Vec<ScanRecord>>;
}

/// Open the store named by `url`
///
/// # Errors
///
/// Returns a database error when the `SQLite` file cannot be opened or migrated
pub async fn create_store(url: &DatabaseUrl) -> AppResult<Arc<dyn ProductStore>> {
    match url {
        DatabaseUrl::InProcess => Ok(Arc::new(MemoryStore::new())),
        DatabaseUrl::SQLite { .. } | DatabaseUrl::Memory => {
            Ok(Arc::new(SqliteStore::new(&url.to_connection_string()).await?))
        }
    }
}
