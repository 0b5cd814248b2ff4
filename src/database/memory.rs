// ABOUTME: In-process product store backed by sharded DashMap tables
// ABOUTME: Used for tests and the memory:// database URL; nothing survives the process
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::ProductStore;
use crate::errors::{AppError, AppResult};
use crate::models::{NutriScore, ProductRecord, ProductStatus, ScanRecord};

/// Process-local product store
///
/// Products are keyed by barcode; scans are kept per user in insertion order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    products: Arc<DashMap<String, ProductRecord>>,
    scans: Arc<DashMap<String, Vec<ScanRecord>>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored products
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// True when no products are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn collect_where(&self, keep: impl Fn(&ProductRecord) -> bool) -> Vec<ProductRecord> {
        self.products
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_by_barcode(&self, barcode: &str) -> AppResult<Option<ProductRecord>> {
        Ok(self.products.get(barcode).map(|entry| entry.value().clone()))
    }

    async fn upsert(&self, record: &ProductRecord) -> AppResult<()> {
        self.products.insert(record.barcode.clone(), record.clone());
        Ok(())
    }

    async fn insert(&self, record: &ProductRecord) -> AppResult<()> {
        match self.products.entry(record.barcode.clone()) {
            Entry::Occupied(_) => Err(AppError::already_exists(format!(
                "Product {}",
                record.barcode
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn delete(&self, barcode: &str) -> AppResult<bool> {
        Ok(self.products.remove(barcode).is_some())
    }

    async fn search_by_name(&self, keyword: &str, limit: u32) -> AppResult<Vec<ProductRecord>> {
        let needle = keyword.trim().to_lowercase();
        let mut found = self.collect_where(|record| record.name.to_lowercase().contains(&needle));
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn list_by_status(&self, status: ProductStatus) -> AppResult<Vec<ProductRecord>> {
        let mut found = self.collect_where(|record| record.status == status);
        found.sort_by_key(|record| record.updated_at);
        Ok(found)
    }

    async fn healthy_alternatives(&self, limit: u32) -> AppResult<Vec<ProductRecord>> {
        let mut found = self.collect_where(|record| {
            record.status == ProductStatus::Approved
                && matches!(record.nutri_score, Some(NutriScore::A | NutriScore::B))
        });
        found.sort_by_key(|record| (record.nutri_score, Reverse(record.updated_at)));
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn trending(&self, limit: u32) -> AppResult<Vec<ProductRecord>> {
        let mut found = self.collect_where(|record| record.status == ProductStatus::Approved);
        found.sort_by_key(|record| Reverse(record.updated_at));
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn record_scan(&self, scan: &ScanRecord) -> AppResult<()> {
        self.scans
            .entry(scan.user_id.clone())
            .or_default()
            .push(scan.clone());
        Ok(())
    }

    async fn scans_for_user(&self, user_id: &str, limit: u32) -> AppResult<Vec<ScanRecord>> {
        let mut scans = self
            .scans
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        scans.sort_by_key(|scan| Reverse(scan.scanned_at));
        scans.truncate(limit as usize);
        Ok(scans)
    }
}
