// ABOUTME: Smart-fill enrichment for records missing an image or nutrition data
// ABOUTME: Runs a name and brand text search on the primary source and adopts what the record lacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Duration;

use tattvam_providers::ProductSearch;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::models::ProductRecord;

/// Fills gaps in a resolved record from a text search
#[derive(Clone)]
pub struct SmartFill {
    search: Arc<dyn ProductSearch>,
    timeout: Duration,
}

impl SmartFill {
    /// Create a smart-fill step over `search`, bounded by `timeout`
    #[must_use]
    pub fn new(search: Arc<dyn ProductSearch>, timeout: Duration) -> Self {
        Self { search, timeout }
    }

    /// Search query for a record: `"{name} {brand}"`
    #[must_use]
    pub fn query_for(record: &ProductRecord) -> String {
        format!("{} {}", record.name.trim(), record.brand.trim())
            .trim()
            .to_owned()
    }

    /// Enrich `record` in place, returning whether anything was adopted
    ///
    /// Search errors and timeouts are logged and leave the record unchanged.
    pub async fn fill(&self, record: &mut ProductRecord) -> bool {
        if !record.needs_smart_fill() {
            return false;
        }
        let query = Self::query_for(record);
        if query.is_empty() {
            return false;
        }

        let found = match timeout(self.timeout, self.search.search_by_name(&query)).await {
            Ok(Ok(Some(found))) => found,
            Ok(Ok(None)) => {
                debug!(query = %query, "Smart-fill search found nothing");
                return false;
            }
            Ok(Err(e)) => {
                warn!(query = %query, error = %e, "Smart-fill search failed");
                return false;
            }
            Err(_) => {
                warn!(query = %query, timeout_secs = self.timeout.as_secs(), "Smart-fill search timed out");
                return false;
            }
        };

        adopt_missing(record, &found)
    }
}

/// Copy the image when `record` has none, and nutrition when `record` has none
pub fn adopt_missing(record: &mut ProductRecord, found: &ProductRecord) -> bool {
    let mut changed = false;
    if !record.has_image() && found.has_image() {
        record.image_url.clone_from(&found.image_url);
        changed = true;
    }
    if record.nutrition.is_empty() && !found.nutrition.is_empty() {
        record.nutrition = found.nutrition;
        changed = true;
    }
    changed
}
