// ABOUTME: Scan history entries and the analytics summaries derived from them
// ABOUTME: ScanRecord, RatingSummary, WeeklyTrend, DailyScanCount, and Achievement definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{NutriScore, ProductView};

/// One product scan by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Unique scan id
    pub id: String,
    /// Caller id supplied by the auth collaborator
    pub user_id: String,
    /// Scanned barcode
    pub barcode: String,
    /// Product name at scan time
    pub product_name: String,
    /// Product brand at scan time
    pub product_brand: String,
    /// Grade at scan time
    pub nutri_score: Option<NutriScore>,
    /// Rating at scan time
    pub rating: f64,
    /// Scan timestamp
    pub scanned_at: DateTime<Utc>,
}

impl ScanRecord {
    /// Build a scan entry from a resolved product view
    #[must_use]
    pub fn from_view(user_id: impl Into<String>, view: &ProductView) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            barcode: view.barcode.clone(),
            product_name: view.name.clone(),
            product_brand: view.brand.clone(),
            nutri_score: Some(view.nutri_score),
            rating: view.rating,
            scanned_at: Utc::now(),
        }
    }
}

/// Healthy / moderate / unhealthy split of a user's scans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSummary {
    /// Scans rated 4.0 or above
    pub healthy: u32,
    /// Scans rated 2.5 up to 4.0
    pub moderate: u32,
    /// Scans rated below 2.5
    pub unhealthy: u32,
}

/// Scan count for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyScanCount {
    /// Calendar day (UTC)
    pub date: NaiveDate,
    /// Short label such as `"19 Oct"`
    pub label: String,
    /// Number of scans on that day
    pub count: u32,
}

/// Per-day scan counts, oldest day first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTrend {
    /// One entry per day
    pub days: Vec<DailyScanCount>,
}

impl WeeklyTrend {
    /// Total scans in the window
    #[must_use]
    pub fn total(&self) -> u32 {
        self.days.iter().map(|day| day.count).sum()
    }
}

/// Achievement badge and whether the user has earned it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Stable badge id
    pub id: u32,
    /// Badge title
    pub title: String,
    /// What the user must do
    pub description: String,
    /// Whether the badge is earned
    pub earned: bool,
}
