// ABOUTME: Scan history recording and per-user analytics: rating split, weekly trend, achievements
// ABOUTME: Summaries are pure functions over scan records so they can be computed for any slice of history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::constants::limits::WEEKLY_TREND_DAYS;
use crate::constants::rating_bands::{HEALTHY_MIN, MODERATE_MIN};
use crate::database::ProductStore;
use crate::errors::{AppError, AppResult};
use crate::models::{
    Achievement, DailyScanCount, ProductView, RatingSummary, ScanRecord, WeeklyTrend,
};

/// Rating split and weekly trend for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Healthy / moderate / unhealthy split over every scan
    pub rating_summary: RatingSummary,
    /// Scan counts for the last seven days
    pub weekly_trend: WeeklyTrend,
}

/// Split scans into rating bands
#[must_use]
pub fn rating_summary(scans: &[ScanRecord]) -> RatingSummary {
    scans
        .iter()
        .fold(RatingSummary::default(), |mut summary, scan| {
            if scan.rating >= HEALTHY_MIN {
                summary.healthy += 1;
            } else if scan.rating >= MODERATE_MIN {
                summary.moderate += 1;
            } else {
                summary.unhealthy += 1;
            }
            summary
        })
}

/// Per-day scan counts for the seven days ending on `today` (UTC), oldest first
#[must_use]
pub fn weekly_trend(scans: &[ScanRecord], today: NaiveDate) -> WeeklyTrend {
    let days = (0..WEEKLY_TREND_DAYS)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .map(|date| DailyScanCount {
            date,
            label: date.format("%-d %b").to_string(),
            count: 0,
        })
        .collect::<Vec<_>>();

    let mut trend = WeeklyTrend { days };
    for scan in scans {
        let scanned_on = scan.scanned_at.date_naive();
        if let Some(day) = trend.days.iter_mut().find(|day| day.date == scanned_on) {
            day.count += 1;
        }
    }
    trend
}

/// Evaluate the six scan badges
#[must_use]
pub fn achievements(scans: &[ScanRecord]) -> Vec<Achievement> {
    let scan_count = scans.len();
    let healthy = scans.iter().filter(|s| s.rating >= HEALTHY_MIN).count();
    let unhealthy = scans.iter().filter(|s| s.rating < MODERATE_MIN).count();
    let brands = scans
        .iter()
        .map(|s| s.product_brand.as_str())
        .collect::<HashSet<_>>()
        .len();

    [
        (1, "First Scan", "Scan your first item", scan_count > 0),
        (2, "5 Scans", "Scan 5 different items", scan_count >= 5),
        (3, "Health Starter", "Scan a healthy item", healthy > 0),
        (4, "Variety Scanner", "Scan 3+ different brands", brands >= 3),
        (5, "Health Nut", "Scan 5 healthy items", healthy >= 5),
        (6, "Curious Cat", "Scan an unhealthy item", unhealthy > 0),
    ]
    .into_iter()
    .map(|(id, title, description, earned)| Achievement {
        id,
        title: title.to_owned(),
        description: description.to_owned(),
        earned,
    })
    .collect()
}

/// Scan history backed by the product store
#[derive(Clone)]
pub struct ScanAnalytics {
    store: Arc<dyn ProductStore>,
}

impl ScanAnalytics {
    /// Create the service
    #[must_use]
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// Record that `user_id` scanned the product in `view`
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for an empty user id and a database
    /// error when the scan cannot be stored
    #[instrument(skip(self, view), fields(barcode = %view.barcode))]
    pub async fn record_scan(&self, user_id: &str, view: &ProductView) -> AppResult<ScanRecord> {
        if user_id.trim().is_empty() {
            return Err(AppError::missing_field("user_id"));
        }
        let scan = ScanRecord::from_view(user_id.trim(), view);
        self.store.record_scan(&scan).await?;
        Ok(scan)
    }

    /// A user's most recent scans, newest first
    ///
    /// # Errors
    ///
    /// Returns a database error when the store cannot be read
    pub async fn history(&self, user_id: &str, limit: u32) -> AppResult<Vec<ScanRecord>> {
        self.store.scans_for_user(user_id, limit).await
    }

    /// Rating split over every scan and the trend for the week ending `today`
    ///
    /// # Errors
    ///
    /// Returns a database error when the store cannot be read
    pub async fn summary(&self, user_id: &str, today: NaiveDate) -> AppResult<AnalyticsSummary> {
        let scans = self.store.scans_for_user(user_id, u32::MAX).await?;
        Ok(AnalyticsSummary {
            rating_summary: rating_summary(&scans),
            weekly_trend: weekly_trend(&scans, today),
        })
    }

    /// Badges earned by a user
    ///
    /// # Errors
    ///
    /// Returns a database error when the store cannot be read
    pub async fn achievements(&self, user_id: &str) -> AppResult<Vec<Achievement>> {
        let scans = self.store.scans_for_user(user_id, u32::MAX).await?;
        Ok(achievements(&scans))
    }
}
