// ABOUTME: Tests for scan history, the rating split, the weekly trend, and achievements
// ABOUTME: Pure analytics functions are checked directly and through the store-backed service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use tattvam::errors::ErrorCode;
use tattvam::models::{GradeOrigin, NutriScore, RatingSummary, ScanRecord};
use tattvam::services::analytics::{achievements, rating_summary, weekly_trend};
use tattvam::services::ScanAnalytics;

fn scan(brand: &str, rating: f64, day: u32) -> ScanRecord {
    ScanRecord {
        id: format!("{brand}-{rating}-{day}"),
        user_id: "alice".to_owned(),
        barcode: format!("{brand}-{day}"),
        product_name: "Item".to_owned(),
        product_brand: brand.to_owned(),
        nutri_score: None,
        rating,
        scanned_at: Utc.with_ymd_and_hms(2025, 10, day, 9, 30, 0).unwrap(),
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 19).unwrap()
}

#[test]
fn test_rating_summary_bands() {
    let scans = vec![
        scan("a", 5.0, 19),
        scan("a", 4.0, 19),
        scan("b", 3.0, 18),
        scan("b", 2.5, 18),
        scan("c", 2.0, 17),
        scan("c", 1.0, 17),
    ];
    assert_eq!(
        rating_summary(&scans),
        RatingSummary {
            healthy: 2,
            moderate: 2,
            unhealthy: 2
        }
    );
    assert_eq!(rating_summary(&[]), RatingSummary::default());
}

#[test]
fn test_weekly_trend_covers_seven_days_oldest_first() {
    let scans = vec![
        scan("a", 5.0, 19),
        scan("a", 5.0, 19),
        scan("b", 3.0, 13),
        // Outside the window
        scan("c", 1.0, 12),
    ];
    let trend = weekly_trend(&scans, today());

    assert_eq!(trend.days.len(), 7);
    assert_eq!(trend.days[0].date, NaiveDate::from_ymd_opt(2025, 10, 13).unwrap());
    assert_eq!(trend.days[0].label, "13 Oct");
    assert_eq!(trend.days[0].count, 1);
    assert_eq!(trend.days[6].label, "19 Oct");
    assert_eq!(trend.days[6].count, 2);
    assert_eq!(trend.total(), 3);
}

#[test]
fn test_weekly_trend_empty_history() {
    let trend = weekly_trend(&[], today());
    assert_eq!(trend.days.len(), 7);
    assert_eq!(trend.total(), 0);
}

#[test]
fn test_achievements() {
    let earned = |scans: &[ScanRecord]| -> Vec<u32> {
        achievements(scans)
            .into_iter()
            .filter(|a| a.earned)
            .map(|a| a.id)
            .collect()
    };

    let badges = achievements(&[]);
    assert_eq!(badges.len(), 6);
    assert_eq!(badges[3].title, "Variety Scanner");
    assert!(earned(&[]).is_empty());

    assert_eq!(earned(&[scan("a", 1.0, 1)]), vec![1, 6]);
    assert_eq!(earned(&[scan("a", 4.0, 1)]), vec![1, 3]);

    let varied = vec![
        scan("a", 5.0, 1),
        scan("b", 5.0, 2),
        scan("c", 5.0, 3),
        scan("d", 5.0, 4),
        scan("e", 5.0, 5),
    ];
    assert_eq!(earned(&varied), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_service_records_and_reads_history() {
    let analytics = ScanAnalytics::new(common::memory_store());
    let analyzer = common::analyzer();

    let healthy = analyzer.view(&common::graded(common::oats("1"), NutriScore::A), GradeOrigin::Stored);
    let unhealthy = analyzer.view(&common::noodles("2"), GradeOrigin::Stored);

    let scan = analytics.record_scan(" alice ", &healthy).await.unwrap();
    assert_eq!(scan.user_id, "alice");
    assert_eq!(scan.nutri_score, Some(NutriScore::A));
    analytics.record_scan("alice", &unhealthy).await.unwrap();

    let history = analytics.history("alice", 10).await.unwrap();
    assert_eq!(history.len(), 2);

    let summary = analytics
        .summary("alice", Utc::now().date_naive())
        .await
        .unwrap();
    assert_eq!(summary.rating_summary.healthy, 1);
    assert_eq!(summary.rating_summary.unhealthy, 1);
    assert_eq!(summary.weekly_trend.total(), 2);

    let badges = analytics.achievements("alice").await.unwrap();
    let earned: Vec<u32> = badges.iter().filter(|a| a.earned).map(|a| a.id).collect();
    assert_eq!(earned, vec![1, 3, 6]);

    let json = serde_json::to_value(&summary).unwrap();
    assert!(json.get("ratingSummary").is_some());
    assert!(json.get("weeklyTrend").is_some());
}

#[tokio::test]
async fn test_service_requires_user() {
    let analytics = ScanAnalytics::new(common::memory_store());
    let view = common::analyzer().view(&common::oats("1"), GradeOrigin::Calculator);

    let err = analytics.record_scan("  ", &view).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
}
