// ABOUTME: Output formatting helpers for tattvam-cli
// ABOUTME: Prints product views, scan history, and analytics either as text or as JSON on stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use serde::Serialize;
use tattvam::models::{Achievement, ProductView, Safety, ScanRecord};
use tattvam::services::AnalyticsSummary;

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print one analyzed product
pub fn display_view(view: &ProductView) {
    println!("\n{} ({})", view.name, view.brand);
    println!("{}", "=".repeat(60));
    println!("   Barcode:  {}", view.barcode);
    println!("   Category: {}", view.category);
    println!("   Status:   {}", view.status.as_str());
    println!(
        "   Grade:    {}  ({:.1}/5, {})",
        view.nutri_score,
        view.rating,
        view.grade_origin.as_str()
    );
    println!(
        "   Per 100g: {} kcal, sugar {} g, fat {} g, sodium {} mg",
        view.nutrition.calories, view.nutrition.sugar, view.nutrition.fat, view.nutrition.sodium
    );

    if !view.ingredients.is_empty() {
        println!("\n   Ingredients:");
        for ingredient in &view.ingredients {
            let marker = match ingredient.safety {
                Safety::Unhealthy => "[!]",
                Safety::Moderate => "[~]",
                Safety::Neutral => "   ",
            };
            println!("   {marker} {}", ingredient.name);
        }
    }

    if !view.warnings.is_empty() {
        println!("\n   Warnings:");
        for warning in &view.warnings {
            println!("   - {warning}");
        }
    }
}

/// Print a titled list of products, one line each
pub fn display_views(title: &str, views: &[ProductView]) {
    println!("\n{title} ({})", views.len());
    println!("{}", "=".repeat(60));
    if views.is_empty() {
        println!("   (none)");
    }
    for view in views {
        println!(
            "   {}  {:<30} {:<20} {}",
            view.nutri_score, view.name, view.brand, view.barcode
        );
    }
}

/// Print scan history, newest first
pub fn display_scans(user_id: &str, scans: &[ScanRecord]) {
    println!("\nScan history for {user_id} ({})", scans.len());
    println!("{}", "=".repeat(60));
    for scan in scans {
        let grade = scan.nutri_score.map_or("?", |g| g.as_str());
        println!(
            "   {}  {grade}  {:<30} {}",
            scan.scanned_at.format("%Y-%m-%d %H:%M"),
            scan.product_name,
            scan.barcode
        );
    }
}

/// Print the rating split, weekly trend, and badges
pub fn display_summary(summary: &AnalyticsSummary, achievements: &[Achievement]) {
    let ratings = summary.rating_summary;
    println!("\nRatings");
    println!(
        "   healthy {}  moderate {}  unhealthy {}",
        ratings.healthy, ratings.moderate, ratings.unhealthy
    );

    println!("\nLast 7 days ({} scans)", summary.weekly_trend.total());
    for day in &summary.weekly_trend.days {
        println!("   {:<7} {}", day.label, "#".repeat(day.count as usize));
    }

    println!("\nAchievements");
    for badge in achievements {
        let mark = if badge.earned { "x" } else { " " };
        println!("   [{mark}] {} - {}", badge.title, badge.description);
    }
}
