// ABOUTME: Product commands for tattvam-cli: barcode lookup, offline analysis, and AI questions
// ABOUTME: Lookup runs the full resolution waterfall and can record the scan for a user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::Path;

use anyhow::{Context, Result};
use tattvam::models::{GradeOrigin, ProductRecord};
use tokio::fs;
use tracing::info;

use crate::helpers::context::CliContext;
use crate::helpers::display::{display_view, print_json};

/// Resolve a barcode and optionally record the scan
pub async fn lookup(ctx: &CliContext, barcode: &str, user: Option<&str>, json: bool) -> Result<()> {
    let resolver = ctx.resolver();
    info!(sources = ?resolver.source_names(), "Resolving barcode {barcode}");
    let view = resolver.resolve(barcode).await?;

    if let Some(user_id) = user {
        let scan = ctx.analytics().record_scan(user_id, &view).await?;
        info!(scan_id = %scan.id, "Scan recorded");
    }

    if json {
        print_json(&view)
    } else {
        display_view(&view);
        Ok(())
    }
}

/// Analyze a product record JSON file without touching the store or the network
pub async fn analyze(ctx: &CliContext, file: &Path, json: bool) -> Result<()> {
    let raw = fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let record: ProductRecord = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a product record", file.display()))?;

    let origin = if record.nutri_score.is_some() {
        GradeOrigin::Source
    } else {
        GradeOrigin::Calculator
    };
    let view = ctx.analyzer.view(&record, origin);

    if json {
        print_json(&view)
    } else {
        display_view(&view);
        Ok(())
    }
}

/// Ask the AI advisor about a stored product
pub async fn ask(ctx: &CliContext, barcode: &str, question: &str, json: bool) -> Result<()> {
    let answer = ctx.advisor()?.ask(barcode, question).await?;
    if json {
        print_json(&answer)
    } else {
        println!("{}", answer.answer);
        Ok(())
    }
}
