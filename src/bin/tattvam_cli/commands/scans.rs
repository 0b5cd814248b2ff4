// ABOUTME: Scan history command for tattvam-cli
// ABOUTME: Lists a user's recent scans and optionally the rating split, weekly trend, and badges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use chrono::Utc;
use serde_json::json;

use crate::helpers::context::CliContext;
use crate::helpers::display::{display_scans, display_summary, print_json};

pub async fn history(
    ctx: &CliContext,
    user_id: &str,
    limit: u32,
    summary: bool,
    json: bool,
) -> Result<()> {
    let analytics = ctx.analytics();
    let scans = analytics.history(user_id, limit).await?;

    if !summary {
        return if json {
            print_json(&scans)
        } else {
            display_scans(user_id, &scans);
            Ok(())
        };
    }

    let stats = analytics.summary(user_id, Utc::now().date_naive()).await?;
    let achievements = analytics.achievements(user_id).await?;
    if json {
        print_json(&json!({
            "scans": scans,
            "summary": stats,
            "achievements": achievements,
        }))
    } else {
        display_scans(user_id, &scans);
        display_summary(&stats, &achievements);
        Ok(())
    }
}
