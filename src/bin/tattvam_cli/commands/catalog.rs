// ABOUTME: Catalog commands for tattvam-cli: submissions, review, search, and product lists
// ABOUTME: Thin wrappers over ProductCatalog with text or JSON output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use tattvam::models::{NewProduct, ProductEdits, ProductRecord, ProductView};
use tracing::info;

use crate::helpers::context::CliContext;
use crate::helpers::display::{display_view, display_views, print_json};

fn show_one(view: &ProductView, json: bool) -> Result<()> {
    if json {
        print_json(view)
    } else {
        display_view(view);
        Ok(())
    }
}

fn show_many(title: &str, views: &[ProductView], json: bool) -> Result<()> {
    if json {
        print_json(views)
    } else {
        display_views(title, views);
        Ok(())
    }
}

/// Submit a product for review
pub async fn submit(ctx: &CliContext, product: NewProduct, json: bool) -> Result<()> {
    let view = ctx.catalog().submit(product).await?;
    info!(barcode = %view.barcode, "Product submitted for review");
    show_one(&view, json)
}

/// Split a comma separated ingredient argument
pub fn parse_ingredients(text: Option<&str>) -> Vec<String> {
    text.map(ProductRecord::split_ingredient_text)
        .unwrap_or_default()
}

pub async fn pending(ctx: &CliContext, json: bool) -> Result<()> {
    let views = ctx.catalog().pending().await?;
    show_many("Pending review", &views, json)
}

/// Approve a submission after applying any reviewer corrections
pub async fn approve(
    ctx: &CliContext,
    barcode: &str,
    edits: ProductEdits,
    json: bool,
) -> Result<()> {
    let view = ctx.catalog().approve_with_edits(barcode, edits).await?;
    show_one(&view, json)
}

pub async fn reject(ctx: &CliContext, barcode: &str) -> Result<()> {
    ctx.catalog().reject(barcode).await?;
    println!("Product {barcode} rejected and removed");
    Ok(())
}

pub async fn search(ctx: &CliContext, keyword: &str, limit: u32, json: bool) -> Result<()> {
    let views = ctx.catalog().search(keyword, limit).await?;
    show_many(&format!("Results for '{keyword}'"), &views, json)
}

pub async fn alternatives(ctx: &CliContext, limit: u32, json: bool) -> Result<()> {
    let views = ctx.catalog().healthy_alternatives(limit).await?;
    show_many("Healthy alternatives", &views, json)
}

pub async fn trending(ctx: &CliContext, limit: u32, json: bool) -> Result<()> {
    let views = ctx.catalog().trending(limit).await?;
    show_many("Trending", &views, json)
}
