// ABOUTME: Tattvam CLI - command-line front end for the nutrition label scanning core
// ABOUTME: Looks up and grades barcodes, manages the review queue, asks the AI advisor, and shows scan history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Resolve a barcode through the store and the external sources
//! tattvam-cli lookup 8901058851298 --user alice
//!
//! # Grade a product record JSON file offline
//! tattvam-cli analyze --file product.json --json
//!
//! # Submit a product and approve it
//! tattvam-cli submit --barcode 123 --name "Masala Oats" --ingredients "oats, salt, spices"
//! tattvam-cli approve 123 --brand "Saffola"
//!
//! # Ask the AI advisor about a stored product
//! tattvam-cli ask 123 "Is this good for breakfast?"
//!
//! # Scan history with analytics
//! tattvam-cli history alice --summary
//! ```

mod commands;
mod helpers;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tattvam::constants::limits;
use tattvam::logging::LoggingConfig;
use tattvam::models::{NewProduct, NutrientValues, ProductEdits};
use tracing::debug;

use helpers::context::CliContext;

#[derive(Parser)]
#[command(
    name = "tattvam-cli",
    about = "Tattvam nutrition label scanner",
    long_about = "Resolve barcodes, grade products A to E, review submissions, and inspect scan history."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override (sqlite:path, sqlite::memory:, or memory://)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Resolve a barcode into a graded product
    Lookup {
        /// Product barcode
        barcode: String,

        /// Record the scan in this user's history
        #[arg(long)]
        user: Option<String>,
    },

    /// Grade a product record JSON file without network or store access
    Analyze {
        /// Path to a product record JSON file
        #[arg(long)]
        file: PathBuf,
    },

    /// Submit a product for review
    Submit(SubmitArgs),

    /// List submissions awaiting review
    Pending,

    /// Approve a submission, storing its calculator grade
    Approve(ApproveArgs),

    /// Reject a submission and remove it
    Reject {
        /// Product barcode
        barcode: String,
    },

    /// Search products by name
    Search {
        /// Case-insensitive keyword
        keyword: String,

        /// Maximum results
        #[arg(long, default_value_t = limits::SEARCH_RESULTS)]
        limit: u32,
    },

    /// List approved products graded A or B
    Alternatives {
        /// Maximum results
        #[arg(long, default_value_t = limits::HEALTHY_ALTERNATIVES)]
        limit: u32,
    },

    /// List recently updated approved products
    Trending {
        /// Maximum results
        #[arg(long, default_value_t = limits::TRENDING)]
        limit: u32,
    },

    /// Ask the AI advisor a question about a stored product
    Ask {
        /// Product barcode
        barcode: String,

        /// Free-text question
        question: String,
    },

    /// Show a user's scan history
    History {
        /// User id
        user: String,

        /// Maximum scans listed
        #[arg(long, default_value_t = limits::SCAN_HISTORY)]
        limit: u32,

        /// Include rating split, weekly trend, and achievements
        #[arg(long)]
        summary: bool,
    },
}

#[derive(Args)]
struct SubmitArgs {
    /// Product barcode (required)
    #[arg(long)]
    barcode: String,

    /// Product name (required)
    #[arg(long)]
    name: String,

    /// Brand (defaults to "Unknown")
    #[arg(long)]
    brand: Option<String>,

    /// Comma separated ingredient list
    #[arg(long)]
    ingredients: Option<String>,

    /// Category (defaults to "General")
    #[arg(long)]
    category: Option<String>,

    /// Energy per 100 g in kcal
    #[arg(long, default_value_t = 0.0)]
    calories: f64,

    /// Protein per 100 g in g
    #[arg(long, default_value_t = 0.0)]
    protein: f64,

    /// Carbohydrates per 100 g in g
    #[arg(long, default_value_t = 0.0)]
    carbs: f64,

    /// Fat per 100 g in g
    #[arg(long, default_value_t = 0.0)]
    fat: f64,

    /// Sugar per 100 g in g
    #[arg(long, default_value_t = 0.0)]
    sugar: f64,

    /// Sodium per 100 g in mg
    #[arg(long, default_value_t = 0.0)]
    sodium: f64,

    /// Submitting user id
    #[arg(long)]
    submitted_by: Option<String>,
}

#[derive(Args)]
struct ApproveArgs {
    /// Product barcode
    barcode: String,

    /// Corrected name
    #[arg(long)]
    name: Option<String>,

    /// Corrected brand
    #[arg(long)]
    brand: Option<String>,

    /// Corrected image URL
    #[arg(long)]
    image_url: Option<String>,

    /// Corrected category
    #[arg(long)]
    category: Option<String>,

    /// Corrected comma separated ingredient list
    #[arg(long)]
    ingredients: Option<String>,
}

impl ApproveArgs {
    fn into_edits(self) -> (String, ProductEdits) {
        let edits = ProductEdits {
            name: self.name,
            brand: self.brand,
            image_url: self.image_url,
            category: self.category,
            ingredients: self
                .ingredients
                .as_deref()
                .map(|text| commands::catalog::parse_ingredients(Some(text))),
            nutrition: None,
        };
        (self.barcode, edits)
    }
}

impl SubmitArgs {
    fn into_new_product(self) -> NewProduct {
        NewProduct {
            barcode: self.barcode,
            name: self.name,
            brand: self.brand,
            ingredients: commands::catalog::parse_ingredients(self.ingredients.as_deref()),
            nutrition: NutrientValues {
                calories: self.calories,
                protein: self.protein,
                carbs: self.carbs,
                fat: self.fat,
                sugar: self.sugar,
                sodium: self.sodium,
            },
            category: self.category,
            image_url: None,
            submitted_by: self.submitted_by,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::from_env();
    let logging = if cli.verbose { logging.verbose() } else { logging };
    logging.init()?;

    let ctx = CliContext::bootstrap(cli.database_url).await?;
    debug!(store = ctx.store.backend_name(), "Tattvam CLI ready");

    let json = cli.json;
    match cli.command {
        Command::Lookup { barcode, user } => {
            commands::product::lookup(&ctx, &barcode, user.as_deref(), json).await?;
        }
        Command::Analyze { file } => commands::product::analyze(&ctx, &file, json).await?,
        Command::Submit(args) => {
            commands::catalog::submit(&ctx, args.into_new_product(), json).await?;
        }
        Command::Pending => commands::catalog::pending(&ctx, json).await?,
        Command::Approve(args) => {
            let (barcode, edits) = args.into_edits();
            commands::catalog::approve(&ctx, &barcode, edits, json).await?;
        }
        Command::Reject { barcode } => commands::catalog::reject(&ctx, &barcode).await?,
        Command::Search { keyword, limit } => {
            commands::catalog::search(&ctx, &keyword, limit, json).await?;
        }
        Command::Alternatives { limit } => commands::catalog::alternatives(&ctx, limit, json).await?,
        Command::Trending { limit } => commands::catalog::trending(&ctx, limit, json).await?,
        Command::Ask { barcode, question } => {
            commands::product::ask(&ctx, &barcode, &question, json).await?;
        }
        Command::History {
            user,
            limit,
            summary,
        } => commands::scans::history(&ctx, &user, limit, summary, json).await?,
    }

    Ok(())
}
