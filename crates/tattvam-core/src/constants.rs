// ABOUTME: Grading thresholds, placeholder labels, and lookup limits for product analysis
// ABOUTME: Single source of truth for the numbers the grade calculator and services rely on
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants shared by the analysis crate, the source adapters, and the services.
//!
//! All nutrient values are per 100 g (or 100 ml for beverages). Sodium is in mg,
//! everything else in g except energy, which is in kcal.

/// Beverage detection and sugar thresholds
pub mod beverage {
    /// A product is a beverage candidate only below this energy value (kcal)
    pub const MAX_CALORIES: f64 = 80.0;
    /// The first ingredient must contain this word for the beverage branch
    pub const WATER_KEYWORD: &str = "water";
    /// Sugar above this is graded E
    pub const SUGAR_E: f64 = 9.0;
    /// Sugar above this is graded D
    pub const SUGAR_D: f64 = 6.0;
    /// Sugar above this is graded C
    pub const SUGAR_C: f64 = 2.5;
    /// Any sugar above this is graded B
    pub const SUGAR_B: f64 = 0.0;
}

/// Solid food penalty point rules
pub mod food {
    /// Energy (kcal) above which 4 points are added
    pub const CALORIES_HIGH: f64 = 475.0;
    /// Energy (kcal) above which 2 points are added
    pub const CALORIES_MEDIUM: f64 = 350.0;
    /// Sugar (g) above which 4 points are added
    pub const SUGAR_HIGH: f64 = 25.0;
    /// Sugar (g) above which 2 points are added
    pub const SUGAR_MEDIUM: f64 = 15.0;
    /// Fat (g) above which 3 points are added
    pub const FAT_HIGH: f64 = 20.0;
    /// Fat (g) above which 1 point is added
    pub const FAT_MEDIUM: f64 = 10.0;
    /// Sodium (mg) above which 5 points are added
    pub const SODIUM_HIGH: f64 = 1200.0;
    /// Sodium (mg) above which 3 points are added
    pub const SODIUM_MEDIUM: f64 = 600.0;

    /// Points for high energy
    pub const CALORIES_HIGH_POINTS: u32 = 4;
    /// Points for medium energy
    pub const CALORIES_MEDIUM_POINTS: u32 = 2;
    /// Points for high sugar
    pub const SUGAR_HIGH_POINTS: u32 = 4;
    /// Points for medium sugar
    pub const SUGAR_MEDIUM_POINTS: u32 = 2;
    /// Points for high fat
    pub const FAT_HIGH_POINTS: u32 = 3;
    /// Points for medium fat
    pub const FAT_MEDIUM_POINTS: u32 = 1;
    /// Points for high sodium
    pub const SODIUM_HIGH_POINTS: u32 = 5;
    /// Points for medium sodium
    pub const SODIUM_MEDIUM_POINTS: u32 = 3;

    /// Minimum points for grade E
    pub const GRADE_E_POINTS: u32 = 9;
    /// Minimum points for grade D
    pub const GRADE_D_POINTS: u32 = 6;
    /// Minimum points for grade C
    pub const GRADE_C_POINTS: u32 = 3;
    /// Minimum points for grade B
    pub const GRADE_B_POINTS: u32 = 1;
}

/// Nutrient threshold warnings attached to the product view
pub mod nutrient_warnings {
    /// Sugar (g) above which the sugar warning is raised
    pub const SUGAR_LIMIT: f64 = 22.5;
    /// Fat (g) above which the fat warning is raised
    pub const FAT_LIMIT: f64 = 17.5;
    /// Sodium (mg) above which the salt warning is raised (1.5 g salt)
    pub const SODIUM_LIMIT_MG: f64 = 600.0;
    /// Salt (g) above which a source adapter raises the salt warning
    pub const SALT_LIMIT_G: f64 = 1.5;

    /// Warning text for high sugar
    pub const HIGH_SUGAR: &str = "High in sugar.";
    /// Warning text for high fat
    pub const HIGH_FAT: &str = "High in fat.";
    /// Warning text for high salt
    pub const HIGH_SALT: &str = "High in salt.";
}

/// Rating bands used by scan analytics
pub mod rating_bands {
    /// Scans rated at or above this are healthy
    pub const HEALTHY_MIN: f64 = 4.0;
    /// Scans rated at or above this (and below healthy) are moderate
    pub const MODERATE_MIN: f64 = 2.5;
}

/// Fixed labels used when data is missing
pub mod labels {
    /// Placeholder name for empty or malformed ingredient entries
    pub const INVALID_INGREDIENT: &str = "Invalid Ingredient Data";
    /// Serialized form of an unknown grade
    pub const UNKNOWN_GRADE: &str = "?";
    /// Default product category
    pub const DEFAULT_CATEGORY: &str = "General";
    /// Brand used when a submission or source omits it
    pub const UNKNOWN_BRAND: &str = "Unknown";
    /// Product name used when a source omits it
    pub const UNKNOWN_NAME: &str = "Unknown";
    /// Brand used by USDA records without a brand owner
    pub const GENERIC_BRAND: &str = "Generic";
    /// Message returned when every source is exhausted
    pub const NOT_FOUND_MESSAGE: &str = "Product not found, please add it manually";
}

/// Default result sizes for listing operations
pub mod limits {
    /// Scan history entries returned per user
    pub const SCAN_HISTORY: u32 = 50;
    /// Name search results
    pub const SEARCH_RESULTS: u32 = 10;
    /// Healthy alternatives
    pub const HEALTHY_ALTERNATIVES: u32 = 4;
    /// Trending products
    pub const TRENDING: u32 = 5;
    /// Days covered by the weekly scan trend
    pub const WEEKLY_TREND_DAYS: u32 = 7;
}
