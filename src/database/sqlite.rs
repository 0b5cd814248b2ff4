// ABOUTME: SQLite product store using sqlx with inline migrations
// ABOUTME: Upserts products by barcode with ON CONFLICT and keeps scan history in its own table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tokio::fs;

use super::ProductStore;
use crate::errors::{AppError, AppResult};
use crate::models::{NutriScore, NutrientValues, ProductRecord, ProductStatus, ScanRecord};

const PRODUCT_COLUMNS: &str = "barcode, name, brand, image_url, category, ingredients, \
     calories, protein, carbs, fat, sugar, sodium, nutri_score, source_warnings, status, \
     submitted_by, updated_at";

/// `SQLite` product store
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect and run migrations
    ///
    /// File databases are created when missing. `sqlite::memory:` uses a
    /// single connection so every query sees the same database.
    ///
    /// # Errors
    ///
    /// Returns a database error when the connection or a migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let is_memory = database_url.contains(":memory:");
        if !is_memory {
            ensure_parent_dir(database_url).await?;
        }

        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if is_memory || database_url.contains('?') {
            database_url.to_owned()
        } else {
            format!("{database_url}?mode=rwc")
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(if is_memory { 1 } else { 5 })
            .connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open {database_url}: {e}")))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create tables and indexes
    ///
    /// # Errors
    ///
    /// Returns a database error when a statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS products (
                barcode TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                brand TEXT NOT NULL DEFAULT 'Unknown',
                image_url TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT 'General',
                ingredients TEXT NOT NULL DEFAULT '[]',
                calories REAL NOT NULL DEFAULT 0,
                protein REAL NOT NULL DEFAULT 0,
                carbs REAL NOT NULL DEFAULT 0,
                fat REAL NOT NULL DEFAULT 0,
                sugar REAL NOT NULL DEFAULT 0,
                sodium REAL NOT NULL DEFAULT 0,
                nutri_score TEXT,
                source_warnings TEXT NOT NULL DEFAULT '[]',
                status TEXT NOT NULL DEFAULT 'approved' CHECK (status IN ('approved', 'pending', 'rejected')),
                submitted_by TEXT,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create products table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS scans (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                barcode TEXT NOT NULL,
                product_name TEXT NOT NULL,
                product_brand TEXT NOT NULL,
                nutri_score TEXT,
                rating REAL NOT NULL,
                scanned_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create scans table: {e}")))?;

        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_products_status_updated ON products(status, updated_at)",
            "CREATE INDEX IF NOT EXISTS idx_scans_user_time ON scans(user_id, scanned_at)",
        ] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to create index: {e}")))?;
        }

        Ok(())
    }

    fn row_to_product(row: &SqliteRow) -> AppResult<ProductRecord> {
        let ingredients: String = row.try_get("ingredients")?;
        let source_warnings: String = row.try_get("source_warnings")?;
        let nutri_score: Option<String> = row.try_get("nutri_score")?;
        let status: String = row.try_get("status")?;

        Ok(ProductRecord {
            barcode: row.try_get("barcode")?,
            name: row.try_get("name")?,
            brand: row.try_get("brand")?,
            image_url: row.try_get("image_url")?,
            category: row.try_get("category")?,
            ingredients: serde_json::from_str(&ingredients).unwrap_or_default(),
            nutrition: NutrientValues {
                calories: row.try_get("calories")?,
                protein: row.try_get("protein")?,
                carbs: row.try_get("carbs")?,
                fat: row.try_get("fat")?,
                sugar: row.try_get("sugar")?,
                sodium: row.try_get("sodium")?,
            },
            nutri_score: nutri_score.as_deref().and_then(NutriScore::parse),
            source_warnings: serde_json::from_str(&source_warnings).unwrap_or_default(),
            status: ProductStatus::parse(&status),
            submitted_by: row.try_get("submitted_by")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }

    fn row_to_scan(row: &SqliteRow) -> AppResult<ScanRecord> {
        let nutri_score: Option<String> = row.try_get("nutri_score")?;
        Ok(ScanRecord {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            barcode: row.try_get("barcode")?,
            product_name: row.try_get("product_name")?,
            product_brand: row.try_get("product_brand")?,
            nutri_score: nutri_score.as_deref().and_then(NutriScore::parse),
            rating: row.try_get("rating")?,
            scanned_at: row.try_get("scanned_at")?,
        })
    }

    async fn query_products(
        &self,
        sql: &str,
        binds: &[&str],
        limit: Option<u32>,
        context: &str,
    ) -> AppResult<Vec<ProductRecord>> {
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(*value);
        }
        if let Some(limit) = limit {
            query = query.bind(i64::from(limit));
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to {context}: {e}")))?;
        rows.iter().map(Self::row_to_product).collect()
    }
}

async fn ensure_parent_dir(database_url: &str) -> AppResult<()> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(|e| {
            AppError::database(format!("Failed to create {}: {e}", parent.display()))
        })?;
    }
    Ok(())
}

fn to_json(values: &[String]) -> AppResult<String> {
    Ok(serde_json::to_string(values)?)
}

/// Escape `LIKE` wildcards in user input
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl ProductStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn find_by_barcode(&self, barcode: &str) -> AppResult<Option<ProductRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = $1"
        ))
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load product {barcode}: {e}")))?;

        row.as_ref().map(Self::row_to_product).transpose()
    }

    async fn upsert(&self, record: &ProductRecord) -> AppResult<()> {
        sqlx::query(&format!(
            r"
            INSERT INTO products ({PRODUCT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT(barcode) DO UPDATE SET
                name = excluded.name,
                brand = excluded.brand,
                image_url = excluded.image_url,
                category = excluded.category,
                ingredients = excluded.ingredients,
                calories = excluded.calories,
                protein = excluded.protein,
                carbs = excluded.carbs,
                fat = excluded.fat,
                sugar = excluded.sugar,
                sodium = excluded.sodium,
                nutri_score = excluded.nutri_score,
                source_warnings = excluded.source_warnings,
                status = excluded.status,
                submitted_by = excluded.submitted_by,
                updated_at = excluded.updated_at
            "
        ))
        .bind(&record.barcode)
        .bind(&record.name)
        .bind(&record.brand)
        .bind(&record.image_url)
        .bind(&record.category)
        .bind(to_json(&record.ingredients)?)
        .bind(record.nutrition.calories)
        .bind(record.nutrition.protein)
        .bind(record.nutrition.carbs)
        .bind(record.nutrition.fat)
        .bind(record.nutrition.sugar)
        .bind(record.nutrition.sodium)
        .bind(record.nutri_score.map(|g| g.as_str()))
        .bind(to_json(&record.source_warnings)?)
        .bind(record.status.as_str())
        .bind(record.submitted_by.as_deref())
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert product {}: {e}", record.barcode)))?;

        Ok(())
    }

    async fn insert(&self, record: &ProductRecord) -> AppResult<()> {
        let result = sqlx::query(&format!(
            r"
            INSERT INTO products ({PRODUCT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT(barcode) DO NOTHING
            "
        ))
        .bind(&record.barcode)
        .bind(&record.name)
        .bind(&record.brand)
        .bind(&record.image_url)
        .bind(&record.category)
        .bind(to_json(&record.ingredients)?)
        .bind(record.nutrition.calories)
        .bind(record.nutrition.protein)
        .bind(record.nutrition.carbs)
        .bind(record.nutrition.fat)
        .bind(record.nutrition.sugar)
        .bind(record.nutrition.sodium)
        .bind(record.nutri_score.map(|g| g.as_str()))
        .bind(to_json(&record.source_warnings)?)
        .bind(record.status.as_str())
        .bind(record.submitted_by.as_deref())
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert product {}: {e}", record.barcode)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::already_exists(format!("Product {}", record.barcode)));
        }
        Ok(())
    }

    async fn delete(&self, barcode: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE barcode = $1")
            .bind(barcode)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete product {barcode}: {e}")))?;
        Ok(result.rows_affected() > 0)
    }

    async fn search_by_name(&self, keyword: &str, limit: u32) -> AppResult<Vec<ProductRecord>> {
        let pattern = like_pattern(keyword.trim());
        self.query_products(
            &format!(
                "SELECT {PRODUCT_COLUMNS} FROM products \
                 WHERE name LIKE $1 ESCAPE '\\' \
                 ORDER BY name LIMIT $2"
            ),
            &[&pattern],
            Some(limit),
            "search products",
        )
        .await
    }

    async fn list_by_status(&self, status: ProductStatus) -> AppResult<Vec<ProductRecord>> {
        self.query_products(
            &format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE status = $1 ORDER BY updated_at ASC"
            ),
            &[status.as_str()],
            None,
            "list products by status",
        )
        .await
    }

    async fn healthy_alternatives(&self, limit: u32) -> AppResult<Vec<ProductRecord>> {
        self.query_products(
            &format!(
                "SELECT {PRODUCT_COLUMNS} FROM products \
                 WHERE status = 'approved' AND nutri_score IN ('A', 'B') \
                 ORDER BY nutri_score ASC, updated_at DESC LIMIT $1"
            ),
            &[],
            Some(limit),
            "list healthy alternatives",
        )
        .await
    }

    async fn trending(&self, limit: u32) -> AppResult<Vec<ProductRecord>> {
        self.query_products(
            &format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE status = 'approved' \
                 ORDER BY updated_at DESC LIMIT $1"
            ),
            &[],
            Some(limit),
            "list trending products",
        )
        .await
    }

    async fn record_scan(&self, scan: &ScanRecord) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO scans (id, user_id, barcode, product_name, product_brand, nutri_score, rating, scanned_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(&scan.id)
        .bind(&scan.user_id)
        .bind(&scan.barcode)
        .bind(&scan.product_name)
        .bind(&scan.product_brand)
        .bind(scan.nutri_score.map(|g| g.as_str()))
        .bind(scan.rating)
        .bind(scan.scanned_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to record scan: {e}")))?;
        Ok(())
    }

    async fn scans_for_user(&self, user_id: &str, limit: u32) -> AppResult<Vec<ScanRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, barcode, product_name, product_brand, nutri_score, rating, scanned_at
            FROM scans WHERE user_id = $1
            ORDER BY scanned_at DESC LIMIT $2
            ",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load scans for {user_id}: {e}")))?;

        rows.iter().map(Self::row_to_scan).collect()
    }
}
