// ABOUTME: Tests for user submissions, the review queue, and catalog listings
// ABOUTME: Exercises submit, approve, reject, search, healthy alternatives, and trending over the in-process store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]

mod common;

use std::sync::Arc;

use common::FailingStore;
use tattvam::database::ProductStore;
use tattvam::errors::ErrorCode;
use tattvam::models::{
    GradeOrigin, NewProduct, NutriScore, NutrientValues, ProductEdits, ProductStatus,
};
use tattvam::services::ProductCatalog;

fn submission(barcode: &str, name: &str) -> NewProduct {
    NewProduct {
        barcode: barcode.to_owned(),
        name: name.to_owned(),
        ingredients: vec!["Rice Flakes".to_owned(), "Salt".to_owned()],
        nutrition: NutrientValues {
            calories: 360.0,
            protein: 6.0,
            carbs: 77.0,
            fat: 1.0,
            sugar: 0.5,
            sodium: 20.0,
        },
        submitted_by: Some("alice".to_owned()),
        ..NewProduct::default()
    }
}

#[tokio::test]
async fn test_submit_creates_pending_record() {
    let store = common::memory_store();
    let catalog = ProductCatalog::new(store.clone(), common::analyzer());

    let view = catalog.submit(submission(" 777 ", " Poha ")).await.unwrap();
    assert_eq!(view.barcode, "777");
    assert_eq!(view.name, "Poha");
    assert_eq!(view.brand, "Unknown");
    assert_eq!(view.category, "General");
    assert_eq!(view.status, ProductStatus::Pending);
    assert_eq!(view.grade_origin, GradeOrigin::Calculator);
    // 360 kcal earns 2 points
    assert_eq!(view.nutri_score, NutriScore::B);

    let stored = store.find_by_barcode("777").await.unwrap().unwrap();
    assert_eq!(stored.status, ProductStatus::Pending);
    assert_eq!(stored.nutri_score, None);
    assert_eq!(stored.submitted_by.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_submit_validation() {
    let catalog = ProductCatalog::new(common::memory_store(), common::analyzer());

    let err = catalog.submit(submission("1", "  ")).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
    assert!(err.message.contains("name"));

    let err = catalog.submit(submission("", "Poha")).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
    assert!(err.message.contains("barcode"));

    catalog.submit(submission("1", "Poha")).await.unwrap();
    let err = catalog.submit(submission("1", "Poha Again")).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
}

#[tokio::test]
async fn test_submit_keeps_optional_fields() {
    let catalog = ProductCatalog::new(common::memory_store(), common::analyzer());
    let product = NewProduct {
        brand: Some("Haldiram".to_owned()),
        category: Some("Snacks".to_owned()),
        image_url: Some("https://images.example.org/poha.jpg".to_owned()),
        ..submission("2", "Poha")
    };

    let view = catalog.submit(product).await.unwrap();
    assert_eq!(view.brand, "Haldiram");
    assert_eq!(view.category, "Snacks");
    assert_eq!(view.image_url, "https://images.example.org/poha.jpg");
}

#[tokio::test]
async fn test_review_flow() {
    let store = common::memory_store();
    let catalog = ProductCatalog::new(store.clone(), common::analyzer());
    catalog.submit(submission("10", "First")).await.unwrap();
    catalog.submit(submission("20", "Second")).await.unwrap();

    let pending = catalog.pending().await.unwrap();
    assert_eq!(pending.len(), 2);
    assert!(pending.iter().all(|v| v.status == ProductStatus::Pending));

    let approved = catalog.approve("10").await.unwrap();
    assert_eq!(approved.status, ProductStatus::Approved);
    assert_eq!(approved.nutri_score, NutriScore::B);
    assert_eq!(
        store.find_by_barcode("10").await.unwrap().unwrap().nutri_score,
        Some(NutriScore::B)
    );

    catalog.reject("20").await.unwrap();
    assert!(store.find_by_barcode("20").await.unwrap().is_none());
    assert!(catalog.pending().await.unwrap().is_empty());

    assert_eq!(
        catalog.reject("20").await.unwrap_err().code,
        ErrorCode::ResourceNotFound
    );
    assert_eq!(
        catalog.approve("missing").await.unwrap_err().code,
        ErrorCode::ResourceNotFound
    );
}

#[tokio::test]
async fn test_approve_applies_reviewer_edits_and_regrades() {
    let store = common::memory_store();
    let catalog = ProductCatalog::new(store.clone(), common::analyzer());
    catalog.submit(submission("30", "poha")).await.unwrap();

    let edits = ProductEdits {
        name: Some("  Poha Classic ".to_owned()),
        brand: Some("Haldiram".to_owned()),
        image_url: Some("https://images.example.org/poha.jpg".to_owned()),
        ingredients: Some(vec![
            "Rice Flakes".to_owned(),
            "Palm Oil".to_owned(),
            "Sugar".to_owned(),
        ]),
        nutrition: Some(NutrientValues {
            calories: 500.0,
            fat: 25.0,
            sugar: 30.0,
            sodium: 1300.0,
            ..NutrientValues::default()
        }),
        ..ProductEdits::default()
    };
    let view = catalog.approve_with_edits("30", edits).await.unwrap();

    assert_eq!(view.name, "Poha Classic");
    assert_eq!(view.brand, "Haldiram");
    assert_eq!(view.status, ProductStatus::Approved);
    assert_eq!(view.nutri_score, NutriScore::E);
    assert_eq!(view.bad_ingredients, vec!["Palm Oil", "Sugar"]);

    let stored = store.find_by_barcode("30").await.unwrap().unwrap();
    assert_eq!(stored.name, "Poha Classic");
    assert_eq!(stored.image_url, "https://images.example.org/poha.jpg");
    assert_eq!(stored.nutrition.sodium, 1300.0);
    assert_eq!(stored.nutri_score, Some(NutriScore::E));
    assert_eq!(stored.submitted_by.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_blank_edits_keep_submitted_values() {
    let store = common::memory_store();
    let catalog = ProductCatalog::new(store.clone(), common::analyzer());
    catalog.submit(submission("31", "Poha")).await.unwrap();

    let edits = ProductEdits {
        name: Some("   ".to_owned()),
        ingredients: Some(Vec::new()),
        ..ProductEdits::default()
    };
    assert!(edits.is_empty());
    let view = catalog.approve_with_edits("31", edits).await.unwrap();

    assert_eq!(view.name, "Poha");
    assert_eq!(view.ingredients.len(), 2);
    assert_eq!(view.nutri_score, NutriScore::B);
}

#[tokio::test]
async fn test_listings() {
    let store = common::memory_store();
    store
        .upsert(&common::graded(common::oats("oats"), NutriScore::A))
        .await
        .unwrap();
    store
        .upsert(&common::graded(common::noodles("noodles"), NutriScore::E))
        .await
        .unwrap();
    let catalog = ProductCatalog::new(store, common::analyzer());

    let healthy = catalog.healthy_alternatives(10).await.unwrap();
    assert_eq!(healthy.len(), 1);
    assert_eq!(healthy[0].barcode, "oats");
    assert_eq!(healthy[0].grade_origin, GradeOrigin::Stored);

    assert_eq!(catalog.trending(10).await.unwrap().len(), 2);

    let found = catalog.search("NOODLES", 10).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].nutri_score, NutriScore::E);

    let err = catalog.search("  ", 10).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_store_errors_propagate() {
    let catalog = ProductCatalog::new(Arc::new(FailingStore), common::analyzer());
    assert_eq!(
        catalog.pending().await.unwrap_err().code,
        ErrorCode::DatabaseError
    );
    assert_eq!(
        catalog.submit(submission("1", "Poha")).await.unwrap_err().code,
        ErrorCode::DatabaseError
    );
}
