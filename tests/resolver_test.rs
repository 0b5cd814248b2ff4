// ABOUTME: Integration tests for the barcode resolution waterfall
// ABOUTME: Covers store short-circuit, source order and fault isolation, timeouts, grading paths, and smart-fill
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FailingStore, FakeSearch, FakeSource, ScriptedLlm, SourceReply};
use tattvam::constants::labels::NOT_FOUND_MESSAGE;
use tattvam::database::{MemoryStore, ProductStore};
use tattvam::errors::ErrorCode;
use tattvam::llm::LlmProvider;
use tattvam::models::{GradeOrigin, NutriScore, NutrientValues, ProductRecord, ProductStatus};
use tattvam::providers::{CircuitBreakerConfig, CircuitState, ProductSource};
use tattvam::services::{GradeEstimator, ProductResolver, SmartFill};

const BARCODE: &str = "8901058851298";

fn breaker() -> CircuitBreakerConfig {
    CircuitBreakerConfig::new(3, Duration::from_secs(60), 1)
}

fn resolver_with(
    store: Arc<dyn ProductStore>,
    sources: &[Arc<FakeSource>],
    llm: Option<Arc<dyn LlmProvider>>,
) -> ProductResolver {
    common::init_test_logging();
    let analyzer = common::analyzer();
    let estimator = GradeEstimator::new(llm, analyzer.clone());
    let mut resolver =
        ProductResolver::new(store, analyzer, estimator, Duration::from_millis(200));
    for source in sources {
        let source: Arc<dyn ProductSource> = source.clone();
        resolver = resolver.with_source(source, breaker());
    }
    resolver
}

// ============================================================================
// Input and store
// ============================================================================

#[tokio::test]
async fn test_empty_barcode_is_invalid_input() {
    let resolver = resolver_with(common::memory_store(), &[], None);
    let err = resolver.resolve("   ").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_store_hit_skips_sources() {
    let store = common::memory_store();
    store
        .upsert(&common::graded(common::oats(BARCODE), NutriScore::B))
        .await
        .unwrap();
    let source = FakeSource::new("primary", SourceReply::Found(common::noodles(BARCODE)));
    let resolver = resolver_with(store, &[source.clone()], None);

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(view.name, "Rolled Oats");
    assert_eq!(view.nutri_score, NutriScore::B);
    assert_eq!(view.rating, 4.0);
    assert_eq!(view.grade_origin, GradeOrigin::Stored);
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_barcode_is_trimmed() {
    let store = common::memory_store();
    store
        .upsert(&common::graded(common::oats(BARCODE), NutriScore::A))
        .await
        .unwrap();
    let resolver = resolver_with(store, &[], None);

    let view = resolver.resolve(&format!("  {BARCODE} ")).await.unwrap();
    assert_eq!(view.barcode, BARCODE);
}

#[tokio::test]
async fn test_not_found_everywhere() {
    let first = FakeSource::new("first", SourceReply::Missing);
    let second = FakeSource::new("second", SourceReply::Missing);
    let resolver = resolver_with(common::memory_store(), &[first.clone(), second.clone()], None);

    let err = resolver.resolve(BARCODE).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(err.message, NOT_FOUND_MESSAGE);
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 1);
}

// ============================================================================
// Waterfall order and fault isolation
// ============================================================================

#[tokio::test]
async fn test_first_source_with_a_record_wins() {
    let store = common::memory_store();
    let first = FakeSource::new("first", SourceReply::Missing);
    let second = FakeSource::new(
        "second",
        SourceReply::Found(common::graded(common::noodles(BARCODE), NutriScore::D)),
    );
    let third = FakeSource::new("third", SourceReply::Found(common::oats(BARCODE)));
    let resolver = resolver_with(
        store.clone(),
        &[first.clone(), second.clone(), third.clone()],
        None,
    );
    assert_eq!(resolver.source_names(), vec!["first", "second", "third"]);

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(view.name, "Masala Noodles");
    assert_eq!(view.nutri_score, NutriScore::D);
    assert_eq!(view.grade_origin, GradeOrigin::Source);
    assert_eq!((first.calls(), second.calls(), third.calls()), (1, 1, 0));

    let stored = store.find_by_barcode(BARCODE).await.unwrap().unwrap();
    assert_eq!(stored.status, ProductStatus::Approved);
    assert_eq!(stored.nutri_score, Some(NutriScore::D));
}

#[tokio::test]
async fn test_failing_source_does_not_fail_the_lookup() {
    let broken = FakeSource::new("broken", SourceReply::Fail(ErrorCode::ExternalServiceUnavailable));
    let healthy = FakeSource::new("healthy", SourceReply::Found(common::oats(BARCODE)));
    let resolver = resolver_with(common::memory_store(), &[broken.clone(), healthy], None);

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(view.name, "Rolled Oats");
    assert_eq!(broken.calls(), 1);
}

#[tokio::test]
async fn test_slow_source_times_out() {
    let slow = FakeSource::new(
        "slow",
        SourceReply::Slow(Duration::from_secs(5), common::noodles(BARCODE)),
    );
    let fast = FakeSource::new("fast", SourceReply::Found(common::oats(BARCODE)));
    let resolver = resolver_with(common::memory_store(), &[slow, fast], None);

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(view.name, "Rolled Oats");
}

#[tokio::test]
async fn test_record_without_name_is_skipped() {
    let nameless = FakeSource::new(
        "nameless",
        SourceReply::Found(ProductRecord::new(BARCODE, "", "Ghost")),
    );
    let named = FakeSource::new("named", SourceReply::Found(common::oats(BARCODE)));
    let resolver = resolver_with(common::memory_store(), &[nameless, named.clone()], None);

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(view.name, "Rolled Oats");
    assert_eq!(named.calls(), 1);
}

#[tokio::test]
async fn test_open_circuit_skips_source() {
    let broken = FakeSource::new("broken", SourceReply::Fail(ErrorCode::ExternalServiceError));
    let analyzer = common::analyzer();
    let resolver = ProductResolver::new(
        common::memory_store(),
        analyzer.clone(),
        GradeEstimator::new(None, analyzer),
        Duration::from_millis(200),
    )
    .with_source(
        broken.clone(),
        CircuitBreakerConfig::new(2, Duration::from_secs(60), 1),
    );

    for _ in 0..2 {
        resolver.resolve(BARCODE).await.unwrap_err();
    }
    assert_eq!(resolver.circuit_state("broken"), Some(CircuitState::Open));

    let err = resolver.resolve(BARCODE).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(broken.calls(), 2);
    assert_eq!(resolver.circuit_state("missing"), None);
}

#[tokio::test]
async fn test_store_failures_are_not_fatal() {
    let source = FakeSource::new("primary", SourceReply::Found(common::oats(BARCODE)));
    let resolver = resolver_with(Arc::new(FailingStore), &[source], None);

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(view.name, "Rolled Oats");
    assert_eq!(view.grade_origin, GradeOrigin::Calculator);
}

// ============================================================================
// Grading paths
// ============================================================================

#[tokio::test]
async fn test_calculator_grades_without_ai() {
    let store = common::memory_store();
    let source = FakeSource::new("primary", SourceReply::Found(common::noodles(BARCODE)));
    let resolver = resolver_with(store.clone(), &[source], None);

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(view.nutri_score, NutriScore::E);
    assert_eq!(view.grade_origin, GradeOrigin::Calculator);

    let stored = store.find_by_barcode(BARCODE).await.unwrap().unwrap();
    assert_eq!(stored.nutri_score, Some(NutriScore::E));
}

#[tokio::test]
async fn test_ai_estimate_replaces_ingredients() {
    let store = common::memory_store();
    let llm = ScriptedLlm::replying(
        "```json\n{\"nutriScore\": \"c\", \"cleanIngredients\": [\"Wheat Flour\", \" Palm Oil \", \"\"], \"badIngredients\": [\"Palm Oil\"]}\n```",
    );
    let source = FakeSource::new("primary", SourceReply::Found(common::noodles(BARCODE)));
    let resolver = resolver_with(store.clone(), &[source], Some(llm.clone()));

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(view.nutri_score, NutriScore::C);
    assert_eq!(view.rating, 3.0);
    assert_eq!(view.grade_origin, GradeOrigin::AiEstimate);
    assert_eq!(view.bad_ingredients, vec!["Palm Oil"]);

    let stored = store.find_by_barcode(BARCODE).await.unwrap().unwrap();
    assert_eq!(stored.ingredients, vec!["Wheat Flour", "Palm Oil"]);
    assert_eq!(stored.nutri_score, Some(NutriScore::C));

    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].json_mode);
    assert_eq!(requests[0].temperature, Some(0.0));
}

#[tokio::test]
async fn test_ai_failure_defaults_to_worst_grade() {
    let store = common::memory_store();
    let source = FakeSource::new("primary", SourceReply::Found(common::oats(BARCODE)));
    let resolver = resolver_with(store.clone(), &[source], Some(ScriptedLlm::failing()));

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(view.nutri_score, NutriScore::E);
    assert_eq!(view.rating, 1.0);
    assert_eq!(view.grade_origin, GradeOrigin::AiFailureDefault);

    let stored = store.find_by_barcode(BARCODE).await.unwrap().unwrap();
    // The default is shown but not stored
    assert_eq!(stored.nutri_score, None);
    // The raw ingredient list survives a failed estimate
    assert_eq!(stored.ingredients, vec!["Whole Grain Oats"]);
}

#[tokio::test]
async fn test_ai_failure_grade_is_estimated_again_on_next_lookup() {
    let store = common::memory_store();
    let source = FakeSource::new("primary", SourceReply::Found(common::oats(BARCODE)));
    let llm = ScriptedLlm::failing();
    let resolver = resolver_with(store.clone(), &[source.clone()], Some(llm.clone()));

    let first = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(first.nutri_score, NutriScore::E);
    assert_eq!(first.grade_origin, GradeOrigin::AiFailureDefault);

    let second = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(second.grade_origin, GradeOrigin::AiFailureDefault);
    assert_ne!(second.grade_origin, GradeOrigin::Stored);
    assert_eq!(source.calls(), 2);
    assert_eq!(llm.requests().len(), 2);
}

#[tokio::test]
async fn test_ai_failure_grade_recovers_once_ai_answers() {
    let store = common::memory_store();
    let source = FakeSource::new("primary", SourceReply::Found(common::oats(BARCODE)));

    let failing = resolver_with(store.clone(), &[source.clone()], Some(ScriptedLlm::failing()));
    failing.resolve(BARCODE).await.unwrap();

    let llm = ScriptedLlm::replying("{\"nutriScore\": \"B\", \"cleanIngredients\": []}");
    let healthy = resolver_with(store.clone(), &[source], Some(llm));
    let view = healthy.resolve(BARCODE).await.unwrap();
    assert_eq!(view.nutri_score, NutriScore::B);
    assert_eq!(view.grade_origin, GradeOrigin::AiEstimate);
    assert_eq!(
        store.find_by_barcode(BARCODE).await.unwrap().unwrap().nutri_score,
        Some(NutriScore::B)
    );
}

#[tokio::test]
async fn test_unparseable_ai_reply_defaults_to_worst_grade() {
    let source = FakeSource::new("primary", SourceReply::Found(common::oats(BARCODE)));
    let llm = ScriptedLlm::replying("I think this is a fairly healthy product.");
    let resolver = resolver_with(common::memory_store(), &[source], Some(llm));

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(view.grade_origin, GradeOrigin::AiFailureDefault);
    assert_eq!(view.nutri_score, NutriScore::E);
}

#[tokio::test]
async fn test_source_grade_skips_ai() {
    let llm = ScriptedLlm::replying("{\"nutriScore\": \"A\"}");
    let source = FakeSource::new(
        "primary",
        SourceReply::Found(common::graded(common::noodles(BARCODE), NutriScore::D)),
    );
    let resolver = resolver_with(common::memory_store(), &[source], Some(llm.clone()));

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(view.grade_origin, GradeOrigin::Source);
    assert!(llm.requests().is_empty());
}

// ============================================================================
// Unknown stored grades
// ============================================================================

#[tokio::test]
async fn test_unknown_stored_grade_is_re_resolved() {
    let store = common::memory_store();
    store.upsert(&common::noodles(BARCODE)).await.unwrap();
    let source = FakeSource::new(
        "primary",
        SourceReply::Found(common::graded(common::noodles(BARCODE), NutriScore::D)),
    );
    let resolver = resolver_with(store.clone(), &[source.clone()], None);

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(source.calls(), 1);
    assert_eq!(view.nutri_score, NutriScore::D);
    assert_eq!(
        store.find_by_barcode(BARCODE).await.unwrap().unwrap().nutri_score,
        Some(NutriScore::D)
    );
}

#[tokio::test]
async fn test_unknown_stored_grade_served_when_sources_fail() {
    let store = common::memory_store();
    store.upsert(&common::oats(BARCODE)).await.unwrap();
    let source = FakeSource::new("primary", SourceReply::Fail(ErrorCode::ExternalServiceUnavailable));
    let resolver = resolver_with(store.clone(), &[source], None);

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(view.name, "Rolled Oats");
    assert_eq!(view.nutri_score, NutriScore::A);
    assert_eq!(view.grade_origin, GradeOrigin::Calculator);
    // The stored record is left as it was
    assert_eq!(
        store.find_by_barcode(BARCODE).await.unwrap().unwrap().nutri_score,
        None
    );
}

#[tokio::test]
async fn test_source_hit_approves_submission_and_keeps_submitter() {
    let store = common::memory_store();
    let mut submission = common::noodles(BARCODE).with_status(ProductStatus::Pending);
    submission.submitted_by = Some("user-42".to_owned());
    store.upsert(&submission).await.unwrap();
    let source = FakeSource::new(
        "primary",
        SourceReply::Found(common::graded(common::noodles(BARCODE), NutriScore::D)),
    );
    let resolver = resolver_with(store.clone(), &[source], None);

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(view.status, ProductStatus::Approved);

    let stored = store.find_by_barcode(BARCODE).await.unwrap().unwrap();
    assert_eq!(stored.status, ProductStatus::Approved);
    assert_eq!(stored.submitted_by.as_deref(), Some("user-42"));
}

#[tokio::test]
async fn test_unmatched_submission_is_served_as_pending() {
    let store = common::memory_store();
    store
        .upsert(&common::oats(BARCODE).with_status(ProductStatus::Pending))
        .await
        .unwrap();
    let source = FakeSource::new("primary", SourceReply::Missing);
    let resolver = resolver_with(store.clone(), &[source], None);

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(view.status, ProductStatus::Pending);
    assert_eq!(view.grade_origin, GradeOrigin::Calculator);
    assert_eq!(
        store.find_by_barcode(BARCODE).await.unwrap().unwrap().status,
        ProductStatus::Pending
    );
}

// ============================================================================
// Smart-fill
// ============================================================================

fn bare_noodles() -> ProductRecord {
    let mut record = common::noodles(BARCODE);
    record.image_url = String::new();
    record.nutrition = NutrientValues::default();
    record
}

#[tokio::test]
async fn test_smart_fill_adopts_image_and_nutrition() {
    let search = FakeSearch::returning(Some(common::noodles("other")));
    let source = FakeSource::new("primary", SourceReply::Found(bare_noodles()));
    let resolver = resolver_with(Arc::new(MemoryStore::new()), &[source], None)
        .with_smart_fill(SmartFill::new(search.clone(), Duration::from_millis(200)));

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert_eq!(view.image_url, "https://images.example.org/noodles.jpg");
    assert_eq!(view.nutrition.calories, 500.0);
    // Barcode and name stay those of the resolved record
    assert_eq!(view.barcode, BARCODE);
    assert_eq!(search.queries(), vec!["Masala Noodles Maggi"]);
}

#[tokio::test]
async fn test_smart_fill_failure_keeps_record() {
    let search = FakeSearch::failing();
    let source = FakeSource::new("primary", SourceReply::Found(bare_noodles()));
    let resolver = resolver_with(common::memory_store(), &[source], None)
        .with_smart_fill(SmartFill::new(search, Duration::from_millis(200)));

    let view = resolver.resolve(BARCODE).await.unwrap();
    assert!(view.image_url.is_empty());
    assert!(view.nutrition.is_empty());
}

#[tokio::test]
async fn test_smart_fill_skipped_for_complete_records() {
    let search = FakeSearch::returning(Some(common::oats("other")));
    let source = FakeSource::new("primary", SourceReply::Found(common::noodles(BARCODE)));
    let resolver = resolver_with(common::memory_store(), &[source], None)
        .with_smart_fill(SmartFill::new(search.clone(), Duration::from_millis(200)));

    resolver.resolve(BARCODE).await.unwrap();
    assert!(search.queries().is_empty());
}
