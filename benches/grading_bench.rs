// ABOUTME: Criterion benchmarks for the grade calculator, ingredient tagging, and batch product views
// ABOUTME: Measures single-product latency and parallel view throughput for growing catalog sizes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for product analysis.
//!
//! Covers the pure grading path a scan goes through and the parallel view
//! rendering used by catalog listings.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tattvam::analysis::{compute_grade, tag_ingredients, HealthAnalyzer, IngredientDictionary};
use tattvam::models::{GradeOrigin, NutrientValues, ProductRecord};

const INGREDIENTS: &[&str] = &[
    "Wheat Flour",
    "Palm Oil",
    "Sugar",
    "Salt",
    "Monosodium Glutamate",
    "Turmeric",
    "Whole Grain Oats",
    "Hydrogenated Vegetable Oil",
    "Milk Solids",
    "Citric Acid",
];

fn nutrition(index: usize) -> NutrientValues {
    NutrientValues {
        calories: 100.0 + ((index * 37) % 500) as f64,
        protein: ((index * 3) % 20) as f64,
        carbs: ((index * 11) % 80) as f64,
        fat: ((index * 7) % 30) as f64,
        sugar: ((index * 5) % 40) as f64,
        sodium: ((index * 97) % 2000) as f64,
    }
}

fn catalog(count: usize) -> Vec<ProductRecord> {
    (0..count)
        .map(|index| {
            let start = index % INGREDIENTS.len();
            let ingredients = INGREDIENTS
                .iter()
                .cycle()
                .skip(start)
                .take(6)
                .copied();
            ProductRecord::new(format!("890{index:010}"), format!("Product {index}"), "Bench")
                .with_ingredients(ingredients)
                .with_nutrition(nutrition(index))
        })
        .collect()
}

fn bench_compute_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_grade");
    let food = nutrition(7);
    let drink = NutrientValues {
        calories: 42.0,
        sugar: 10.6,
        ..NutrientValues::default()
    };

    group.bench_function("food", |b| b.iter(|| compute_grade(black_box(&food), false)));
    group.bench_function("beverage", |b| {
        b.iter(|| compute_grade(black_box(&drink), true));
    });
    group.finish();
}

fn bench_tag_ingredients(c: &mut Criterion) {
    let mut group = c.benchmark_group("tag_ingredients");
    let dictionary = IngredientDictionary::builtin();

    group.throughput(Throughput::Elements(INGREDIENTS.len() as u64));
    group.bench_function("builtin_dictionary", |b| {
        b.iter(|| tag_ingredients(&dictionary, black_box(INGREDIENTS)));
    });
    group.finish();
}

fn bench_view_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_all");
    let analyzer = HealthAnalyzer::with_builtin_dictionary();

    for count in [10, 100, 1_000] {
        let records = catalog(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("products", count), &records, |b, records| {
            b.iter(|| analyzer.view_all(black_box(records), GradeOrigin::Calculator));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_compute_grade,
    bench_tag_ingredients,
    bench_view_all
);
criterion_main!(benches);
