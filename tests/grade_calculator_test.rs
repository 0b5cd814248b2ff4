// ABOUTME: Tests for the Nutri-Score calculator covering the food and beverage branches
// ABOUTME: Verifies penalty point tiers, grade boundaries, ratings, and nutrient warnings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]

use tattvam::analysis::grade::{
    beverage_grade, food_penalty_points, grade_from_points, nutrient_warnings,
};
use tattvam::analysis::{compute_grade, is_beverage};
use tattvam::models::{NutriScore, NutrientValues};

fn nutrients(calories: f64, fat: f64, sugar: f64, sodium: f64) -> NutrientValues {
    NutrientValues {
        calories,
        fat,
        sugar,
        sodium,
        ..NutrientValues::default()
    }
}

#[test]
fn test_all_zero_food_is_grade_a() {
    let grade = compute_grade(&NutrientValues::default(), false);
    assert_eq!(grade.nutri_score, NutriScore::A);
    assert_eq!(grade.rating, 5.0);
}

#[test]
fn test_high_everything_is_grade_e() {
    let values = nutrients(500.0, 25.0, 30.0, 1500.0);
    assert_eq!(food_penalty_points(&values), 16);

    let grade = compute_grade(&values, false);
    assert_eq!(grade.nutri_score, NutriScore::E);
    assert_eq!(grade.rating, 1.0);
}

#[test]
fn test_penalty_tiers_are_strictly_greater_than() {
    // Values sitting exactly on a threshold earn nothing for that tier
    assert_eq!(food_penalty_points(&nutrients(350.0, 10.0, 15.0, 600.0)), 0);
    assert_eq!(food_penalty_points(&nutrients(350.1, 0.0, 0.0, 0.0)), 2);
    assert_eq!(food_penalty_points(&nutrients(475.0, 0.0, 0.0, 0.0)), 2);
    assert_eq!(food_penalty_points(&nutrients(475.1, 0.0, 0.0, 0.0)), 4);
    assert_eq!(food_penalty_points(&nutrients(0.0, 10.5, 0.0, 0.0)), 1);
    assert_eq!(food_penalty_points(&nutrients(0.0, 20.5, 0.0, 0.0)), 3);
    assert_eq!(food_penalty_points(&nutrients(0.0, 0.0, 15.5, 0.0)), 2);
    assert_eq!(food_penalty_points(&nutrients(0.0, 0.0, 25.5, 0.0)), 4);
    assert_eq!(food_penalty_points(&nutrients(0.0, 0.0, 0.0, 601.0)), 3);
    assert_eq!(food_penalty_points(&nutrients(0.0, 0.0, 0.0, 1201.0)), 5);
}

#[test]
fn test_points_to_grade_boundaries() {
    assert_eq!(grade_from_points(0), NutriScore::A);
    assert_eq!(grade_from_points(1), NutriScore::B);
    assert_eq!(grade_from_points(2), NutriScore::B);
    assert_eq!(grade_from_points(3), NutriScore::C);
    assert_eq!(grade_from_points(5), NutriScore::C);
    assert_eq!(grade_from_points(6), NutriScore::D);
    assert_eq!(grade_from_points(8), NutriScore::D);
    assert_eq!(grade_from_points(9), NutriScore::E);
    assert_eq!(grade_from_points(30), NutriScore::E);
}

#[test]
fn test_moderate_snack_is_grade_c() {
    // 2 (calories) + 1 (fat) = 3 points
    let grade = compute_grade(&nutrients(400.0, 12.0, 5.0, 100.0), false);
    assert_eq!(grade.nutri_score, NutriScore::C);
    assert_eq!(grade.rating, 3.0);
}

#[test]
fn test_beverage_detection_needs_low_calories_and_water_first() {
    let drink = nutrients(42.0, 0.0, 10.6, 10.0);
    assert!(is_beverage(&drink, &["Carbonated Water", "Sugar"]));
    assert!(is_beverage(&drink, &["WATER"]));
    assert!(!is_beverage(&drink, &["Sugar", "Water"]));
    assert!(!is_beverage(&drink, &[] as &[&str]));
    assert!(!is_beverage(&nutrients(80.0, 0.0, 0.0, 0.0), &["Water"]));
}

#[test]
fn test_beverage_grades_by_sugar() {
    assert_eq!(beverage_grade(10.6), NutriScore::E);
    assert_eq!(beverage_grade(9.0), NutriScore::D);
    assert_eq!(beverage_grade(6.5), NutriScore::D);
    assert_eq!(beverage_grade(6.0), NutriScore::C);
    assert_eq!(beverage_grade(2.6), NutriScore::C);
    assert_eq!(beverage_grade(2.5), NutriScore::B);
    assert_eq!(beverage_grade(0.1), NutriScore::B);
    assert_eq!(beverage_grade(0.0), NutriScore::A);
}

#[test]
fn test_beverage_branch_ignores_food_points() {
    // Sodium alone would push a food to C; a sugar-free drink stays A
    let water = nutrients(0.0, 0.0, 0.0, 700.0);
    assert_eq!(compute_grade(&water, true).nutri_score, NutriScore::A);
    assert_eq!(compute_grade(&water, false).nutri_score, NutriScore::C);
}

#[test]
fn test_water_sugar_drink_takes_beverage_branch() {
    let drink = NutrientValues {
        calories: 50.0,
        sugar: 10.0,
        ..NutrientValues::default()
    };
    let ingredients = ["Water, Sugar"];

    let beverage = is_beverage(&drink, &ingredients);
    assert!(beverage);
    let grade = compute_grade(&drink, beverage);
    assert_eq!(grade.nutri_score, NutriScore::E);
    assert_eq!(grade.rating, 1.0);
}

#[test]
fn test_grading_is_deterministic() {
    let samples = [
        nutrients(0.0, 0.0, 0.0, 0.0),
        nutrients(360.0, 12.0, 16.0, 650.0),
        nutrients(500.0, 25.0, 30.0, 1300.0),
        nutrients(42.0, 0.0, 10.6, 10.0),
    ];
    for values in &samples {
        for beverage in [false, true] {
            let first = compute_grade(values, beverage);
            let second = compute_grade(values, beverage);
            assert_eq!(first, second);
        }
    }
}

#[test]
fn test_raising_one_nutrient_never_improves_the_grade() {
    let steps = [0.0, 2.5, 6.0, 9.0, 10.0, 15.0, 20.0, 25.0, 350.0, 475.0, 600.0, 1200.0, 2000.0];
    let bases = [
        nutrients(0.0, 0.0, 0.0, 0.0),
        nutrients(400.0, 5.0, 5.0, 100.0),
        nutrients(100.0, 15.0, 20.0, 800.0),
    ];
    let setters: [fn(&mut NutrientValues, f64); 4] = [
        |v, x| v.calories = x,
        |v, x| v.sugar = x,
        |v, x| v.fat = x,
        |v, x| v.sodium = x,
    ];

    for base in &bases {
        for set in setters {
            for beverage in [false, true] {
                let mut previous = None;
                for step in steps {
                    let mut values = *base;
                    set(&mut values, step);
                    let grade = compute_grade(&values, beverage).nutri_score;
                    if let Some(before) = previous {
                        assert!(grade >= before, "{before:?} improved to {grade:?} at {step}");
                    }
                    previous = Some(grade);
                }
            }
        }
    }
}

#[test]
fn test_non_finite_values_count_as_zero() {
    let broken = nutrients(f64::NAN, f64::INFINITY, f64::NEG_INFINITY, f64::NAN);
    let grade = compute_grade(&broken, false);
    assert_eq!(grade.nutri_score, NutriScore::A);
    assert!(nutrient_warnings(&broken).is_empty());
}

#[test]
fn test_nutrient_warnings_in_fixed_order() {
    let warnings = nutrient_warnings(&nutrients(100.0, 18.0, 23.0, 650.0));
    assert_eq!(
        warnings,
        vec!["High in sugar.", "High in fat.", "High in salt."]
    );

    assert!(nutrient_warnings(&nutrients(100.0, 17.5, 22.5, 600.0)).is_empty());
}

#[test]
fn test_rating_is_a_fixed_lookup() {
    let ratings: Vec<f64> = NutriScore::ALL.iter().map(|g| g.rating()).collect();
    assert_eq!(ratings, vec![5.0, 4.0, 3.0, 2.0, 1.0]);
}

#[test]
fn test_grade_letter_parsing() {
    assert_eq!(NutriScore::parse("b"), Some(NutriScore::B));
    assert_eq!(NutriScore::parse(" E "), Some(NutriScore::E));
    assert_eq!(NutriScore::parse("?"), None);
    assert_eq!(NutriScore::parse("unknown"), None);
    assert_eq!(NutriScore::parse("not-applicable"), None);
    assert_eq!(NutriScore::C.to_string(), "C");
}
