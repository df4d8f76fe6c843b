// ABOUTME: Integration tests for point-in-time metric estimation
// ABOUTME: Covers measured, interpolated, carried-forward, and missing estimates plus FFMI derivation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::panic, clippy::float_cmp)]

mod common;

use chrono::Duration;
use common::{body_fat, config_with_height, day, default_config, reading, weight};
use physique_metrics::intelligence::config::{
    FfmiFormula, FitnessIndexConfig, InterpolationConfig, WeightUnit,
};
use physique_metrics::intelligence::{ConfidenceLevel, InterpolationEngine, MetricEstimate};
use physique_metrics::models::Metric;

fn engine() -> InterpolationEngine {
    common::init_test_logging();
    InterpolationEngine::from_config(&default_config())
}

#[test]
fn test_before_first_observation_is_missing() {
    let history = vec![weight(day(2024, 1, 10), 180.0), weight(day(2024, 1, 20), 178.0)];

    for target in [day(2024, 1, 9), day(2023, 6, 1), day(2024, 1, 10) - Duration::seconds(1)] {
        let estimate = engine().estimate(target, Metric::Weight, &history);
        assert_eq!(estimate, MetricEstimate::Missing);
    }
}

#[test]
fn test_exact_match_is_measured() {
    let history = vec![
        weight(day(2024, 1, 1), 180.0),
        weight(day(2024, 1, 5), 178.4),
        weight(day(2024, 1, 11), 170.0),
    ];

    let estimate = engine().estimate(day(2024, 1, 5), Metric::Weight, &history);

    assert_eq!(
        estimate,
        MetricEstimate::Measured {
            value: 178.4,
            date: day(2024, 1, 5),
        }
    );
    assert_eq!(estimate.confidence(), Some(ConfidenceLevel::Measured));
}

#[test]
fn test_midpoint_of_ten_day_gap() {
    let history = vec![weight(day(2024, 1, 1), 180.0), weight(day(2024, 1, 11), 170.0)];

    let estimate = engine().estimate(day(2024, 1, 6), Metric::Weight, &history);

    let MetricEstimate::Interpolated {
        value,
        confidence,
        from_date,
        to_date,
    } = estimate
    else {
        panic!("expected an interpolated estimate, got {estimate:?}");
    };
    assert!((value - 175.0).abs() < 0.001);
    assert!(confidence <= ConfidenceLevel::Medium);
    assert_eq!(from_date, day(2024, 1, 1));
    assert_eq!(to_date, day(2024, 1, 11));
}

#[test]
fn test_confidence_grades_by_gap() {
    let engine = engine();

    assert_eq!(engine.confidence_for_gap(Duration::days(3)), ConfidenceLevel::High);
    assert_eq!(engine.confidence_for_gap(Duration::days(7)), ConfidenceLevel::High);
    assert_eq!(engine.confidence_for_gap(Duration::days(8)), ConfidenceLevel::Medium);
    assert_eq!(engine.confidence_for_gap(Duration::days(21)), ConfidenceLevel::Medium);
    assert_eq!(engine.confidence_for_gap(Duration::days(22)), ConfidenceLevel::Low);
}

#[test]
fn test_interpolation_skips_observations_without_the_metric() {
    let history = vec![
        weight(day(2024, 3, 1), 200.0),
        body_fat(day(2024, 3, 3), 18.0),
        weight(day(2024, 3, 5), 196.0),
    ];

    let estimate = engine().estimate(day(2024, 3, 3), Metric::Weight, &history);

    assert!(matches!(estimate, MetricEstimate::Interpolated { .. }));
    assert!((estimate.value().unwrap() - 198.0).abs() < 0.001);
    assert_eq!(estimate.confidence(), Some(ConfidenceLevel::High));
}

#[test]
fn test_carry_forward_within_window() {
    let history = vec![weight(day(2024, 1, 1), 180.0), weight(day(2024, 2, 1), 176.0)];

    let estimate = engine().estimate(day(2024, 2, 20), Metric::Weight, &history);

    assert_eq!(
        estimate,
        MetricEstimate::CarriedForward {
            value: 176.0,
            confidence: ConfidenceLevel::Low,
            as_of_date: day(2024, 2, 1),
        }
    );
}

#[test]
fn test_carry_forward_expires_after_window() {
    let history = vec![weight(day(2024, 1, 1), 180.0)];

    let at_limit = engine().estimate(day(2024, 1, 31), Metric::Weight, &history);
    let beyond = engine().estimate(day(2024, 2, 1), Metric::Weight, &history);

    assert!(matches!(at_limit, MetricEstimate::CarriedForward { .. }));
    assert_eq!(beyond, MetricEstimate::Missing);
}

#[test]
fn test_custom_carry_forward_window() {
    let engine = InterpolationEngine::new(
        InterpolationConfig {
            max_carry_forward_days: 3,
            ..InterpolationConfig::default()
        },
        FitnessIndexConfig::default(),
    );
    let history = vec![weight(day(2024, 1, 1), 180.0)];

    assert!(!engine
        .estimate(day(2024, 1, 3), Metric::Weight, &history)
        .is_missing());
    assert!(engine
        .estimate(day(2024, 1, 5), Metric::Weight, &history)
        .is_missing());
}

#[test]
fn test_empty_history_is_missing() {
    let estimate = engine().estimate(day(2024, 1, 1), Metric::BodyFatPercentage, &[]);
    assert!(estimate.is_missing());
}

#[test]
fn test_unsorted_input_matches_sorted_input() {
    let sorted = vec![
        weight(day(2024, 1, 1), 180.0),
        weight(day(2024, 1, 15), 177.0),
        weight(day(2024, 2, 1), 175.0),
    ];
    let mut shuffled = sorted.clone();
    shuffled.reverse();

    let target = day(2024, 1, 20);
    assert_eq!(
        engine().estimate(target, Metric::Weight, &sorted),
        engine().estimate(target, Metric::Weight, &shuffled)
    );
}

#[test]
fn test_estimate_series_matches_individual_estimates() {
    let history = vec![
        weight(day(2024, 1, 1), 180.0),
        weight(day(2024, 1, 11), 170.0),
        weight(day(2024, 2, 1), 168.0),
    ];
    let instants: Vec<_> = (0..60)
        .map(|offset| day(2023, 12, 20) + Duration::days(offset))
        .collect();
    let engine = engine();

    let series = engine.estimate_series(Metric::Weight, &history, &instants);

    assert_eq!(series.len(), instants.len());
    for (instant, estimate) in instants.iter().zip(&series) {
        assert_eq!(*estimate, engine.estimate(*instant, Metric::Weight, &history));
    }
}

#[test]
fn test_fitness_index_between_endpoints_is_interpolated() {
    let engine = InterpolationEngine::from_config(&config_with_height(1.8));
    let history = vec![
        reading(day(2024, 1, 1), 180.0, 20.0),
        reading(day(2024, 6, 1), 170.0, 15.0),
    ];

    let start = engine.fitness_index(day(2024, 1, 1), &history);
    let end = engine.fitness_index(day(2024, 6, 1), &history);
    let middle = engine.fitness_index(day(2024, 3, 1), &history);

    assert!(start.is_measured());
    assert!(end.is_measured());
    let (low, high) = (start.value().unwrap(), end.value().unwrap());
    assert!(low < high);
    let value = middle.value().unwrap();
    assert!(value > low && value < high, "{low} < {value} < {high}");
    assert!(matches!(middle, MetricEstimate::Interpolated { .. }));
}

#[test]
fn test_fitness_index_standard_value() {
    let engine = InterpolationEngine::from_config(&config_with_height(1.8));
    let history = vec![reading(day(2024, 1, 1), 180.0, 20.0)];

    // 180 lb at 20% fat: 144 lb lean = 65.317 kg over 3.24 m^2
    let value = engine.fitness_index(day(2024, 1, 1), &history).value().unwrap();
    assert!((value - 20.159).abs() < 0.01);
}

#[test]
fn test_height_normalized_formula() {
    let standard = InterpolationEngine::new(
        InterpolationConfig::default(),
        FitnessIndexConfig {
            height_m: Some(1.7),
            weight_unit: WeightUnit::Kilograms,
            formula: FfmiFormula::Standard,
        },
    );
    let normalized = InterpolationEngine::new(
        InterpolationConfig::default(),
        FitnessIndexConfig {
            height_m: Some(1.7),
            weight_unit: WeightUnit::Kilograms,
            formula: FfmiFormula::HeightNormalized,
        },
    );

    let base = standard.fitness_index_value(80.0, 15.0).unwrap();
    let adjusted = normalized.fitness_index_value(80.0, 15.0).unwrap();
    assert!((adjusted - base - 0.61).abs() < 0.001);
}

#[test]
fn test_fitness_index_missing_without_height() {
    let history = vec![reading(day(2024, 1, 1), 180.0, 20.0)];
    let estimate = engine().fitness_index(day(2024, 1, 1), &history);
    assert!(estimate.is_missing());
}

#[test]
fn test_fitness_index_missing_when_body_fat_missing() {
    let engine = InterpolationEngine::from_config(&config_with_height(1.8));
    let history = vec![weight(day(2024, 1, 1), 180.0)];
    assert!(engine.fitness_index(day(2024, 1, 1), &history).is_missing());
}

#[test]
fn test_fitness_index_takes_weakest_provenance() {
    let engine = InterpolationEngine::from_config(&config_with_height(1.8));
    let history = vec![
        reading(day(2024, 1, 1), 180.0, 20.0),
        weight(day(2024, 1, 10), 179.0),
    ];

    let estimate = engine.fitness_index(day(2024, 1, 10), &history);

    assert_eq!(
        estimate,
        MetricEstimate::CarriedForward {
            value: estimate.value().unwrap(),
            confidence: ConfidenceLevel::Low,
            as_of_date: day(2024, 1, 1),
        }
    );
}

#[test]
fn test_estimate_serializes_with_kind_tag() {
    let estimate = MetricEstimate::CarriedForward {
        value: 176.0,
        confidence: ConfidenceLevel::Low,
        as_of_date: day(2024, 2, 1),
    };

    let json = serde_json::to_value(estimate).unwrap();
    assert_eq!(json["kind"], "carried_forward");
    assert_eq!(json["confidence"], "low");

    let missing = serde_json::to_value(MetricEstimate::Missing).unwrap();
    assert_eq!(missing["kind"], "missing");
}
