// ABOUTME: Integration tests for calendar bucket aggregation
// ABOUTME: Validates sparse week/month/year buckets, median snapshots, photos, and offsets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::panic, clippy::float_cmp)]

mod common;

use chrono::{Duration, NaiveDate, Weekday};
use common::{at, body_fat, config_with_height, day, default_config, photo, reading, weight};
use physique_metrics::intelligence::config::{AggregationConfig, CalendarConfig};
use physique_metrics::intelligence::{
    bucket_containing, AggregationEngine, BucketId, BucketScale, ConfidenceLevel,
    InterpolationEngine, MetricEstimate, MetricSnapshot,
};
use physique_metrics::models::{MetricObservation, ObservationBuilder};

/// Three populated weeks in January 2024 with an empty week in between
fn january_history() -> Vec<MetricObservation> {
    vec![
        reading(day(2024, 1, 1), 180.0, 20.0),
        weight(day(2024, 1, 3), 182.0),
        weight(day(2024, 1, 5), 181.0),
        body_fat(day(2024, 1, 16), 19.0),
        weight(day(2024, 1, 24), 178.0),
    ]
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn test_empty_weeks_are_absent() {
    common::init_test_logging();
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::from_config(&default_config(), &interpolation);

    let buckets = engine.buckets(&january_history(), BucketScale::Week);

    let starts: Vec<NaiveDate> = buckets.iter().map(|bucket| bucket.period_start).collect();
    assert_eq!(
        starts,
        vec![date(2024, 1, 1), date(2024, 1, 15), date(2024, 1, 22)]
    );
    assert!(buckets.iter().all(|bucket| bucket.observation_count > 0));
}

#[test]
fn test_week_buckets_never_overlap() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::from_config(&default_config(), &interpolation);

    let buckets = engine.buckets(&january_history(), BucketScale::Week);

    for pair in buckets.windows(2) {
        assert!(pair[0].end <= pair[1].start);
        assert!(pair[0].start < pair[0].end);
    }
    for bucket in &buckets {
        assert_eq!(bucket.end - bucket.start, Duration::days(7));
    }
}

#[test]
fn test_bucket_ids_are_stable() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::from_config(&default_config(), &interpolation);

    let first = engine.buckets(&january_history(), BucketScale::Week);
    let second = engine.buckets(&january_history(), BucketScale::Week);

    assert_eq!(first, second);
    assert_eq!(first[0].id.as_str(), "week:2024-01-01");
    assert_eq!(
        first[1].id,
        BucketId::new(BucketScale::Week, date(2024, 1, 15))
    );
}

#[test]
fn test_median_of_readings_in_period() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::from_config(&default_config(), &interpolation);

    let buckets = engine.buckets(&january_history(), BucketScale::Week);
    let first = &buckets[0];

    assert_eq!(
        first.weight,
        MetricSnapshot::Present {
            value: 181.0,
            readings: 3,
        }
    );
    assert_eq!(
        first.body_fat_percentage,
        MetricSnapshot::Present {
            value: 20.0,
            readings: 1,
        }
    );
}

#[test]
fn test_even_count_median_averages_middle_values() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::from_config(&default_config(), &interpolation);
    let history = vec![
        weight(day(2024, 2, 5), 170.0),
        weight(day(2024, 2, 6), 174.0),
        weight(day(2024, 2, 7), 171.0),
        weight(day(2024, 2, 8), 190.0),
    ];

    let buckets = engine.buckets(&history, BucketScale::Week);

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].weight.value(), Some(172.5));
}

#[test]
fn test_missing_metric_falls_back_to_midpoint_estimate() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::from_config(&default_config(), &interpolation);

    let buckets = engine.buckets(&january_history(), BucketScale::Week);
    let middle = &buckets[1];

    // Midpoint Jan 18 12:00, between Jan 5 (181) and Jan 24 (178)
    let MetricSnapshot::Estimated(estimate) = middle.weight else {
        panic!("expected an estimated weight, got {:?}", middle.weight);
    };
    assert!(matches!(estimate, MetricEstimate::Interpolated { .. }));
    assert_eq!(estimate.confidence(), Some(ConfidenceLevel::Medium));
    let expected = 181.0 - 3.0 * (13.5 / 19.0);
    assert!((estimate.value().unwrap() - expected).abs() < 0.001);

    let last = &buckets[2];
    let MetricSnapshot::Estimated(body_fat) = last.body_fat_percentage else {
        panic!("expected an estimated body fat");
    };
    assert!(matches!(body_fat, MetricEstimate::CarriedForward { .. }));
}

#[test]
fn test_look_back_limits_periods() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::from_config(&default_config(), &interpolation);
    let mut history = january_history();
    history.push(weight(day(2023, 12, 1), 185.0));

    let weeks = engine.buckets(&history, BucketScale::Week);
    let months = engine.buckets(&history, BucketScale::Month);

    assert_eq!(weeks.len(), 3);
    assert!(weeks.iter().all(|bucket| bucket.period_start >= date(2024, 1, 1)));
    let month_ids: Vec<&str> = months.iter().map(|bucket| bucket.id.as_str()).collect();
    assert_eq!(month_ids, vec!["month:2023-12-01", "month:2024-01-01"]);
}

#[test]
fn test_custom_period_counts() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::new(
        AggregationConfig {
            week_periods: 1,
            month_periods: 12,
            year_periods: 3,
        },
        CalendarConfig::default(),
        &interpolation,
    );

    let weeks = engine.buckets(&january_history(), BucketScale::Week);

    assert_eq!(weeks.len(), 1);
    assert_eq!(weeks[0].period_start, date(2024, 1, 22));
}

#[test]
fn test_year_buckets_span_calendar_years() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::from_config(&default_config(), &interpolation);
    let history = vec![
        weight(day(2019, 5, 1), 200.0),
        weight(day(2022, 3, 1), 190.0),
        weight(day(2022, 9, 1), 186.0),
        weight(day(2024, 2, 1), 180.0),
    ];

    let years = engine.buckets(&history, BucketScale::Year);

    let ids: Vec<&str> = years.iter().map(|bucket| bucket.id.as_str()).collect();
    assert_eq!(ids, vec!["year:2022-01-01", "year:2024-01-01"]);
    assert_eq!(years[0].weight.value(), Some(188.0));
    assert_eq!(years[1].start, day(2024, 1, 1));
    assert_eq!(years[1].end, day(2025, 1, 1));
}

#[test]
fn test_canonical_photo_closest_to_midpoint() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::from_config(&default_config(), &interpolation);
    let history = vec![
        photo(at(2024, 1, 16, 9), "photos/a.jpg"),
        photo(at(2024, 1, 18, 6), "photos/c.jpg"),
        photo(at(2024, 1, 19, 20), "photos/b.jpg"),
    ];

    let buckets = engine.buckets(&history, BucketScale::Week);

    assert_eq!(buckets.len(), 1);
    let bucket = &buckets[0];
    assert!(bucket.has_any_photo);
    assert_eq!(bucket.canonical_photo.as_ref().unwrap().as_str(), "photos/c.jpg");
    assert!(bucket.weight.is_missing());
}

#[test]
fn test_canonical_photo_tie_prefers_earliest() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::from_config(&default_config(), &interpolation);
    // Week of Jan 15 has its midpoint at Jan 18 12:00
    let history = vec![
        photo(at(2024, 1, 19, 0), "photos/later.jpg"),
        photo(at(2024, 1, 18, 0), "photos/earlier.jpg"),
    ];

    let buckets = engine.buckets(&history, BucketScale::Week);

    assert_eq!(
        buckets[0].canonical_photo.as_ref().unwrap().as_str(),
        "photos/earlier.jpg"
    );
}

#[test]
fn test_has_any_photo_without_readings_elsewhere() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::from_config(&default_config(), &interpolation);

    let buckets = engine.buckets(&january_history(), BucketScale::Week);

    assert!(buckets.iter().all(|bucket| !bucket.has_any_photo));
    assert!(buckets.iter().all(|bucket| bucket.canonical_photo.is_none()));
}

#[test]
fn test_fitness_index_present_when_both_metrics_present() {
    let config = config_with_height(1.8);
    let interpolation = InterpolationEngine::from_config(&config);
    let engine = AggregationEngine::from_config(&config, &interpolation);
    let history = vec![
        reading(day(2024, 1, 1), 180.0, 20.0),
        reading(day(2024, 1, 3), 180.0, 20.0),
        weight(day(2024, 1, 4), 180.0),
    ];

    let buckets = engine.buckets(&history, BucketScale::Week);

    let expected = interpolation.fitness_index_value(180.0, 20.0).unwrap();
    assert_eq!(
        buckets[0].fitness_index,
        MetricSnapshot::Present {
            value: expected,
            readings: 2,
        }
    );
}

#[test]
fn test_fitness_index_missing_without_height() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::from_config(&default_config(), &interpolation);

    let buckets = engine.buckets(&january_history(), BucketScale::Week);

    assert!(buckets.iter().all(|bucket| bucket.fitness_index.is_missing()));
}

#[test]
fn test_fitness_index_estimated_from_mixed_snapshots() {
    let config = config_with_height(1.8);
    let interpolation = InterpolationEngine::from_config(&config);
    let engine = AggregationEngine::from_config(&config, &interpolation);

    let buckets = engine.buckets(&january_history(), BucketScale::Week);
    let middle = &buckets[1];

    assert!(middle.body_fat_percentage.is_present());
    assert!(matches!(middle.fitness_index, MetricSnapshot::Estimated(_)));
}

#[test]
fn test_utc_offset_moves_period_boundaries() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::new(
        AggregationConfig::default(),
        CalendarConfig {
            utc_offset_minutes: -300,
            week_start: Weekday::Mon,
        },
        &interpolation,
    );
    // Monday 03:00 UTC is still Sunday evening at UTC-5
    let history = vec![
        weight(at(2024, 1, 3, 12), 180.0),
        weight(at(2024, 1, 8, 3), 179.0),
    ];

    let buckets = engine.buckets(&history, BucketScale::Week);

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].period_start, date(2024, 1, 1));
    assert_eq!(buckets[0].start, at(2024, 1, 1, 5));
    assert_eq!(buckets[0].observation_count, 2);
}

#[test]
fn test_sunday_week_start() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::new(
        AggregationConfig::default(),
        CalendarConfig {
            utc_offset_minutes: 0,
            week_start: Weekday::Sun,
        },
        &interpolation,
    );

    let buckets = engine.buckets(&[weight(day(2024, 1, 3), 180.0)], BucketScale::Week);

    assert_eq!(buckets[0].period_start, date(2023, 12, 31));
    assert_eq!(buckets[0].id.as_str(), "week:2023-12-31");
}

#[test]
fn test_empty_history_yields_no_buckets() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::from_config(&default_config(), &interpolation);

    assert!(engine.buckets(&[], BucketScale::Month).is_empty());
    assert!(engine.initial_cursor(&[]).is_none());

    let blank = vec![ObservationBuilder::new(day(2024, 1, 1)).build()];
    assert!(engine.buckets(&blank, BucketScale::Week).is_empty());
}

#[test]
fn test_initial_cursor_is_latest_week() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::from_config(&default_config(), &interpolation);

    let cursor = engine.initial_cursor(&january_history()).unwrap();

    assert_eq!(cursor.id.as_str(), "week:2024-01-22");
    assert_eq!(cursor.scale, BucketScale::Week);
}

#[test]
fn test_bucket_containing_locates_instant() {
    let interpolation = InterpolationEngine::from_config(&default_config());
    let engine = AggregationEngine::from_config(&default_config(), &interpolation);
    let buckets = engine.buckets(&january_history(), BucketScale::Week);

    let found = bucket_containing(&buckets, at(2024, 1, 17, 8)).unwrap();
    assert_eq!(found.period_start, date(2024, 1, 15));

    assert!(bucket_containing(&buckets, day(2024, 1, 10)).is_none());
    assert!(bucket_containing(&buckets, day(2024, 1, 29)).is_none());
    assert_eq!(
        bucket_containing(&buckets, day(2024, 1, 22)).unwrap().period_start,
        date(2024, 1, 22)
    );
}
