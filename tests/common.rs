// ABOUTME: Shared test utilities and observation builders for integration tests
// ABOUTME: Provides quiet logging setup, fixed dates, and validated engine configs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `physique_metrics`

use chrono::{DateTime, TimeZone, Utc};
use physique_metrics::intelligence::config::{EngineConfig, WeightUnit};
use physique_metrics::models::{MetricObservation, ObservationBuilder};
use std::env;
use std::sync::Once;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Midnight UTC on the given day
pub fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

/// Given hour UTC on the given day
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

/// Observation carrying only a weight reading
pub fn weight(recorded_at: DateTime<Utc>, value: f64) -> MetricObservation {
    ObservationBuilder::new(recorded_at).weight(value).build()
}

/// Observation carrying only a body-fat reading
pub fn body_fat(recorded_at: DateTime<Utc>, percent: f64) -> MetricObservation {
    ObservationBuilder::new(recorded_at)
        .body_fat_percentage(percent)
        .build()
}

/// Observation carrying both readings
pub fn reading(recorded_at: DateTime<Utc>, weight: f64, percent: f64) -> MetricObservation {
    ObservationBuilder::new(recorded_at)
        .weight(weight)
        .body_fat_percentage(percent)
        .build()
}

/// Observation carrying only a progress photo
pub fn photo(recorded_at: DateTime<Utc>, key: &str) -> MetricObservation {
    ObservationBuilder::new(recorded_at).photo(key).build()
}

/// Default configuration, validated
pub fn default_config() -> EngineConfig<true> {
    EngineConfig::<false>::default().validate().unwrap()
}

/// Validated configuration with a height and pound weights
pub fn config_with_height(height_m: f64) -> EngineConfig<true> {
    let mut config = EngineConfig::<false>::default();
    config.fitness_index.height_m = Some(height_m);
    config.fitness_index.weight_unit = WeightUnit::Pounds;
    config.validate().unwrap()
}
