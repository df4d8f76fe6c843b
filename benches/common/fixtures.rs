// ABOUTME: Benchmark fixtures generating realistic body-composition histories
// ABOUTME: Deterministic, sparse, irregular weigh-ins so runs are reproducible
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Benchmark fixtures for generating observation histories.
//!
//! Histories end at a fixed instant so bucket and scrubber results do not
//! drift between runs.

use chrono::{DateTime, Duration, TimeZone, Utc};
use physique_metrics::models::{MetricObservation, ObservationBuilder, SeriesPoint};

/// Predefined history sizes for benchmark scenarios
#[derive(Debug, Clone, Copy)]
pub enum HistorySize {
    /// A few months of occasional weigh-ins
    Small,
    /// A couple of years of regular tracking
    Medium,
    /// A decade of daily tracking with a scale that syncs twice a day
    Large,
}

impl HistorySize {
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::Small => 50,
            Self::Medium => 1_000,
            Self::Large => 7_000,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// Instant every generated history ends at
#[must_use]
pub fn bench_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Generate `size` observations ending at [`bench_now`], oldest first
///
/// Gaps alternate between half a day and several days; every third
/// observation carries a body-fat reading and every tenth a photo.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap
)]
#[must_use]
pub fn generate_history(size: HistorySize) -> Vec<MetricObservation> {
    let count = size.count();
    let mut date = bench_now();
    let mut history: Vec<MetricObservation> = (0..count)
        .map(|index| {
            let gap_hours = 12 + ((index * 37) % 5) as i64 * 12;
            date -= Duration::hours(gap_hours);
            let drift = (index as f64 / 40.0).sin() * 3.0;
            let mut builder = ObservationBuilder::new(date).weight(180.0 + drift);
            if index % 3 == 0 {
                builder = builder.body_fat_percentage(20.0 + drift / 2.0);
            }
            if index % 10 == 0 {
                builder = builder.photo(format!("bench/photo_{index}.jpg"));
            }
            builder.build()
        })
        .collect();
    history.reverse();
    history
}

/// Hourly chart points with a slow trend and daily noise
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
#[must_use]
pub fn generate_series(count: usize) -> Vec<SeriesPoint> {
    let start = bench_now() - Duration::hours(count as i64);
    (0..count)
        .map(|index| {
            let x = index as f64;
            SeriesPoint::new(
                start + Duration::hours(index as i64),
                (x / 24.0).sin().mul_add(1.5, 180.0 - x / 2_000.0),
            )
        })
        .collect()
}
