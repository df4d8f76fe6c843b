// ABOUTME: Groups irregular observations into sparse week/month/year calendar buckets
// ABOUTME: Median snapshots per metric with interpolation fallback and canonical photo selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Aggregation Engine
//!
//! Buckets are anchored to the calendar period holding the newest
//! observation and walk backward a configured number of periods. Periods
//! without any reading or photo are skipped, so bucket lists are sparse.

use chrono::{DateTime, NaiveDate, Utc};
use physique_core::models::{Metric, MetricObservation, PhotoRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::calendar::{
    local_date, local_midnight, next_period_start, period_start, previous_period_start,
    BucketScale,
};
use crate::config::{AggregationConfig, CalendarConfig, EngineConfig};
use crate::estimate::MetricEstimate;
use crate::interpolation::{chronological, InterpolationEngine};

/// Deterministic bucket identifier derived from scale and period start
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketId(String);

impl BucketId {
    /// Identifier for the period of `scale` starting on `period_start`
    #[must_use]
    pub fn new(scale: BucketScale, period_start: NaiveDate) -> Self {
        Self(format!("{}:{}", scale.as_str(), period_start.format("%Y-%m-%d")))
    }

    /// Identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-metric state of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MetricSnapshot {
    /// Median of readings taken inside the period
    Present {
        /// Median value
        value: f64,
        /// Number of readings the median was taken over
        readings: usize,
    },
    /// No reading inside the period; estimated at the period midpoint
    Estimated(MetricEstimate),
    /// Neither a reading nor a defensible estimate
    Missing,
}

impl MetricSnapshot {
    /// Value regardless of provenance
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Present { value, .. } => Some(*value),
            Self::Estimated(estimate) => estimate.value(),
            Self::Missing => None,
        }
    }

    /// Whether the value comes from readings inside the period
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }

    /// Whether no value exists
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// View as an estimate, treating an in-period median as measured at `at`
    fn as_estimate(self, at: DateTime<Utc>) -> MetricEstimate {
        match self {
            Self::Present { value, .. } => MetricEstimate::Measured { value, date: at },
            Self::Estimated(estimate) => estimate,
            Self::Missing => MetricEstimate::Missing,
        }
    }
}

/// Summary of one calendar period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Stable identifier for re-selection across recomputation
    pub id: BucketId,
    /// Calendar granularity
    pub scale: BucketScale,
    /// First local calendar day of the period
    pub period_start: NaiveDate,
    /// Inclusive start instant
    pub start: DateTime<Utc>,
    /// Exclusive end instant
    pub end: DateTime<Utc>,
    /// Weight snapshot
    pub weight: MetricSnapshot,
    /// Body-fat snapshot
    pub body_fat_percentage: MetricSnapshot,
    /// Fitness index derived from the weight and body-fat snapshots
    pub fitness_index: MetricSnapshot,
    /// Photo closest to the period midpoint
    pub canonical_photo: Option<PhotoRef>,
    /// Whether any photo exists in the period
    pub has_any_photo: bool,
    /// Observations falling inside the period
    pub observation_count: usize,
}

impl Bucket {
    /// Midpoint of the period
    #[must_use]
    pub fn midpoint(&self) -> DateTime<Utc> {
        self.start + (self.end - self.start) / 2
    }

    /// Whether `instant` falls in `[start, end)`
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Stateless calendar aggregator
#[derive(Debug, Clone, Copy)]
pub struct AggregationEngine<'a> {
    config: AggregationConfig,
    calendar: CalendarConfig,
    interpolation: &'a InterpolationEngine,
}

impl<'a> AggregationEngine<'a> {
    /// Create an aggregator using `interpolation` for empty-metric fallback
    #[must_use]
    pub const fn new(
        config: AggregationConfig,
        calendar: CalendarConfig,
        interpolation: &'a InterpolationEngine,
    ) -> Self {
        Self {
            config,
            calendar,
            interpolation,
        }
    }

    /// Create an aggregator from a validated engine configuration
    #[must_use]
    pub const fn from_config(
        config: &EngineConfig<true>,
        interpolation: &'a InterpolationEngine,
    ) -> Self {
        Self::new(config.aggregation, config.calendar, interpolation)
    }

    /// Number of periods walked back for `scale`
    #[must_use]
    pub const fn periods(&self, scale: BucketScale) -> u32 {
        match scale {
            BucketScale::Week => self.config.week_periods,
            BucketScale::Month => self.config.month_periods,
            BucketScale::Year => self.config.year_periods,
        }
    }

    /// Non-empty buckets for `scale`, ascending by start
    #[must_use]
    pub fn buckets(&self, observations: &[MetricObservation], scale: BucketScale) -> Vec<Bucket> {
        let ordered = chronological(observations);
        let offset = self.calendar.offset();

        let Some(newest) = ordered.iter().rev().find(|observation| observation.has_any_field())
        else {
            return Vec::new();
        };
        let Some(mut start_day) = period_start(
            scale,
            local_date(newest.recorded_at(), offset),
            self.calendar.week_start,
        ) else {
            return Vec::new();
        };

        let mut buckets = Vec::new();
        for _ in 0..self.periods(scale) {
            let Some(bounds) = self.period_bounds(scale, start_day) else {
                break;
            };
            let (start, end) = bounds;
            let first = ordered.partition_point(|observation| observation.recorded_at() < start);
            let last = ordered.partition_point(|observation| observation.recorded_at() < end);
            let in_period = ordered.get(first..last).unwrap_or_default();

            if in_period.iter().any(MetricObservation::has_any_field) {
                buckets.push(self.build_bucket(scale, start_day, start, end, in_period, &ordered));
            } else {
                debug!(scale = %scale, period_start = %start_day, "Skipping empty period");
            }

            match previous_period_start(scale, start_day) {
                Some(previous) => start_day = previous,
                None => break,
            }
        }

        buckets.reverse();
        buckets
    }

    /// Most recent non-empty week bucket, used to position the initial cursor
    #[must_use]
    pub fn initial_cursor(&self, observations: &[MetricObservation]) -> Option<Bucket> {
        self.buckets(observations, BucketScale::Week).pop()
    }

    fn period_bounds(
        &self,
        scale: BucketScale,
        start_day: NaiveDate,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let offset = self.calendar.offset();
        let end_day = next_period_start(scale, start_day)?;
        Some((
            local_midnight(start_day, offset)?,
            local_midnight(end_day, offset)?,
        ))
    }

    fn build_bucket(
        &self,
        scale: BucketScale,
        period_start: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        in_period: &[MetricObservation],
        ordered: &[MetricObservation],
    ) -> Bucket {
        let midpoint = start + (end - start) / 2;
        let weight = self.snapshot(Metric::Weight, midpoint, in_period, ordered);
        let body_fat_percentage =
            self.snapshot(Metric::BodyFatPercentage, midpoint, in_period, ordered);
        let fitness_index = self.index_snapshot(weight, body_fat_percentage, midpoint);

        let canonical_photo = in_period
            .iter()
            .filter(|observation| observation.photo().is_some())
            .min_by_key(|observation| {
                (
                    (observation.recorded_at() - midpoint).abs(),
                    observation.recorded_at(),
                )
            })
            .and_then(|observation| observation.photo().cloned());

        Bucket {
            id: BucketId::new(scale, period_start),
            scale,
            period_start,
            start,
            end,
            weight,
            body_fat_percentage,
            fitness_index,
            has_any_photo: canonical_photo.is_some(),
            canonical_photo,
            observation_count: in_period.len(),
        }
    }

    fn snapshot(
        &self,
        metric: Metric,
        midpoint: DateTime<Utc>,
        in_period: &[MetricObservation],
        ordered: &[MetricObservation],
    ) -> MetricSnapshot {
        let mut readings: Vec<f64> = in_period
            .iter()
            .filter_map(|observation| observation.value(metric))
            .collect();

        if let Some(value) = median(&mut readings) {
            return MetricSnapshot::Present {
                value,
                readings: readings.len(),
            };
        }

        match self.interpolation.estimate_in_order(midpoint, metric, ordered) {
            MetricEstimate::Missing => MetricSnapshot::Missing,
            estimate => MetricSnapshot::Estimated(estimate),
        }
    }

    fn index_snapshot(
        &self,
        weight: MetricSnapshot,
        body_fat: MetricSnapshot,
        midpoint: DateTime<Utc>,
    ) -> MetricSnapshot {
        match (weight, body_fat) {
            (
                MetricSnapshot::Present {
                    value: weight,
                    readings: weight_readings,
                },
                MetricSnapshot::Present {
                    value: body_fat,
                    readings: body_fat_readings,
                },
            ) => self
                .interpolation
                .fitness_index_value(weight, body_fat)
                .map_or(MetricSnapshot::Missing, |value| MetricSnapshot::Present {
                    value,
                    readings: weight_readings.min(body_fat_readings),
                }),
            (MetricSnapshot::Missing, _) | (_, MetricSnapshot::Missing) => MetricSnapshot::Missing,
            (weight, body_fat) => match self
                .interpolation
                .fitness_index_from(weight.as_estimate(midpoint), body_fat.as_estimate(midpoint))
            {
                MetricEstimate::Missing => MetricSnapshot::Missing,
                estimate => MetricSnapshot::Estimated(estimate),
            },
        }
    }
}

/// Bucket covering `instant`, if any; `buckets` must be ascending
#[must_use]
pub fn bucket_containing(buckets: &[Bucket], instant: DateTime<Utc>) -> Option<&Bucket> {
    let index = buckets.partition_point(|bucket| bucket.end <= instant);
    buckets.get(index).filter(|bucket| bucket.contains(instant))
}

/// Median of the values, sorting them in place
fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
