// ABOUTME: Estimates metric values at arbitrary instants from sparse observations
// ABOUTME: Linear interpolation with confidence grading, bounded carry-forward, and FFMI derivation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Interpolation Engine
//!
//! Resolution order for a target instant `T`:
//!
//! 1. A reading exactly at `T` is returned as `Measured`.
//! 2. Readings on both sides are linearly interpolated by elapsed time; the
//!    confidence grade is a step function of the gap between the anchors.
//! 3. A reading only before `T` is carried forward with `Low` confidence
//!    inside the staleness window, `Missing` beyond it.
//! 4. A reading only after `T` yields `Missing`: values are never
//!    extrapolated backward past the first real reading.

#![allow(clippy::cast_precision_loss)] // Safe: millisecond spans of realistic histories fit in f64

use std::borrow::Cow;

use chrono::{DateTime, Duration, Utc};
use physique_core::constants::body_composition::{
    FFMI_HEIGHT_NORMALIZATION_SLOPE, FFMI_REFERENCE_HEIGHT_M, PERCENT,
};
use physique_core::models::{is_chronological, Metric, MetricObservation};
use rayon::prelude::*;
use tracing::debug;

use crate::calendar::days;
use crate::config::{EngineConfig, FfmiFormula, FitnessIndexConfig, InterpolationConfig};
use crate::estimate::{ConfidenceLevel, MetricEstimate};

/// Sort a borrowed history only when it is out of order
pub(crate) fn chronological(observations: &[MetricObservation]) -> Cow<'_, [MetricObservation]> {
    if is_chronological(observations) {
        Cow::Borrowed(observations)
    } else {
        let mut sorted = observations.to_vec();
        sorted.sort_by(|a, b| {
            a.recorded_at()
                .cmp(&b.recorded_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Cow::Owned(sorted)
    }
}

/// Stateless estimator for weight, body fat, and the derived fitness index
#[derive(Debug, Clone, Copy, Default)]
pub struct InterpolationEngine {
    config: InterpolationConfig,
    fitness: FitnessIndexConfig,
}

impl InterpolationEngine {
    /// Create an engine from its configuration sections
    #[must_use]
    pub const fn new(config: InterpolationConfig, fitness: FitnessIndexConfig) -> Self {
        Self { config, fitness }
    }

    /// Create an engine from a validated engine configuration
    #[must_use]
    pub const fn from_config(config: &EngineConfig<true>) -> Self {
        Self::new(config.interpolation, config.fitness_index)
    }

    /// Fitness index settings in use
    #[must_use]
    pub const fn fitness_config(&self) -> &FitnessIndexConfig {
        &self.fitness
    }

    /// Estimate `metric` at `target`
    ///
    /// The history is sorted internally when it is not already chronological.
    #[must_use]
    pub fn estimate(
        &self,
        target: DateTime<Utc>,
        metric: Metric,
        observations: &[MetricObservation],
    ) -> MetricEstimate {
        let ordered = chronological(observations);
        self.estimate_in_order(target, metric, &ordered)
    }

    /// Estimate `metric` at many instants over one sorted copy of the history
    ///
    /// Instants are resolved in parallel; output order matches `instants`.
    #[must_use]
    pub fn estimate_series(
        &self,
        metric: Metric,
        observations: &[MetricObservation],
        instants: &[DateTime<Utc>],
    ) -> Vec<MetricEstimate> {
        let ordered = chronological(observations);
        instants
            .par_iter()
            .map(|&instant| self.estimate_in_order(instant, metric, &ordered))
            .collect()
    }

    /// Derived fitness index (FFMI) at `target`
    ///
    /// Weight and body fat are resolved independently; either one missing
    /// makes the index missing, as does an unconfigured height.
    #[must_use]
    pub fn fitness_index(
        &self,
        target: DateTime<Utc>,
        observations: &[MetricObservation],
    ) -> MetricEstimate {
        let ordered = chronological(observations);
        let weight = self.estimate_in_order(target, Metric::Weight, &ordered);
        let body_fat = self.estimate_in_order(target, Metric::BodyFatPercentage, &ordered);
        self.fitness_index_from(weight, body_fat)
    }

    /// Combine already-resolved weight and body-fat estimates into an index estimate
    #[must_use]
    pub fn fitness_index_from(
        &self,
        weight: MetricEstimate,
        body_fat: MetricEstimate,
    ) -> MetricEstimate {
        let Some(height_m) = self.fitness.height_m else {
            debug!("Fitness index requested without a configured height");
            return MetricEstimate::Missing;
        };
        let weight_unit = self.fitness.weight_unit;
        let formula = self.fitness.formula;
        weight.combine_with(body_fat, |weight, body_fat| {
            ffmi(weight * weight_unit.to_kilograms_factor(), body_fat, height_m, formula)
        })
    }

    /// Index value for a single weight/body-fat pair, `None` without a height
    #[must_use]
    pub fn fitness_index_value(&self, weight: f64, body_fat_percentage: f64) -> Option<f64> {
        self.fitness.height_m.map(|height_m| {
            ffmi(
                weight * self.fitness.weight_unit.to_kilograms_factor(),
                body_fat_percentage,
                height_m,
                self.fitness.formula,
            )
        })
    }

    /// Confidence grade for the gap between two anchors
    #[must_use]
    pub fn confidence_for_gap(&self, gap: Duration) -> ConfidenceLevel {
        if gap <= days(self.config.high_confidence_max_gap_days) {
            ConfidenceLevel::High
        } else if gap <= days(self.config.medium_confidence_max_gap_days) {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    /// Estimate over a history already in chronological order
    pub(crate) fn estimate_in_order(
        &self,
        target: DateTime<Utc>,
        metric: Metric,
        ordered: &[MetricObservation],
    ) -> MetricEstimate {
        let split = ordered.partition_point(|observation| observation.recorded_at() < target);
        let (before, from_target) = ordered.split_at(split);

        let at_target = from_target
            .iter()
            .take_while(|observation| observation.recorded_at() == target);
        for observation in at_target {
            if let Some(value) = observation.value(metric) {
                return MetricEstimate::Measured {
                    value,
                    date: target,
                };
            }
        }

        let previous = before.iter().rev().find_map(|observation| {
            observation
                .value(metric)
                .map(|value| (observation.recorded_at(), value))
        });
        let next = from_target
            .iter()
            .filter(|observation| observation.recorded_at() > target)
            .find_map(|observation| {
                observation
                    .value(metric)
                    .map(|value| (observation.recorded_at(), value))
            });

        match (previous, next) {
            (Some((from_date, from_value)), Some((to_date, to_value))) => {
                let span = (to_date - from_date).num_milliseconds() as f64;
                let elapsed = (target - from_date).num_milliseconds() as f64;
                let fraction = if span > 0.0 { elapsed / span } else { 0.0 };
                MetricEstimate::Interpolated {
                    value: (to_value - from_value).mul_add(fraction, from_value),
                    confidence: self.confidence_for_gap(to_date - from_date),
                    from_date,
                    to_date,
                }
            }
            (Some((as_of_date, value)), None) => {
                if target - as_of_date <= days(self.config.max_carry_forward_days) {
                    MetricEstimate::CarriedForward {
                        value,
                        confidence: ConfidenceLevel::Low,
                        as_of_date,
                    }
                } else {
                    debug!(
                        metric = %metric,
                        %target,
                        %as_of_date,
                        "Last reading is beyond the carry-forward window"
                    );
                    MetricEstimate::Missing
                }
            }
            (None, _) => MetricEstimate::Missing,
        }
    }
}

/// Fat-free mass index from weight in kilograms
fn ffmi(weight_kg: f64, body_fat_percentage: f64, height_m: f64, formula: FfmiFormula) -> f64 {
    let lean_mass_kg = weight_kg * (1.0 - body_fat_percentage / PERCENT);
    let index = lean_mass_kg / (height_m * height_m);
    match formula {
        FfmiFormula::Standard => index,
        FfmiFormula::HeightNormalized => {
            FFMI_HEIGHT_NORMALIZATION_SLOPE.mul_add(FFMI_REFERENCE_HEIGHT_M - height_m, index)
        }
    }
}
