// ABOUTME: Shape-preserving chart decimation using Largest-Triangle-Three-Buckets
// ABOUTME: Extracts dated metric series and reduces them to a bounded point budget
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Downsampling Engine
//!
//! Largest-Triangle-Three-Buckets keeps the first and last points and picks,
//! for each interior bucket, the point spanning the largest triangle with the
//! previously kept point and the average of the following bucket. The
//! selection is deterministic and the output is always a subsequence of the
//! input.

use chrono::{DateTime, Utc};
use physique_core::models::{ChartPoint, Metric, MetricObservation, SeriesPoint};
use tracing::debug;

use crate::config::{DownsamplingConfig, EngineConfig};
use crate::interpolation::chronological;

/// Stateless LTTB downsampler
#[derive(Debug, Clone, Copy, Default)]
pub struct DownsamplingEngine {
    config: DownsamplingConfig,
}

impl DownsamplingEngine {
    /// Create a downsampler with the given point budget settings
    #[must_use]
    pub const fn new(config: DownsamplingConfig) -> Self {
        Self { config }
    }

    /// Create a downsampler from a validated engine configuration
    #[must_use]
    pub const fn from_config(config: &EngineConfig<true>) -> Self {
        Self::new(config.downsampling)
    }

    /// Configured default point budget
    #[must_use]
    pub const fn default_target(self) -> usize {
        self.config.default_target_points
    }

    /// Reduce `points` to at most `target` points
    ///
    /// Inputs no longer than `target`, or targets below three, are returned
    /// unchanged.
    #[must_use]
    pub fn downsample<P: ChartPoint + Clone>(self, points: &[P], target: usize) -> Vec<P> {
        downsample_indices(points, target)
            .into_iter()
            .filter_map(|index| points.get(index).cloned())
            .collect()
    }

    /// Reduce `points` to the configured default budget
    #[must_use]
    pub fn downsample_default<P: ChartPoint + Clone>(self, points: &[P]) -> Vec<P> {
        self.downsample(points, self.config.default_target_points)
    }

    /// Dated values of `metric` within the inclusive `range`, oldest first
    ///
    /// Observations without a reading for `metric` are skipped.
    #[must_use]
    pub fn chart_series(
        self,
        metric: Metric,
        observations: &[MetricObservation],
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Vec<SeriesPoint> {
        let ordered = chronological(observations);
        let visible = match range {
            Some((from, to)) => {
                let first = ordered.partition_point(|observation| observation.recorded_at() < from);
                let last = ordered.partition_point(|observation| observation.recorded_at() <= to);
                ordered.get(first..last.max(first)).unwrap_or_default()
            }
            None => &*ordered,
        };

        visible
            .iter()
            .filter_map(|observation| {
                observation
                    .value(metric)
                    .map(|value| SeriesPoint::new(observation.recorded_at(), value))
            })
            .collect()
    }
}

/// Indices of the points LTTB keeps, strictly increasing
#[must_use]
pub fn downsample_indices<P: ChartPoint>(points: &[P], target: usize) -> Vec<usize> {
    let len = points.len();
    if len <= target || target < 3 {
        return (0..len).collect();
    }

    let buckets = target - 2;
    let interior = len - 2;
    // First index of interior bucket `i`; bucket `buckets` starts at the last point.
    let bound = |i: usize| -> usize {
        let start = (i as u128 * interior as u128 / buckets as u128) as usize + 1;
        start.min(len - 1)
    };

    let mut selected = Vec::with_capacity(target);
    selected.push(0);
    let mut anchor = 0;

    for bucket in 0..buckets {
        let range_start = bound(bucket).max(anchor + 1);
        let range_end = bound(bucket + 1).max(range_start + 1).min(len - 1);

        let next_start = bound(bucket + 1).min(len - 1);
        let next_end = if bucket + 1 == buckets {
            len
        } else {
            bound(bucket + 2).max(next_start + 1).min(len)
        };

        let Some((avg_x, avg_y)) = average(points.get(next_start..next_end).unwrap_or_default())
        else {
            break;
        };
        let Some(anchor_point) = points.get(anchor) else {
            break;
        };
        let (ax, ay) = (anchor_point.x(), anchor_point.y());

        let mut best = range_start;
        let mut best_area = -1.0_f64;
        for (offset, candidate) in points
            .get(range_start..range_end)
            .unwrap_or_default()
            .iter()
            .enumerate()
        {
            let area = (ax - avg_x)
                .mul_add(candidate.y() - ay, -(ax - candidate.x()) * (avg_y - ay))
                .abs()
                * 0.5;
            if area > best_area {
                best_area = area;
                best = range_start + offset;
            }
        }

        selected.push(best);
        anchor = best;
    }

    selected.push(len - 1);
    debug!(input = len, output = selected.len(), "Downsampled series");
    selected
}

fn average<P: ChartPoint>(points: &[P]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let count = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(x, y), point| (x + point.x(), y + point.y()));
    Some((sum_x / count, sum_y / count))
}
