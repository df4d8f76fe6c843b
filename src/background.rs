// ABOUTME: Background execution of chart downsampling and bucket aggregation
// ABOUTME: Fingerprints request inputs and discards results superseded by a newer request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Background Work
//!
//! Engine calls are pure, so cancellation is implicit: every request is
//! tagged with a [`Fingerprint`] of its input snapshot, and a result is only
//! handed back if its fingerprint is still the latest one the gate accepted.
//! Large inputs run on tokio's blocking pool so the async executor never
//! stalls on triangle selection or bucket medians.

use std::fmt;

use physique_core::errors::{AppError, AppResult};
use physique_core::models::{ChartPoint, MetricObservation, SeriesPoint};
use physique_intelligence::config::{AggregationConfig, CalendarConfig, EngineConfig};
use physique_intelligence::{
    AggregationEngine, Bucket, BucketScale, DownsamplingEngine, InterpolationEngine,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tokio::task;
use tracing::debug;

use crate::config::BackgroundConfig;

/// SHA-256 digest identifying the input snapshot of a request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Digest of a chart request: point count, target, and boundary points
    #[must_use]
    pub fn of_series<P: ChartPoint>(points: &[P], target: usize) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"series");
        hasher.update((points.len() as u64).to_le_bytes());
        hasher.update((target as u64).to_le_bytes());
        for point in points.first().into_iter().chain(points.last()) {
            hasher.update(point.x().to_le_bytes());
            hasher.update(point.y().to_le_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// Digest of an observation snapshot under a request `scope`
    ///
    /// Every observation contributes its id, timestamp, and revision, so any
    /// edit, insertion, or deletion changes the digest.
    #[must_use]
    pub fn of_observations(observations: &[MetricObservation], scope: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(scope.as_bytes());
        hasher.update((observations.len() as u64).to_le_bytes());
        for observation in observations {
            hasher.update(observation.id().as_bytes());
            hasher.update(observation.recorded_at().timestamp_millis().to_le_bytes());
            hasher.update(observation.revision().to_le_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// Hex-encoded digest
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tracks the latest accepted request and drops results of older ones
#[derive(Debug, Default)]
pub struct FreshnessGate {
    latest: Mutex<Option<Fingerprint>>,
}

impl FreshnessGate {
    /// Create a gate with no request in flight
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `fingerprint` as the latest request, superseding any other
    pub async fn begin(&self, fingerprint: Fingerprint) {
        *self.latest.lock().await = Some(fingerprint);
    }

    /// Whether `fingerprint` is still the latest accepted request
    pub async fn is_current(&self, fingerprint: &Fingerprint) -> bool {
        self.latest.lock().await.as_ref() == Some(fingerprint)
    }

    /// Run `work` for the request `fingerprint`
    ///
    /// With `offload` set, the work runs on the blocking pool. Returns
    /// `Ok(None)` when a newer request was accepted before the work finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the blocking task panics or is cancelled
    pub async fn run<T, F>(
        &self,
        fingerprint: Fingerprint,
        offload: bool,
        work: F,
    ) -> AppResult<Option<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        self.begin(fingerprint.clone()).await;

        let result = if offload {
            task::spawn_blocking(work).await.map_err(|e| {
                AppError::background_task(format!("Background computation failed: {e}"))
                    .with_source(e)
            })?
        } else {
            work()
        };

        if self.is_current(&fingerprint).await {
            Ok(Some(result))
        } else {
            debug!(fingerprint = %fingerprint, "Discarding stale background result");
            Ok(None)
        }
    }
}

/// Downsampler that offloads large series and drops stale results
#[derive(Debug)]
pub struct ChartDownsampler {
    engine: DownsamplingEngine,
    background: BackgroundConfig,
    gate: FreshnessGate,
}

impl ChartDownsampler {
    /// Create a downsampler from its engine and background settings
    #[must_use]
    pub fn new(engine: DownsamplingEngine, background: BackgroundConfig) -> Self {
        Self {
            engine,
            background,
            gate: FreshnessGate::new(),
        }
    }

    /// Create a downsampler from validated engine settings
    #[must_use]
    pub fn from_config(config: &EngineConfig<true>, background: BackgroundConfig) -> Self {
        Self::new(DownsamplingEngine::from_config(config), background)
    }

    /// Downsample `points` to `target`; `None` if a newer request superseded this one
    ///
    /// # Errors
    ///
    /// Returns an error if the background task fails
    pub async fn downsample(
        &self,
        points: Vec<SeriesPoint>,
        target: usize,
    ) -> AppResult<Option<Vec<SeriesPoint>>> {
        let fingerprint = Fingerprint::of_series(&points, target);
        let offload = self.background.should_offload(points.len());
        let engine = self.engine;
        self.gate
            .run(fingerprint, offload, move || engine.downsample(&points, target))
            .await
    }

    /// Downsample `points` to the configured default target
    ///
    /// # Errors
    ///
    /// Returns an error if the background task fails
    pub async fn downsample_default(
        &self,
        points: Vec<SeriesPoint>,
    ) -> AppResult<Option<Vec<SeriesPoint>>> {
        let target = self.engine.default_target();
        self.downsample(points, target).await
    }
}

/// Buckets for every scale computed from one snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiScaleBuckets {
    /// Week buckets, ascending
    pub week: Vec<Bucket>,
    /// Month buckets, ascending
    pub month: Vec<Bucket>,
    /// Year buckets, ascending
    pub year: Vec<Bucket>,
}

/// Aggregator that offloads large histories and drops stale results
#[derive(Debug)]
pub struct BackgroundAggregator {
    interpolation: InterpolationEngine,
    aggregation: AggregationConfig,
    calendar: CalendarConfig,
    background: BackgroundConfig,
    gate: FreshnessGate,
}

impl BackgroundAggregator {
    /// Create an aggregator from validated engine settings
    #[must_use]
    pub fn from_config(config: &EngineConfig<true>, background: BackgroundConfig) -> Self {
        Self {
            interpolation: InterpolationEngine::from_config(config),
            aggregation: config.aggregation,
            calendar: config.calendar,
            background,
            gate: FreshnessGate::new(),
        }
    }

    /// Buckets at one scale; `None` if a newer request superseded this one
    ///
    /// # Errors
    ///
    /// Returns an error if the background task fails
    pub async fn buckets(
        &self,
        observations: Vec<MetricObservation>,
        scale: BucketScale,
    ) -> AppResult<Option<Vec<Bucket>>> {
        let fingerprint = Fingerprint::of_observations(&observations, scale.as_str());
        let offload = self.background.should_offload(observations.len());
        let (interpolation, aggregation, calendar) =
            (self.interpolation, self.aggregation, self.calendar);

        self.gate
            .run(fingerprint, offload, move || {
                AggregationEngine::new(aggregation, calendar, &interpolation)
                    .buckets(&observations, scale)
            })
            .await
    }

    /// Buckets at every scale, computed in parallel
    ///
    /// # Errors
    ///
    /// Returns an error if the background task fails
    pub async fn all_scales(
        &self,
        observations: Vec<MetricObservation>,
    ) -> AppResult<Option<MultiScaleBuckets>> {
        let fingerprint = Fingerprint::of_observations(&observations, "all_scales");
        let offload = self.background.should_offload(observations.len());
        let (interpolation, aggregation, calendar) =
            (self.interpolation, self.aggregation, self.calendar);

        self.gate
            .run(fingerprint, offload, move || {
                let engine = AggregationEngine::new(aggregation, calendar, &interpolation);
                let (week, (month, year)) = rayon::join(
                    || engine.buckets(&observations, BucketScale::Week),
                    || {
                        rayon::join(
                            || engine.buckets(&observations, BucketScale::Month),
                            || engine.buckets(&observations, BucketScale::Year),
                        )
                    },
                );
                MultiScaleBuckets { week, month, year }
            })
            .await
    }
}
