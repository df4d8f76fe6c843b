// ABOUTME: Immutable, de-duplicated, time-ordered snapshot of observation records
// ABOUTME: Resolves revisions and soft deletes and discards implausible readings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::MetricObservation;
use crate::constants::validation::{
    MAX_BODY_FAT_PERCENT, MAX_WEIGHT, MIN_BODY_FAT_PERCENT, MIN_WEIGHT,
};

/// Plausibility window for incoming readings
///
/// Values outside the window are cleared from the snapshot (the rest of the
/// observation survives) so one mistyped entry cannot poison interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationRanges {
    /// Lowest accepted weight
    pub min_weight: f64,
    /// Highest accepted weight
    pub max_weight: f64,
    /// Lowest accepted body-fat percentage
    pub min_body_fat_percent: f64,
    /// Highest accepted body-fat percentage
    pub max_body_fat_percent: f64,
}

impl Default for ValidationRanges {
    fn default() -> Self {
        Self {
            min_weight: MIN_WEIGHT,
            max_weight: MAX_WEIGHT,
            min_body_fat_percent: MIN_BODY_FAT_PERCENT,
            max_body_fat_percent: MAX_BODY_FAT_PERCENT,
        }
    }
}

impl ValidationRanges {
    fn accepts_weight(&self, weight: f64) -> bool {
        weight.is_finite() && (self.min_weight..=self.max_weight).contains(&weight)
    }

    fn accepts_body_fat(&self, percent: f64) -> bool {
        percent.is_finite()
            && (self.min_body_fat_percent..=self.max_body_fat_percent).contains(&percent)
    }
}

/// Visible state of an observation history
///
/// Unique by id and sorted by `(recorded_at, id)`, which gives the total order
/// every engine relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationSeries {
    observations: Vec<MetricObservation>,
}

impl ObservationSeries {
    /// Build the visible snapshot from raw records
    ///
    /// For each id the highest revision wins. Ids whose winning revision is
    /// soft-deleted are dropped. Readings outside `ranges` are cleared.
    #[must_use]
    pub fn from_records<I>(records: I, ranges: &ValidationRanges) -> Self
    where
        I: IntoIterator<Item = MetricObservation>,
    {
        let mut latest: HashMap<Uuid, MetricObservation> = HashMap::new();
        for record in records {
            match latest.get(&record.id()) {
                Some(existing) if existing.revision() >= record.revision() => {}
                _ => {
                    latest.insert(record.id(), record);
                }
            }
        }

        let mut observations: Vec<MetricObservation> = latest
            .into_values()
            .filter(|observation| {
                if observation.is_deleted() {
                    debug!(observation_id = %observation.id(), "Dropping soft-deleted observation");
                }
                !observation.is_deleted()
            })
            .map(|mut observation| {
                if let Some(weight) = observation.weight() {
                    if !ranges.accepts_weight(weight) {
                        warn!(
                            observation_id = %observation.id(),
                            weight,
                            "Discarding implausible weight reading"
                        );
                        observation.clear_weight();
                    }
                }
                if let Some(percent) = observation.body_fat_percentage() {
                    if !ranges.accepts_body_fat(percent) {
                        warn!(
                            observation_id = %observation.id(),
                            body_fat_percentage = percent,
                            "Discarding implausible body-fat reading"
                        );
                        observation.clear_body_fat();
                    }
                }
                observation
            })
            .collect();

        observations.sort_by(|a, b| {
            a.recorded_at()
                .cmp(&b.recorded_at())
                .then_with(|| a.id().cmp(&b.id()))
        });

        Self { observations }
    }

    /// Borrow the ordered observations
    #[must_use]
    pub fn as_slice(&self) -> &[MetricObservation] {
        &self.observations
    }

    /// Consume the snapshot
    #[must_use]
    pub fn into_inner(self) -> Vec<MetricObservation> {
        self.observations
    }
}

impl Deref for ObservationSeries {
    type Target = [MetricObservation];

    fn deref(&self) -> &Self::Target {
        &self.observations
    }
}

/// Whether a slice is already in engine order (by timestamp)
#[must_use]
pub fn is_chronological(observations: &[MetricObservation]) -> bool {
    observations
        .windows(2)
        .all(|pair| pair[0].recorded_at() <= pair[1].recorded_at())
}
