// ABOUTME: Body-composition observation record and its builder
// ABOUTME: One timestamped reading of weight, body fat, and/or a progress photo reference
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::Metric;

/// Where an observation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObservationSource {
    /// Entered by hand
    #[default]
    Manual,
    /// Pushed by a paired scale or body-composition device
    DeviceSync,
    /// Imported from a third-party health integration
    Integration,
}

/// Opaque reference to a stored progress photo
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    /// Wrap a storage key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Storage key as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single timestamped body-composition record
///
/// Records are immutable. Editing or soft-deleting an observation produces a
/// new record carrying the same `id` and a higher `revision`; the visible
/// state is resolved by [`ObservationSeries`](super::ObservationSeries).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricObservation {
    id: Uuid,
    recorded_at: DateTime<Utc>,
    weight: Option<f64>,
    body_fat_percentage: Option<f64>,
    photo: Option<PhotoRef>,
    source: ObservationSource,
    #[serde(default)]
    revision: u32,
    #[serde(default)]
    deleted_at: Option<DateTime<Utc>>,
}

impl MetricObservation {
    /// Stable identifier shared by every revision of this observation
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Instant the reading was taken
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Body weight in the configured weight unit
    #[must_use]
    pub const fn weight(&self) -> Option<f64> {
        self.weight
    }

    /// Body-fat percentage (0-100)
    #[must_use]
    pub const fn body_fat_percentage(&self) -> Option<f64> {
        self.body_fat_percentage
    }

    /// Progress photo attached to this observation
    #[must_use]
    pub const fn photo(&self) -> Option<&PhotoRef> {
        self.photo.as_ref()
    }

    /// Origin of the record
    #[must_use]
    pub const fn source(&self) -> ObservationSource {
        self.source
    }

    /// Revision counter, higher wins
    #[must_use]
    pub const fn revision(&self) -> u32 {
        self.revision
    }

    /// Soft-delete marker
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Whether this revision hides the observation
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Reading for the given metric, if recorded
    #[must_use]
    pub const fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Weight => self.weight,
            Metric::BodyFatPercentage => self.body_fat_percentage,
        }
    }

    /// True when at least one metric or a photo is present
    #[must_use]
    pub const fn has_any_field(&self) -> bool {
        self.weight.is_some() || self.body_fat_percentage.is_some() || self.photo.is_some()
    }

    /// Produce the next revision with edited readings
    #[must_use]
    pub fn edited(&self, weight: Option<f64>, body_fat_percentage: Option<f64>) -> Self {
        Self {
            weight,
            body_fat_percentage,
            revision: self.revision.saturating_add(1),
            ..self.clone()
        }
    }

    /// Produce the next revision marked as soft-deleted
    #[must_use]
    pub fn soft_deleted(&self, at: DateTime<Utc>) -> Self {
        Self {
            revision: self.revision.saturating_add(1),
            deleted_at: Some(at),
            ..self.clone()
        }
    }

    pub(crate) fn clear_weight(&mut self) {
        self.weight = None;
    }

    pub(crate) fn clear_body_fat(&mut self) {
        self.body_fat_percentage = None;
    }
}

/// Builder for [`MetricObservation`]
#[derive(Debug, Clone)]
pub struct ObservationBuilder {
    observation: MetricObservation,
}

impl ObservationBuilder {
    /// Start a new observation with a fresh identifier
    #[must_use]
    pub fn new(recorded_at: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4(), recorded_at)
    }

    /// Start a new observation with a caller-supplied identifier
    #[must_use]
    pub fn with_id(id: Uuid, recorded_at: DateTime<Utc>) -> Self {
        Self {
            observation: MetricObservation {
                id,
                recorded_at,
                weight: None,
                body_fat_percentage: None,
                photo: None,
                source: ObservationSource::Manual,
                revision: 0,
                deleted_at: None,
            },
        }
    }

    /// Set body weight
    #[must_use]
    pub fn weight(mut self, weight: f64) -> Self {
        self.observation.weight = Some(weight);
        self
    }

    /// Set body-fat percentage
    #[must_use]
    pub fn body_fat_percentage(mut self, percent: f64) -> Self {
        self.observation.body_fat_percentage = Some(percent);
        self
    }

    /// Attach a progress photo
    #[must_use]
    pub fn photo(mut self, photo: impl Into<String>) -> Self {
        self.observation.photo = Some(PhotoRef::new(photo));
        self
    }

    /// Set the record origin
    #[must_use]
    pub fn source(mut self, source: ObservationSource) -> Self {
        self.observation.source = source;
        self
    }

    /// Set the revision counter
    #[must_use]
    pub fn revision(mut self, revision: u32) -> Self {
        self.observation.revision = revision;
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> MetricObservation {
        self.observation
    }
}
