// ABOUTME: Metric selectors and chart point types for body-composition series
// ABOUTME: Defines Metric, SeriesPoint, and the ChartPoint abstraction used by downsampling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Directly observed metric carried by a [`MetricObservation`](super::MetricObservation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Body weight
    Weight,
    /// Body-fat percentage
    BodyFatPercentage,
}

impl Metric {
    /// Both directly observed metrics
    pub const ALL: [Self; 2] = [Self::Weight, Self::BodyFatPercentage];

    /// Stable snake-case name, used in logs and environment keys
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weight => "weight",
            Self::BodyFatPercentage => "body_fat_percentage",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything with a numeric position on both chart axes
pub trait ChartPoint {
    /// Horizontal coordinate (time, index, ...)
    fn x(&self) -> f64;
    /// Vertical coordinate
    fn y(&self) -> f64;
}

/// A dated value ready to be charted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Instant of the value
    pub date: DateTime<Utc>,
    /// Metric value
    pub value: f64,
}

impl SeriesPoint {
    /// Create a new chart point
    #[must_use]
    pub const fn new(date: DateTime<Utc>, value: f64) -> Self {
        Self { date, value }
    }
}

impl ChartPoint for SeriesPoint {
    // Millisecond precision keeps f64 exact for any realistic timestamp.
    #[allow(clippy::cast_precision_loss)]
    fn x(&self) -> f64 {
        self.date.timestamp_millis() as f64
    }

    fn y(&self) -> f64 {
        self.value
    }
}

impl ChartPoint for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }

    fn y(&self) -> f64 {
        self.1
    }
}
