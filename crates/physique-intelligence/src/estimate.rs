// ABOUTME: Tagged estimate type returned by the interpolation engine
// ABOUTME: Encodes provenance and confidence in one variant so invalid flag mixes cannot exist
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trust grade of a value, ordered from least to most trustworthy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// Wide gap or stale carry-forward
    Low,
    /// Moderate gap between anchors
    Medium,
    /// Short gap between anchors
    High,
    /// A real reading
    Measured,
}

/// Value of a metric at an instant, with how it was obtained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricEstimate {
    /// A reading exists exactly at the requested instant
    Measured {
        /// Recorded value
        value: f64,
        /// Instant of the reading
        date: DateTime<Utc>,
    },
    /// Linear interpolation between the surrounding readings
    Interpolated {
        /// Interpolated value
        value: f64,
        /// Grade derived from the anchor gap
        confidence: ConfidenceLevel,
        /// Earlier anchor
        from_date: DateTime<Utc>,
        /// Later anchor
        to_date: DateTime<Utc>,
    },
    /// Last known reading held past the end of the series
    CarriedForward {
        /// Last known value
        value: f64,
        /// Grade of the held value
        confidence: ConfidenceLevel,
        /// Instant of the last reading
        as_of_date: DateTime<Utc>,
    },
    /// No defensible value
    Missing,
}

impl MetricEstimate {
    /// Numeric value, `None` when missing
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Measured { value, .. }
            | Self::Interpolated { value, .. }
            | Self::CarriedForward { value, .. } => Some(*value),
            Self::Missing => None,
        }
    }

    /// Confidence grade, `None` when missing
    #[must_use]
    pub const fn confidence(&self) -> Option<ConfidenceLevel> {
        match self {
            Self::Measured { .. } => Some(ConfidenceLevel::Measured),
            Self::Interpolated { confidence, .. } | Self::CarriedForward { confidence, .. } => {
                Some(*confidence)
            }
            Self::Missing => None,
        }
    }

    /// Whether the estimate carries no value
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Whether the value is a direct reading
    #[must_use]
    pub const fn is_measured(&self) -> bool {
        matches!(self, Self::Measured { .. })
    }

    /// Real reading instants the value was produced from
    #[must_use]
    pub fn anchor_dates(&self) -> Vec<DateTime<Utc>> {
        match self {
            Self::Measured { date, .. } => vec![*date],
            Self::Interpolated {
                from_date, to_date, ..
            } => vec![*from_date, *to_date],
            Self::CarriedForward { as_of_date, .. } => vec![*as_of_date],
            Self::Missing => Vec::new(),
        }
    }

    /// Earliest anchor instant
    const fn earliest_anchor(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Measured { date, .. } => Some(*date),
            Self::Interpolated { from_date, .. } => Some(*from_date),
            Self::CarriedForward { as_of_date, .. } => Some(*as_of_date),
            Self::Missing => None,
        }
    }

    /// Latest anchor instant
    const fn latest_anchor(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Measured { date, .. } => Some(*date),
            Self::Interpolated { to_date, .. } => Some(*to_date),
            Self::CarriedForward { as_of_date, .. } => Some(*as_of_date),
            Self::Missing => None,
        }
    }

    /// Combine two estimates into a derived one
    ///
    /// Missing on either side yields `Missing`. Otherwise the weaker
    /// provenance wins: any carried-forward input makes the result
    /// carried-forward as of the stalest input; any interpolated input makes
    /// it interpolated across the union of the anchor windows. Confidence is
    /// the lower of the two.
    #[must_use]
    pub fn combine_with(self, other: Self, derive: impl FnOnce(f64, f64) -> f64) -> Self {
        let (Some(left), Some(right)) = (self.value(), other.value()) else {
            return Self::Missing;
        };
        let (Some(left_confidence), Some(right_confidence)) =
            (self.confidence(), other.confidence())
        else {
            return Self::Missing;
        };
        let value = derive(left, right);
        let confidence = left_confidence.min(right_confidence);

        match (self, other) {
            (Self::Measured { date, .. }, Self::Measured { date: other_date, .. }) => {
                Self::Measured {
                    value,
                    date: date.max(other_date),
                }
            }
            (
                Self::CarriedForward { as_of_date, .. },
                Self::CarriedForward { as_of_date: b, .. },
            ) => Self::CarriedForward {
                value,
                confidence,
                as_of_date: as_of_date.min(b),
            },
            (Self::CarriedForward { as_of_date, .. }, _)
            | (_, Self::CarriedForward { as_of_date, .. }) => Self::CarriedForward {
                value,
                confidence,
                as_of_date,
            },
            _ => {
                let from_date = self.earliest_anchor().min(other.earliest_anchor());
                let to_date = self.latest_anchor().max(other.latest_anchor());
                match (from_date, to_date) {
                    (Some(from_date), Some(to_date)) => Self::Interpolated {
                        value,
                        confidence,
                        from_date,
                        to_date,
                    },
                    _ => Self::Missing,
                }
            }
        }
    }
}
