// ABOUTME: Interpolation and fitness-index configuration types
// ABOUTME: Confidence gap thresholds, carry-forward staleness, height and unit settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use physique_core::constants::units::KG_PER_POUND;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ConfigError;

/// Interpolation defaults
mod interpolation_defaults {
    /// Anchor gap (days) still graded high confidence
    pub const HIGH_CONFIDENCE_MAX_GAP_DAYS: i64 = 7;
    /// Anchor gap (days) still graded medium confidence
    pub const MEDIUM_CONFIDENCE_MAX_GAP_DAYS: i64 = 21;
    /// How long (days) the last reading may be carried forward
    pub const MAX_CARRY_FORWARD_DAYS: i64 = 30;
}

/// Estimation rules for values between and after real readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    /// Largest anchor gap (days) graded `High`
    pub high_confidence_max_gap_days: i64,
    /// Largest anchor gap (days) graded `Medium`; wider gaps are `Low`
    pub medium_confidence_max_gap_days: i64,
    /// Staleness window (days) for carrying the last reading forward
    pub max_carry_forward_days: i64,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            high_confidence_max_gap_days: interpolation_defaults::HIGH_CONFIDENCE_MAX_GAP_DAYS,
            medium_confidence_max_gap_days: interpolation_defaults::MEDIUM_CONFIDENCE_MAX_GAP_DAYS,
            max_carry_forward_days: interpolation_defaults::MAX_CARRY_FORWARD_DAYS,
        }
    }
}

impl InterpolationConfig {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.high_confidence_max_gap_days <= 0 {
            return Err(ConfigError::ValueOutOfRange(
                "high_confidence_max_gap_days must be positive",
            ));
        }
        if self.high_confidence_max_gap_days >= self.medium_confidence_max_gap_days {
            return Err(ConfigError::InvalidRange(
                "high_confidence_max_gap_days must be < medium_confidence_max_gap_days",
            ));
        }
        if self.max_carry_forward_days < 0 {
            return Err(ConfigError::ValueOutOfRange(
                "max_carry_forward_days must not be negative",
            ));
        }
        Ok(())
    }
}

/// Unit the observation store records weight in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    /// Kilograms
    Kilograms,
    /// Pounds
    #[default]
    Pounds,
}

impl WeightUnit {
    /// Multiplier converting this unit to kilograms
    #[must_use]
    pub const fn to_kilograms_factor(self) -> f64 {
        match self {
            Self::Kilograms => 1.0,
            Self::Pounds => KG_PER_POUND,
        }
    }
}

impl FromStr for WeightUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" | "kilograms" => Ok(Self::Kilograms),
            "lb" | "lbs" | "pounds" => Ok(Self::Pounds),
            other => Err(ConfigError::Parse(format!("Unknown weight unit: {other}"))),
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kilograms => f.write_str("kg"),
            Self::Pounds => f.write_str("lb"),
        }
    }
}

/// Fat-free mass index formula variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FfmiFormula {
    /// lean mass (kg) / height (m)²
    #[default]
    Standard,
    /// Standard index adjusted toward a 1.8 m reference height
    HeightNormalized,
}

impl FromStr for FfmiFormula {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "normalized" | "height_normalized" => Ok(Self::HeightNormalized),
            other => Err(ConfigError::Parse(format!("Unknown FFMI formula: {other}"))),
        }
    }
}

/// Inputs for the derived fitness index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FitnessIndexConfig {
    /// Athlete height in meters; the index is `Missing` without it
    pub height_m: Option<f64>,
    /// Unit observation weights are recorded in
    pub weight_unit: WeightUnit,
    /// Formula variant
    pub formula: FfmiFormula,
}

impl FitnessIndexConfig {
    /// Lowest plausible height (m)
    const MIN_HEIGHT_M: f64 = 0.5;
    /// Highest plausible height (m)
    const MAX_HEIGHT_M: f64 = 2.75;

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if let Some(height) = self.height_m {
            if !(Self::MIN_HEIGHT_M..=Self::MAX_HEIGHT_M).contains(&height) {
                return Err(ConfigError::ValueOutOfRange(
                    "height_m must be between 0.5 and 2.75",
                ));
            }
        }
        Ok(())
    }
}
