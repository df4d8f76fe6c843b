// ABOUTME: Engine configuration for interpolation, aggregation, downsampling, and scrubbing
// ABOUTME: Orchestrates per-engine configs and provides unified validation and env loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Engine Configuration Module
//!
//! Configuration is organized per engine:
//! - `interpolation` - Confidence grading, carry-forward staleness, fitness index inputs
//! - `aggregation` - Calendar and look-back periods per bucket scale
//! - `downsampling` - Chart point budget
//! - `scrubber` - Non-linear position breakpoints and recency tiers
//!
//! `EngineConfig<false>` is an unchecked value; `validate` turns it into an
//! `EngineConfig<true>`, which is what the engines' `from_config`
//! constructors accept.

pub mod aggregation;
pub mod downsampling;
pub mod error;
pub mod interpolation;
pub mod scrubber;

pub use aggregation::{AggregationConfig, CalendarConfig};
pub use downsampling::DownsamplingConfig;
pub use error::ConfigError;
pub use interpolation::{FfmiFormula, FitnessIndexConfig, InterpolationConfig, WeightUnit};
pub use physique_core::models::ValidationRanges;
pub use scrubber::ScrubberConfig;

use serde::{Deserialize, Serialize};
use std::env::{self, VarError};
use std::str::FromStr;
use tracing::debug;

/// Main engine configuration container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig<const VALIDATED: bool = false> {
    /// Interpolation confidence and staleness rules
    pub interpolation: InterpolationConfig,
    /// Derived fitness index inputs
    pub fitness_index: FitnessIndexConfig,
    /// Calendar bucket look-back
    pub aggregation: AggregationConfig,
    /// Chart point budget
    pub downsampling: DownsamplingConfig,
    /// Scrubber geometry
    pub scrubber: ScrubberConfig,
    /// Local calendar
    pub calendar: CalendarConfig,
    /// Plausibility window for incoming readings
    pub validation: ValidationRanges,
}

impl EngineConfig<false> {
    /// Check every invariant and mark the configuration as validated
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant
    pub fn validate(self) -> Result<EngineConfig<true>, ConfigError> {
        self.interpolation.validate()?;
        self.fitness_index.validate()?;
        self.aggregation.validate()?;
        self.downsampling.validate()?;
        self.scrubber.validate()?;
        self.calendar.validate()?;

        let ranges = &self.validation;
        if ranges.min_weight >= ranges.max_weight {
            return Err(ConfigError::InvalidRange("min_weight must be < max_weight"));
        }
        if ranges.min_body_fat_percent >= ranges.max_body_fat_percent {
            return Err(ConfigError::InvalidRange(
                "min_body_fat_percent must be < max_body_fat_percent",
            ));
        }

        Ok(EngineConfig {
            interpolation: self.interpolation,
            fitness_index: self.fitness_index,
            aggregation: self.aggregation,
            downsampling: self.downsampling,
            scrubber: self.scrubber,
            calendar: self.calendar,
            validation: self.validation,
        })
    }

    /// Read an override, treating an unset variable as absent and non-UTF-8 content as an error
    fn read_env_var(env_var_name: &str) -> Result<Option<String>, ConfigError> {
        match env::var(env_var_name) {
            Ok(val) => Ok(Some(val)),
            Err(VarError::NotPresent) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        let Some(val) = Self::read_env_var(env_var_name)? else {
            return Ok(());
        };
        *target = val
            .parse()
            .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        debug!(env_var = env_var_name, "Applied engine config override");
        Ok(())
    }

    /// Apply `PHYSIQUE_*` environment variable overrides
    ///
    /// # Errors
    ///
    /// Returns an error if an override is present but cannot be parsed
    pub fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Interpolation
        Self::apply_env_var(
            "PHYSIQUE_HIGH_CONFIDENCE_MAX_GAP_DAYS",
            &mut self.interpolation.high_confidence_max_gap_days,
        )?;
        Self::apply_env_var(
            "PHYSIQUE_MEDIUM_CONFIDENCE_MAX_GAP_DAYS",
            &mut self.interpolation.medium_confidence_max_gap_days,
        )?;
        Self::apply_env_var(
            "PHYSIQUE_MAX_CARRY_FORWARD_DAYS",
            &mut self.interpolation.max_carry_forward_days,
        )?;

        // Fitness index
        if let Some(height) = Self::read_env_var("PHYSIQUE_HEIGHT_M")? {
            let parsed = height
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid PHYSIQUE_HEIGHT_M".to_owned()))?;
            self.fitness_index.height_m = Some(parsed);
        }
        Self::apply_env_var("PHYSIQUE_WEIGHT_UNIT", &mut self.fitness_index.weight_unit)?;
        Self::apply_env_var("PHYSIQUE_FFMI_FORMULA", &mut self.fitness_index.formula)?;

        // Aggregation and calendar
        Self::apply_env_var("PHYSIQUE_WEEK_PERIODS", &mut self.aggregation.week_periods)?;
        Self::apply_env_var("PHYSIQUE_MONTH_PERIODS", &mut self.aggregation.month_periods)?;
        Self::apply_env_var("PHYSIQUE_YEAR_PERIODS", &mut self.aggregation.year_periods)?;
        Self::apply_env_var("PHYSIQUE_UTC_OFFSET_MINUTES", &mut self.calendar.utc_offset_minutes)?;
        Self::apply_env_var("PHYSIQUE_WEEK_START", &mut self.calendar.week_start)?;

        // Downsampling
        Self::apply_env_var(
            "PHYSIQUE_CHART_TARGET_POINTS",
            &mut self.downsampling.default_target_points,
        )?;

        // Scrubber
        Self::apply_env_var(
            "PHYSIQUE_SCRUBBER_RECENT_WINDOW_DAYS",
            &mut self.scrubber.recent_window_days,
        )?;
        Self::apply_env_var(
            "PHYSIQUE_SCRUBBER_HISTORY_WINDOW_DAYS",
            &mut self.scrubber.history_window_days,
        )?;
        Self::apply_env_var("PHYSIQUE_SCRUBBER_RECENT_FLOOR", &mut self.scrubber.recent_floor)?;
        Self::apply_env_var("PHYSIQUE_SCRUBBER_HISTORY_FLOOR", &mut self.scrubber.history_floor)?;

        Ok(self)
    }
}

impl EngineConfig<true> {
    /// Load configuration from defaults plus environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        EngineConfig::<false>::default()
            .apply_env_overrides()?
            .validate()
    }
}
