// ABOUTME: Top-level configuration combining engine, logging, and background work settings
// ABOUTME: Loads everything from PHYSIQUE_* and logging environment variables in one call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the metrics service
//!
//! - **Engine**: per-engine thresholds, validated through `EngineConfig<true>`
//! - **Logging**: subscriber format and level, see [`LoggingConfig`]
//! - **Background**: when chart and bucket work leaves the async executor

use std::env;

use physique_core::errors::{AppError, AppResult};
use physique_intelligence::config::{ConfigError, EngineConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::logging::LoggingConfig;

/// Point count above which work is moved to the blocking pool
const DEFAULT_OFFLOAD_THRESHOLD: usize = 2_000;

/// Background execution settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundConfig {
    /// Inputs with more points than this run on `spawn_blocking`
    pub offload_threshold: usize,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            offload_threshold: DEFAULT_OFFLOAD_THRESHOLD,
        }
    }
}

impl BackgroundConfig {
    /// Read `PHYSIQUE_OFFLOAD_THRESHOLD`, falling back to the default
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is set but is not a non-negative integer
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(value) = env::var("PHYSIQUE_OFFLOAD_THRESHOLD") {
            config.offload_threshold = value.parse().map_err(|_| {
                ConfigError::Parse("Invalid PHYSIQUE_OFFLOAD_THRESHOLD".to_owned())
            })?;
            debug!(
                offload_threshold = config.offload_threshold,
                "Applied background config override"
            );
        }
        Ok(config)
    }

    /// Whether an input of `points` points should leave the async executor
    #[must_use]
    pub const fn should_offload(self, points: usize) -> bool {
        points > self.offload_threshold
    }
}

/// Complete service configuration
#[derive(Debug, Clone)]
pub struct PhysiqueConfig {
    /// Validated engine thresholds
    pub engine: EngineConfig<true>,
    /// Logging subscriber settings
    pub logging: LoggingConfig,
    /// Background execution settings
    pub background: BackgroundConfig,
}

impl PhysiqueConfig {
    /// Load every section from the environment
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any override is malformed or the
    /// resulting engine configuration fails validation
    pub fn from_env() -> AppResult<Self> {
        let engine = EngineConfig::<true>::load().map_err(AppError::from)?;
        let background = BackgroundConfig::from_env().map_err(AppError::from)?;
        let logging = LoggingConfig::from_env();

        info!(
            week_periods = engine.aggregation.week_periods,
            chart_target_points = engine.downsampling.default_target_points,
            offload_threshold = background.offload_threshold,
            height_configured = engine.fitness_index.height_m.is_some(),
            "Configuration loaded"
        );

        Ok(Self {
            engine,
            logging,
            background,
        })
    }
}
