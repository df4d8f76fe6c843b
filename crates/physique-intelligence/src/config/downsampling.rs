// ABOUTME: Chart downsampling configuration types
// ABOUTME: Default point budget for rendering decimated series
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Point budget for chart rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownsamplingConfig {
    /// Target point count used when the caller does not pass one
    pub default_target_points: usize,
}

impl DownsamplingConfig {
    /// Smallest target the triangle selection can honor
    pub const MIN_TARGET_POINTS: usize = 3;

    pub(super) fn validate(self) -> Result<(), ConfigError> {
        if self.default_target_points < Self::MIN_TARGET_POINTS {
            return Err(ConfigError::ValueOutOfRange(
                "default_target_points must be at least 3",
            ));
        }
        Ok(())
    }
}

impl Default for DownsamplingConfig {
    fn default() -> Self {
        Self {
            default_target_points: 150,
        }
    }
}
