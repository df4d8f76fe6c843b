// ABOUTME: Calendar aggregation configuration types
// ABOUTME: Look-back periods per bucket scale plus the local calendar used to cut periods
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{FixedOffset, Offset, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Local calendar shared by aggregation periods and scrubber labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Offset from UTC, in minutes, of the user's calendar
    pub utc_offset_minutes: i32,
    /// First day of a week bucket
    pub week_start: Weekday,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            week_start: Weekday::Mon,
        }
    }
}

impl CalendarConfig {
    /// Widest offset any real timezone uses
    const MAX_OFFSET_MINUTES: i32 = 18 * 60;

    /// Offset as a chrono timezone; falls back to UTC for out-of-range values
    #[must_use]
    pub fn offset(self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }

    pub(super) fn validate(self) -> Result<(), ConfigError> {
        if self.utc_offset_minutes.abs() > Self::MAX_OFFSET_MINUTES {
            return Err(ConfigError::ValueOutOfRange(
                "utc_offset_minutes must be within +/- 18 hours",
            ));
        }
        Ok(())
    }
}

/// How far back each bucket scale walks from the newest observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Number of week periods examined
    pub week_periods: u32,
    /// Number of month periods examined
    pub month_periods: u32,
    /// Number of year periods examined
    pub year_periods: u32,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            week_periods: 4,
            month_periods: 12,
            year_periods: 3,
        }
    }
}

impl AggregationConfig {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.week_periods == 0 || self.month_periods == 0 || self.year_periods == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "aggregation periods must be at least 1 for every scale",
            ));
        }
        Ok(())
    }
}
