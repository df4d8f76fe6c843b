// ABOUTME: Scrubber position mapping configuration types
// ABOUTME: Breakpoints, range floors, and recency tier thresholds for the history scrubber
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Scrubber weighting defaults
mod scrubber_defaults {
    use physique_core::constants::time::{DAYS_PER_WEEK, DAYS_PER_YEAR};

    /// Age (days) covered by the recent segment
    pub const RECENT_WINDOW_DAYS: i64 = 30;
    /// Age (days) where the history segment ends and the archive begins
    pub const HISTORY_WINDOW_DAYS: i64 = DAYS_PER_YEAR;
    /// Lowest position of the recent segment
    pub const RECENT_FLOOR: f64 = 0.3;
    /// Lowest position of the history segment
    pub const HISTORY_FLOOR: f64 = 0.1;
    /// Oldest age (days) tiered as daily
    pub const DAILY_TIER_MAX_DAYS: i64 = DAYS_PER_WEEK;
    /// Oldest age (days) tiered as weekly
    pub const WEEKLY_TIER_MAX_DAYS: i64 = 30;
    /// Oldest age (days) tiered as monthly
    pub const MONTHLY_TIER_MAX_DAYS: i64 = DAYS_PER_YEAR;
}

/// Non-linear scrubber geometry
///
/// Positions in `[recent_floor, 1]` cover the last `recent_window_days`,
/// `[history_floor, recent_floor]` cover up to `history_window_days`, and
/// `[0, history_floor]` cover everything older.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrubberConfig {
    /// Age (days) of the recent/history breakpoint
    pub recent_window_days: i64,
    /// Age (days) of the history/archive breakpoint
    pub history_window_days: i64,
    /// Position where the recent segment starts
    pub recent_floor: f64,
    /// Position where the history segment starts
    pub history_floor: f64,
    /// Tier threshold: ages up to this many days are `Daily`
    pub daily_tier_max_days: i64,
    /// Tier threshold: ages up to this many days are `Weekly`
    pub weekly_tier_max_days: i64,
    /// Tier threshold: ages up to this many days are `Monthly`
    pub monthly_tier_max_days: i64,
}

impl Default for ScrubberConfig {
    fn default() -> Self {
        Self {
            recent_window_days: scrubber_defaults::RECENT_WINDOW_DAYS,
            history_window_days: scrubber_defaults::HISTORY_WINDOW_DAYS,
            recent_floor: scrubber_defaults::RECENT_FLOOR,
            history_floor: scrubber_defaults::HISTORY_FLOOR,
            daily_tier_max_days: scrubber_defaults::DAILY_TIER_MAX_DAYS,
            weekly_tier_max_days: scrubber_defaults::WEEKLY_TIER_MAX_DAYS,
            monthly_tier_max_days: scrubber_defaults::MONTHLY_TIER_MAX_DAYS,
        }
    }
}

impl ScrubberConfig {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.recent_window_days <= 0 || self.recent_window_days >= self.history_window_days {
            return Err(ConfigError::InvalidRange(
                "scrubber windows must satisfy 0 < recent_window_days < history_window_days",
            ));
        }
        if !(self.history_floor > 0.0
            && self.history_floor < self.recent_floor
            && self.recent_floor < 1.0)
        {
            return Err(ConfigError::InvalidRange(
                "scrubber floors must satisfy 0 < history_floor < recent_floor < 1",
            ));
        }
        if self.daily_tier_max_days < 0
            || self.daily_tier_max_days >= self.weekly_tier_max_days
            || self.weekly_tier_max_days >= self.monthly_tier_max_days
        {
            return Err(ConfigError::InvalidRange(
                "scrubber tier thresholds must be in ascending order",
            ));
        }
        Ok(())
    }
}
