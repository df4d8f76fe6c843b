// ABOUTME: Maps observation dates onto a recency-weighted [0, 1] scrubber track
// ABOUTME: Three-piece position curve, importance tiers, display labels, and nearest-point lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Scrubber Position Engine
//!
//! Recent history gets most of the track. With the default geometry the last
//! 30 days cover `[0.3, 1.0]`, the rest of the last year covers `[0.1, 0.3]`,
//! and everything older is spread linearly over `[0.0, 0.1]` from the oldest
//! observation to the one-year boundary.

#![allow(clippy::cast_precision_loss)] // Safe: millisecond ages fit in f64

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use physique_core::constants::time::DAYS_PER_YEAR;
use physique_core::models::MetricObservation;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::{days, local_date};
use crate::config::{CalendarConfig, EngineConfig, ScrubberConfig};
use crate::interpolation::chronological;

/// Recency class of an observation, driving tick density
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportanceTier {
    /// Within the last week
    Daily,
    /// Within the last month
    Weekly,
    /// Within the last year
    Monthly,
    /// Older than a year
    Yearly,
}

/// One observation placed on the scrubber track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrubberPoint {
    /// Index into the chronologically ordered observations
    pub index: usize,
    /// Source observation
    pub observation_id: Uuid,
    /// Instant of the observation
    pub date: DateTime<Utc>,
    /// Normalized track position in `[0, 1]`
    pub position: f64,
    /// Recency tier
    pub tier: ImportanceTier,
    /// Human-readable date label
    pub label: String,
}

/// Tick mark at the first point of a tier period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrubberTick {
    /// Index of the point the tick sits on
    pub point_index: usize,
    /// Track position of the tick
    pub position: f64,
    /// Tier of the period
    pub tier: ImportanceTier,
    /// Period label
    pub label: String,
}

/// Scrubber points in chronological order with monotonic positions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrubberTimeline {
    points: Vec<ScrubberPoint>,
    #[serde(skip)]
    calendar: CalendarConfig,
}

impl ScrubberTimeline {
    /// All points, oldest first
    #[must_use]
    pub fn points(&self) -> &[ScrubberPoint] {
        &self.points
    }

    /// Number of points
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the timeline has no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point closest to `position`; equal distances resolve to the older point
    #[must_use]
    pub fn nearest(&self, position: f64) -> Option<&ScrubberPoint> {
        let split = self.points.partition_point(|point| point.position < position);
        let before = split.checked_sub(1).and_then(|index| self.points.get(index));
        let after = self.points.get(split);

        match (before, after) {
            (Some(before), Some(after)) => {
                if (after.position - position).abs() < (position - before.position).abs() {
                    Some(after)
                } else {
                    Some(before)
                }
            }
            (before, after) => before.or(after),
        }
    }

    /// One tick per local day, ISO week, month, or year, following each point's tier
    #[must_use]
    pub fn ticks(&self) -> Vec<ScrubberTick> {
        let offset = self.calendar.offset();
        let mut ticks: Vec<ScrubberTick> = Vec::new();
        let mut previous_key = None;

        for point in &self.points {
            let day = local_date(point.date, offset);
            let key = period_key(point.tier, day);
            if previous_key == Some(key) {
                continue;
            }
            previous_key = Some(key);
            ticks.push(ScrubberTick {
                point_index: point.index,
                position: point.position,
                tier: point.tier,
                label: match point.tier {
                    ImportanceTier::Daily => point.label.clone(),
                    ImportanceTier::Weekly => day.format("%b %-d").to_string(),
                    ImportanceTier::Monthly => day.format("%b %Y").to_string(),
                    ImportanceTier::Yearly => day.format("%Y").to_string(),
                },
            });
        }

        ticks
    }
}

/// Local calendar period a point belongs to at its tier's granularity
fn period_key(tier: ImportanceTier, date: NaiveDate) -> (ImportanceTier, i32, u32) {
    match tier {
        ImportanceTier::Daily => (tier, date.year(), date.ordinal()),
        ImportanceTier::Weekly => {
            let week = date.iso_week();
            (tier, week.year(), week.week())
        }
        ImportanceTier::Monthly => (tier, date.year(), date.month()),
        ImportanceTier::Yearly => (tier, date.year(), 0),
    }
}

/// Stateless scrubber geometry calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrubberEngine {
    config: ScrubberConfig,
    calendar: CalendarConfig,
}

impl ScrubberEngine {
    /// Create an engine with the given geometry and label calendar
    #[must_use]
    pub const fn new(config: ScrubberConfig, calendar: CalendarConfig) -> Self {
        Self { config, calendar }
    }

    /// Create an engine from a validated engine configuration
    #[must_use]
    pub const fn from_config(config: &EngineConfig<true>) -> Self {
        Self::new(config.scrubber, config.calendar)
    }

    /// Place every observation on the track relative to `now`
    #[must_use]
    pub fn timeline(
        &self,
        observations: &[MetricObservation],
        now: DateTime<Utc>,
    ) -> ScrubberTimeline {
        let ordered = chronological(observations);
        let Some(oldest) = ordered.first().map(MetricObservation::recorded_at) else {
            return ScrubberTimeline::default();
        };

        let points = ordered
            .iter()
            .enumerate()
            .map(|(index, observation)| {
                let date = observation.recorded_at();
                ScrubberPoint {
                    index,
                    observation_id: observation.id(),
                    date,
                    position: self.position(date, oldest, now),
                    tier: self.tier(date, now),
                    label: self.label(date, now),
                }
            })
            .collect();

        ScrubberTimeline {
            points,
            calendar: self.calendar,
        }
    }

    /// Track position of `date`, given the oldest observation and `now`
    #[must_use]
    pub fn position(&self, date: DateTime<Utc>, oldest: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let config = &self.config;
        let age = (now - date).num_milliseconds().max(0) as f64;
        let recent = days(config.recent_window_days).num_milliseconds() as f64;
        let history = days(config.history_window_days).num_milliseconds() as f64;

        // An empty recent window still pins `now` to the end of the track
        let position = if age <= recent && recent <= 0.0 {
            1.0
        } else if age <= recent {
            (age / recent).mul_add(config.recent_floor - 1.0, 1.0)
        } else if age <= history {
            let fraction = (age - recent) / (history - recent);
            fraction.mul_add(config.history_floor - config.recent_floor, config.recent_floor)
        } else {
            let span = (now - oldest).num_milliseconds() as f64 - history;
            let fraction = if span > 0.0 {
                (age - history) / span
            } else {
                1.0
            };
            config.history_floor * (1.0 - fraction)
        };

        position.clamp(0.0, 1.0)
    }

    /// Recency tier of `date` by whole days of age
    #[must_use]
    pub fn tier(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> ImportanceTier {
        let age_days = (now - date).num_days();
        if age_days <= self.config.daily_tier_max_days {
            ImportanceTier::Daily
        } else if age_days <= self.config.weekly_tier_max_days {
            ImportanceTier::Weekly
        } else if age_days <= self.config.monthly_tier_max_days {
            ImportanceTier::Monthly
        } else {
            ImportanceTier::Yearly
        }
    }

    /// Display label of `date` relative to `now`, by local calendar day
    #[must_use]
    pub fn label(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> String {
        let offset = self.calendar.offset();
        let day = local_date(date, offset);
        let today = local_date(now, offset);
        let days_ago = (today - day).num_days();

        match days_ago {
            0 => "Today".to_owned(),
            1 => "Yesterday".to_owned(),
            2..=6 => day.format("%A").to_string(),
            _ if day.year() == today.year() => day.format("%b %-d").to_string(),
            _ if days_ago < DAYS_PER_YEAR => day.format("%b %Y").to_string(),
            _ => day.format("%Y").to_string(),
        }
    }
}
