// ABOUTME: Local-calendar helpers for period boundaries and day arithmetic
// ABOUTME: Cuts week/month/year periods in a fixed UTC offset without panicking arithmetic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, Utc, Weekday};
use physique_core::constants::time::DAYS_PER_WEEK;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar granularity of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketScale {
    /// Seven-day week starting on the configured weekday
    Week,
    /// Calendar month
    Month,
    /// Calendar year
    Year,
}

impl BucketScale {
    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for BucketScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole-day span saturating at the representable maximum
pub(crate) fn days(count: i64) -> Duration {
    Duration::try_days(count).unwrap_or(Duration::MAX)
}

/// Calendar date of an instant in the given offset
pub(crate) fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// Instant of local midnight starting `date`
pub(crate) fn local_midnight(date: NaiveDate, offset: FixedOffset) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)?
        .and_local_timezone(offset)
        .single()
        .map(|local| local.with_timezone(&Utc))
}

/// First day of the period containing `date`
pub(crate) fn period_start(
    scale: BucketScale,
    date: NaiveDate,
    week_start: Weekday,
) -> Option<NaiveDate> {
    match scale {
        BucketScale::Week => {
            let offset = (date.weekday().num_days_from_monday() + 7
                - week_start.num_days_from_monday())
                % 7;
            date.checked_sub_signed(days(i64::from(offset)))
        }
        BucketScale::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1),
        BucketScale::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
    }
}

/// First day of the period after the one starting at `start`
pub(crate) fn next_period_start(scale: BucketScale, start: NaiveDate) -> Option<NaiveDate> {
    match scale {
        BucketScale::Week => start.checked_add_signed(days(DAYS_PER_WEEK)),
        BucketScale::Month => start.checked_add_months(Months::new(1)),
        BucketScale::Year => start.checked_add_months(Months::new(12)),
    }
}

/// First day of the period before the one starting at `start`
pub(crate) fn previous_period_start(scale: BucketScale, start: NaiveDate) -> Option<NaiveDate> {
    match scale {
        BucketScale::Week => start.checked_sub_signed(days(DAYS_PER_WEEK)),
        BucketScale::Month => start.checked_sub_months(Months::new(1)),
        BucketScale::Year => start.checked_sub_months(Months::new(12)),
    }
}
