// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Calendar, unit conversion, body-composition, and plausibility constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants grouped by domain rather than kept in a single flat namespace.

/// Calendar spans
pub mod time {
    /// Days in a week
    pub const DAYS_PER_WEEK: i64 = 7;
    /// Days treated as "one year" for recency windows
    pub const DAYS_PER_YEAR: i64 = 365;
}

/// Unit conversion constants
pub mod units {
    /// Kilograms per international avoirdupois pound
    pub const KG_PER_POUND: f64 = 0.453_592_37;
}

/// Body-composition constants
pub mod body_composition {
    /// Reference height (m) used by the height-normalized FFMI formula
    pub const FFMI_REFERENCE_HEIGHT_M: f64 = 1.8;
    /// Slope applied per meter of height difference in the normalized FFMI formula
    pub const FFMI_HEIGHT_NORMALIZATION_SLOPE: f64 = 6.1;
    /// Body fat is expressed as a percentage
    pub const PERCENT: f64 = 100.0;
}

/// Plausibility limits for incoming readings
pub mod validation {
    /// Lowest accepted weight, in the configured weight unit
    pub const MIN_WEIGHT: f64 = 20.0;
    /// Highest accepted weight, in the configured weight unit
    pub const MAX_WEIGHT: f64 = 700.0;
    /// Lowest accepted body-fat percentage
    pub const MIN_BODY_FAT_PERCENT: f64 = 2.0;
    /// Highest accepted body-fat percentage
    pub const MAX_BODY_FAT_PERCENT: f64 = 70.0;
}
