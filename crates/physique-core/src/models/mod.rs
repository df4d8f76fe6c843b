// ABOUTME: Core data models for the Physique metrics engine
// ABOUTME: Re-exports observations, metric selectors, chart points, and series snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `MetricObservation`: one timestamped body-composition record
//! - `ObservationSeries`: the visible, ordered snapshot engines consume
//! - `Metric`: selector for directly observed values
//! - `SeriesPoint` / `ChartPoint`: chart-ready pairs

mod metric;
mod observation;
mod series;

pub use metric::{ChartPoint, Metric, SeriesPoint};
pub use observation::{MetricObservation, ObservationBuilder, ObservationSource, PhotoRef};
pub use series::{is_chronological, ObservationSeries, ValidationRanges};
