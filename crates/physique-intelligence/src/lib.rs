// ABOUTME: Metrics engines for sparse, irregular body-composition histories
// ABOUTME: Interpolation, calendar aggregation, LTTB downsampling, and scrubber positioning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Physique Intelligence
//!
//! Four stateless engines over an immutable observation snapshot. Each engine
//! is a plain value built from its configuration section and is `Send + Sync`,
//! so callers construct them once and share them by reference.
//!
//! ## Modules
//!
//! - **interpolation**: Point-in-time estimates with confidence grading
//! - **aggregation**: Sparse week/month/year buckets
//! - **downsampling**: Largest-Triangle-Three-Buckets chart decimation
//! - **scrubber**: Recency-weighted track positions and labels
//! - **config**: Engine configuration with validation and env overrides

/// Local-calendar period arithmetic
pub mod calendar;

/// Engine configuration
pub mod config;

/// Tagged estimate and confidence types
pub mod estimate;

/// Point-in-time metric estimation
pub mod interpolation;

/// Calendar bucket aggregation
pub mod aggregation;

/// Chart series extraction and decimation
pub mod downsampling;

/// Scrubber track geometry
pub mod scrubber;

pub use aggregation::{bucket_containing, AggregationEngine, Bucket, BucketId, MetricSnapshot};
pub use calendar::BucketScale;
pub use config::{ConfigError, EngineConfig};
pub use downsampling::{downsample_indices, DownsamplingEngine};
pub use estimate::{ConfidenceLevel, MetricEstimate};
pub use interpolation::InterpolationEngine;
pub use scrubber::{ImportanceTier, ScrubberEngine, ScrubberPoint, ScrubberTick, ScrubberTimeline};
