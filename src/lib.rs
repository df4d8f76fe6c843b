// ABOUTME: Main library entry point for the Physique body-composition metrics service
// ABOUTME: Re-exports the engines and adds configuration, logging, and background execution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Physique Metrics
//!
//! Turns a sparse, irregular history of body-composition observations
//! (weight, body-fat percentage, progress photos) into the structures a
//! progress dashboard renders:
//!
//! - point-in-time estimates with explicit provenance and confidence
//! - sparse week/month/year buckets with median snapshots
//! - shape-preserving downsampled chart series
//! - a recency-weighted scrubber timeline
//!
//! ## Architecture
//!
//! - **`physique_core`**: errors, constants, observation models
//! - **`physique_intelligence`**: the four stateless engines
//! - **this crate**: environment configuration, logging, and background
//!   execution with stale-result discarding
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use physique_metrics::config::PhysiqueConfig;
//! use physique_metrics::errors::AppResult;
//! use physique_metrics::intelligence::{BucketScale, InterpolationEngine, AggregationEngine};
//! use physique_metrics::models::ObservationSeries;
//!
//! fn main() -> AppResult<()> {
//!     let config = PhysiqueConfig::from_env()?;
//!     let series = ObservationSeries::from_records(Vec::new(), &config.engine.validation);
//!
//!     let interpolation = InterpolationEngine::from_config(&config.engine);
//!     let aggregation = AggregationEngine::from_config(&config.engine, &interpolation);
//!     let weeks = aggregation.buckets(&series, BucketScale::Week);
//!     println!("{} non-empty weeks", weeks.len());
//!     Ok(())
//! }
//! ```

/// Unified error handling shared with the engine crates
pub use physique_core::errors;

/// Observation and chart point models
pub use physique_core::models;

/// Unit and body-composition constants
pub use physique_core::constants;

/// Interpolation, aggregation, downsampling, and scrubber engines
pub use physique_intelligence as intelligence;

/// Background execution with fingerprint-based stale-result discarding
pub mod background;

/// Service configuration loaded from the environment
pub mod config;

/// Structured logging setup
pub mod logging;
