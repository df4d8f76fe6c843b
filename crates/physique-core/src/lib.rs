// ABOUTME: Core types and constants for the Physique body-composition metrics engine
// ABOUTME: Foundation crate with error handling, observation models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Physique Core
//!
//! Foundation crate shared by the metrics engines. It is designed to change
//! infrequently, enabling incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Time, unit, and body-composition constants
//! - **models**: Observations, series snapshots, and chart points

/// Unified error handling system with standard error codes
pub mod errors;

/// Constants organized by domain
pub mod constants;

/// Core data models (observations, metrics, chart points)
pub mod models;
