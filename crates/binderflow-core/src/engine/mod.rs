//! # Engine Module
//!
//! This module drives the external tools of a design run and applies the
//! final filter to what they report.
//!
//! ## Overview
//!
//! Each external tool is wrapped by a stage in [`stages`]. A stage validates
//! its input directory, stages a scratch copy where the tool needs one
//! ([`scratch`]), assembles a command and launches it through the
//! [`process::ToolRunner`] seam. Parsed results are written back into the
//! run's [`DesignSet`](crate::core::models::design::DesignSet).
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Validated, immutable parameters for every stage
//! - **Run Context** ([`context`]) - The per-run label, tracing span and progress reporter
//! - **Process Execution** ([`process`]) - Command description and the local process runner
//! - **Progress Monitoring** ([`progress`]) - Progress events for the user interface
//! - **Filtering** ([`filter`]) - Threshold selection over the aggregated metrics
//! - **Error Handling** ([`error`]) - Fatal pipeline errors

pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod process;
pub mod progress;
pub mod scratch;
pub mod stages;
