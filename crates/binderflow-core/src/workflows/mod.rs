//! # Workflows Module
//!
//! High-level entry points that run a complete binder-design pipeline.
//!
//! ## Overview
//!
//! A workflow takes a validated [`RunConfig`](crate::engine::config::RunConfig),
//! a [`ToolRunner`](crate::engine::process::ToolRunner) and a progress
//! reporter. It executes the selected stages strictly in order and returns the
//! populated design set together with the filter summary.
//!
//! - **Design Workflow** ([`design`]) - Backbone generation, sequence design,
//!   structure prediction, optional interface scoring and final filtering.

pub mod design;
