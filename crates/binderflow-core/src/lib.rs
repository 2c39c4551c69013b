//! # binderflow Core Library
//!
//! Orchestration for a computational protein-binder design pipeline that chains
//! a backbone generator, a sequence designer, a structure predictor and an
//! optional interface scorer, then filters the resulting designs.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless design models (`DesignSet`) and pure
//!   parsers for the text formats the external tools produce: predictor stdout,
//!   score files, PDB files and the metrics table.
//!
//! - **[`engine`]: The Logic Core.** Run configuration, the process-runner seam,
//!   scratch-directory staging, one module per external tool stage and the
//!   threshold filter.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into a
//!   single call that runs the selected stages in order.

pub mod core;
pub mod engine;
pub mod workflows;
