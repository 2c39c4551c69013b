//! # Core Module
//!
//! Stateless building blocks shared by every pipeline stage.
//!
//! ## Architecture
//!
//! - **Design Records** ([`models`]) - Design identifiers, optional per-design metrics and
//!   the ordered design set populated over the course of a run
//! - **Text I/O** ([`io`]) - Strict parsers for the plain-text outputs of the external tools
//!   (predictor logs, score files, PDB files) and CSV persistence of the final metrics
//!
//! Nothing in this module launches processes or touches run state; that is the job of
//! [`crate::engine`].

pub mod io;
pub mod models;
