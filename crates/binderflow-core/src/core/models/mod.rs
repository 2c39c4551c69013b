//! # Core Models Module
//!
//! Data structures describing the designs produced during a pipeline run.
//!
//! A run starts by creating one empty [`design::DesignRecord`] for every requested design.
//! Later stages fill in metrics in place; records are never removed, so the filter always
//! sees the complete set in index order.

pub mod design;
