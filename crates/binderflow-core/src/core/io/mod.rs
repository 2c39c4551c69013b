//! Provides parsers and writers for the text formats exchanged with the external tools.
//!
//! Every parser here is strict: inputs that do not match the expected shape are reported
//! as typed errors and never evaluated or guessed at. Callers decide whether a parse error
//! is fatal; during a run they are logged and the affected metric stays absent.

pub mod literal;
pub mod metrics_table;
pub mod pdb;
pub mod predictor_log;
pub mod score_file;
