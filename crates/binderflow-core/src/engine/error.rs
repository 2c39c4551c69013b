use thiserror::Error;

use super::config::ConfigError;
use std::path::PathBuf;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Stage '{stage}' is missing its input: {path} does not exist", path = path.display())]
    MissingInput { stage: &'static str, path: PathBuf },

    #[error("Failed to launch '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{tool}' exited with {status}: {stderr}", status = exit_description(*code))]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("'{tool}' did not finish within {seconds} s")]
    Timeout { tool: String, seconds: u64 },

    #[error("Failed to stage '{path}' into scratch directory: {source}", path = path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid run configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}
