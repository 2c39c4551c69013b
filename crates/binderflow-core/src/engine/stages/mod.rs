//! One module per external tool. Every stage follows the same shape: check
//! its input, optionally stage a scratch copy, build a [`ToolCommand`], run it
//! through the [`ToolRunner`] and turn a non-zero exit into an error.

pub mod backbone;
pub mod prediction;
pub mod scoring;
pub mod sequence;

use super::config::CondaEnvironment;
use super::context::RunContext;
use super::error::PipelineError;
use super::process::{ToolCommand, ToolOutput, ToolRunner};
use super::progress::Progress;
use std::path::Path;
use tracing::{debug, info};

pub(crate) fn require_dir(stage: &'static str, path: &Path) -> Result<(), PipelineError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(PipelineError::MissingInput {
            stage,
            path: path.to_path_buf(),
        })
    }
}

pub(crate) fn require_file(stage: &'static str, path: &Path) -> Result<(), PipelineError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PipelineError::MissingInput {
            stage,
            path: path.to_path_buf(),
        })
    }
}

/// `conda run -n <env> --cwd <dir> python <script>`, ready for script flags.
pub(crate) fn conda_command(env: &CondaEnvironment, cwd: &Path, script: &Path) -> ToolCommand {
    ToolCommand::new(&env.executable)
        .args(["run", "-n", env.name.as_str(), "--cwd"])
        .path_arg(cwd)
        .arg(&env.python)
        .path_arg(script)
}

/// Runs `command` and fails the stage on a non-zero exit. Both output streams
/// are logged at debug level.
pub(crate) async fn run_tool(
    ctx: &RunContext<'_>,
    runner: &dyn ToolRunner,
    stage: &'static str,
    command: &ToolCommand,
) -> Result<ToolOutput, PipelineError> {
    info!("Running {} stage: {}", stage, command);
    ctx.report(Progress::StatusUpdate {
        text: format!("Running {}", command.program),
    });

    let output = runner.run(command).await?;
    log_stream(stage, "stdout", &output.stdout);
    log_stream(stage, "stderr", &output.stderr);

    if output.success {
        Ok(output)
    } else {
        Err(PipelineError::ToolFailed {
            tool: command.program.clone(),
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        })
    }
}

fn log_stream(stage: &str, stream: &str, text: &str) {
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        debug!(stage, stream, "{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::fixtures::run_config;
    use crate::engine::process::testing::ScriptedRunner;
    use crate::engine::progress::ProgressReporter;
    use std::path::PathBuf;

    #[test]
    fn conda_command_runs_script_in_named_environment() {
        let env = crate::engine::config::CondaEnvironment::named("binder_design");
        let cmd = conda_command(&env, Path::new("/scratch/mpnn"), Path::new("/opt/run.py"));
        assert_eq!(cmd.program, "conda");
        assert_eq!(
            cmd.args,
            vec!["run", "-n", "binder_design", "--cwd", "/scratch/mpnn", "python", "/opt/run.py"]
        );
    }

    #[test]
    fn require_dir_reports_missing_path() {
        let missing = PathBuf::from("/definitely/not/here");
        match require_dir("sequence", &missing) {
            Err(PipelineError::MissingInput { stage, path }) => {
                assert_eq!(stage, "sequence");
                assert_eq!(path, missing);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_zero_exit_becomes_tool_failed() {
        let tmp = tempfile::tempdir().unwrap();
        let config = run_config(tmp.path()).build().unwrap();
        let reporter = ProgressReporter::new();
        let ctx = RunContext::new("test", &config, &reporter);
        let runner = ScriptedRunner::new(|_| Ok(ToolOutput::failed(2, "boom\n")));

        let result = run_tool(&ctx, &runner, "backbone", &ToolCommand::new("docker")).await;
        match result {
            Err(PipelineError::ToolFailed { tool, code, stderr }) => {
                assert_eq!(tool, "docker");
                assert_eq!(code, Some(2));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
