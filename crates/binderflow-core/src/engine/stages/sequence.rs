use super::{conda_command, require_dir, run_tool};
use crate::engine::config::SequenceConfig;
use crate::engine::context::RunContext;
use crate::engine::error::PipelineError;
use crate::engine::process::{ToolCommand, ToolRunner};
use crate::engine::scratch::{ScratchDir, remove_file_logged};
use std::fs;
use std::path::{Path, PathBuf};

const STAGE: &str = "sequence";

/// Checkpoint left behind by an interrupted run, relative to the working
/// directory unless configured otherwise. The designer resumes from it if
/// present.
pub const DEFAULT_CHECKPOINT: &str = "check.point";

pub fn command(config: &SequenceConfig, scratch: &Path) -> ToolCommand {
    conda_command(&config.environment, scratch, &config.script_path)
        .arg("-pdbdir")
        .path_arg(scratch)
        .arg("-relax_cycles")
        .arg(config.relax_cycles.to_string())
        .arg("-seqs_per_struct")
        .arg(config.seqs_per_struct.to_string())
        .arg("-outpdbdir")
        .path_arg(&config.output_dir)
}

/// Designs sequences for every backbone in `input_dir`.
pub async fn run(
    ctx: &RunContext<'_>,
    runner: &dyn ToolRunner,
    input_dir: &Path,
) -> Result<(), PipelineError> {
    let config = &ctx.config.sequence;
    require_dir(STAGE, input_dir)?;

    let checkpoint = config
        .checkpoint_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CHECKPOINT));
    remove_file_logged(&checkpoint);

    fs::create_dir_all(&config.output_dir)?;
    let scratch = ScratchDir::stage(input_dir, &config.scratch_dir)?;
    let cmd = command(config, scratch.path());
    run_tool(ctx, runner, STAGE, &cmd).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::fixtures::run_config;
    use crate::engine::process::ToolOutput;
    use crate::engine::process::testing::ScriptedRunner;
    use crate::engine::progress::ProgressReporter;
    use std::sync::{Arc, Mutex};

    fn backbones(root: &Path) -> std::path::PathBuf {
        let dir = root.join("backbones");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("5O45_design_0.pdb"), "ATOM\n").unwrap();
        dir
    }

    #[test]
    fn command_points_designer_at_scratch_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let config = run_config(tmp.path()).build().unwrap();
        let scratch = tmp.path().join("scratch/mpnn");
        let cmd = command(&config.sequence, &scratch);

        assert_eq!(cmd.flag_value("-n"), Some("binder_design"));
        let scratch_arg = scratch.to_string_lossy().into_owned();
        assert_eq!(cmd.flag_value("--cwd"), Some(scratch_arg.as_str()));
        assert_eq!(cmd.flag_value("-pdbdir"), Some(scratch_arg.as_str()));
        assert_eq!(cmd.flag_value("-relax_cycles"), Some("1"));
        assert_eq!(cmd.flag_value("-seqs_per_struct"), Some("1"));
    }

    #[tokio::test]
    async fn scratch_is_populated_during_run_and_removed_afterwards() {
        let tmp = tempfile::tempdir().unwrap();
        let input = backbones(tmp.path());
        let config = run_config(tmp.path()).build().unwrap();
        let scratch = config.sequence.scratch_dir.clone();
        let reporter = ProgressReporter::new();
        let ctx = RunContext::new("test", &config, &reporter);

        let seen = Arc::new(Mutex::new(false));
        let seen_in_tool = Arc::clone(&seen);
        let copied = scratch.join("5O45_design_0.pdb");
        let runner = ScriptedRunner::new(move |_| {
            *seen_in_tool.lock().unwrap() = copied.is_file();
            Ok(ToolOutput::succeeded(""))
        });

        run(&ctx, &runner, &input).await.unwrap();
        assert!(*seen.lock().unwrap());
        assert!(!scratch.exists());
        assert!(config.sequence.output_dir.is_dir());
    }

    #[tokio::test]
    async fn scratch_is_removed_when_tool_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let input = backbones(tmp.path());
        let config = run_config(tmp.path()).build().unwrap();
        let reporter = ProgressReporter::new();
        let ctx = RunContext::new("test", &config, &reporter);
        let runner = ScriptedRunner::new(|_| Ok(ToolOutput::failed(1, "crash")));

        let result = run(&ctx, &runner, &input).await;
        assert!(matches!(result, Err(PipelineError::ToolFailed { .. })));
        assert!(!config.sequence.scratch_dir.exists());
    }

    #[tokio::test]
    async fn stale_checkpoint_is_removed_before_launch() {
        let tmp = tempfile::tempdir().unwrap();
        let input = backbones(tmp.path());
        let checkpoint = tmp.path().join("check.point");
        fs::write(&checkpoint, "design_0").unwrap();
        let mut config = run_config(tmp.path()).build().unwrap();
        config.sequence.checkpoint_file = Some(checkpoint.clone());
        let reporter = ProgressReporter::new();
        let ctx = RunContext::new("test", &config, &reporter);

        run(&ctx, &ScriptedRunner::succeeding(), &input)
            .await
            .unwrap();
        assert!(!checkpoint.exists());
    }
}
