use super::{conda_command, require_dir, run_tool};
use crate::core::io::predictor_log::apply_predictor_output;
use crate::core::models::design::DesignSet;
use crate::engine::config::PredictionConfig;
use crate::engine::context::RunContext;
use crate::engine::error::PipelineError;
use crate::engine::process::{ToolCommand, ToolRunner};
use crate::engine::scratch::ScratchDir;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const STAGE: &str = "prediction";

pub fn command(config: &PredictionConfig, scratch: &Path) -> ToolCommand {
    conda_command(&config.environment, scratch, &config.script_path)
        .arg("-pdbdir")
        .path_arg(scratch)
        .arg("-outpdbdir")
        .path_arg(&config.output_dir)
}

/// Predicts structures for the designed sequences in `input_dir` and records
/// the metrics reported on the predictor's stdout. Returns the number of
/// metric lines applied.
pub async fn run(
    ctx: &RunContext<'_>,
    runner: &dyn ToolRunner,
    input_dir: &Path,
    designs: &mut DesignSet,
) -> Result<usize, PipelineError> {
    let config = &ctx.config.prediction;
    require_dir(STAGE, input_dir)?;
    fs::create_dir_all(&config.output_dir)?;

    let scratch = ScratchDir::stage(input_dir, &config.scratch_dir)?;
    let cmd = command(config, scratch.path());
    let output = run_tool(ctx, runner, STAGE, &cmd).await?;
    drop(scratch);

    let applied = apply_predictor_output(&output.stdout, designs);
    if applied == 0 {
        warn!("Predictor output contained no metrics for any design");
    } else {
        info!("Recorded predictor metrics for {} design(s)", applied);
    }
    Ok(applied)
}
