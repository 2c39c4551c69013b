use super::{require_dir, require_file, run_tool};
use crate::engine::config::BackboneConfig;
use crate::engine::context::RunContext;
use crate::engine::error::PipelineError;
use crate::engine::process::{ToolCommand, ToolRunner};
use std::fs;
use std::path::Path;
use tracing::info;

const STAGE: &str = "backbone";

const MODELS_MOUNT: &str = "/models";
const INPUTS_MOUNT: &str = "/inputs";
const OUTPUTS_MOUNT: &str = "/outputs";

fn volume(host: &Path, container: &str) -> String {
    format!("{}:{}", host.display(), container)
}

/// The `docker run` invocation for generating `num_designs` backbones.
pub fn command(config: &BackboneConfig, num_designs: usize) -> ToolCommand {
    let mut cmd = ToolCommand::new(&config.docker_executable).args(["run", "--rm"]);
    if config.use_gpus {
        cmd = cmd.args(["--gpus", "all"]);
    }
    cmd.arg("-v")
        .arg(volume(&config.models_dir, MODELS_MOUNT))
        .arg("-v")
        .arg(volume(&config.target_dir, INPUTS_MOUNT))
        .arg("-v")
        .arg(volume(&config.output_dir, OUTPUTS_MOUNT))
        .arg(&config.image)
        .arg(format!(
            "inference.output_prefix={}/{}",
            OUTPUTS_MOUNT, config.output_prefix
        ))
        .arg(format!("inference.model_directory_path={}", MODELS_MOUNT))
        .arg(format!(
            "inference.input_pdb={}/{}",
            INPUTS_MOUNT, config.target_file
        ))
        .arg(format!("inference.num_designs={}", num_designs))
        .arg(format!("contigmap.contigs=[{}]", config.contigs))
        .arg(format!("ppi.hotspot_res=[{}]", config.hotspots))
        .arg(format!("denoiser.noise_scale_ca={}", config.noise_scale))
        .arg(format!("denoiser.noise_scale_frame={}", config.noise_scale))
}

pub async fn run(ctx: &RunContext<'_>, runner: &dyn ToolRunner) -> Result<(), PipelineError> {
    let config = &ctx.config.backbone;
    require_dir(STAGE, &config.target_dir)?;
    require_file(STAGE, &config.target_dir.join(&config.target_file))?;
    fs::create_dir_all(&config.output_dir)?;

    let cmd = command(config, ctx.config.num_designs);
    run_tool(ctx, runner, STAGE, &cmd).await?;
    info!(
        "Generated {} backbones into {:?}",
        ctx.config.num_designs, config.output_dir
    );
    Ok(())
}
