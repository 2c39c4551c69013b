use super::{require_dir, run_tool};
use crate::core::io::score_file::read_score_value;
use crate::core::models::design::{DesignId, DesignSet, contains_design_token, valid_metric};
use crate::engine::config::ScoringConfig;
use crate::engine::context::RunContext;
use crate::engine::error::PipelineError;
use crate::engine::process::{ToolCommand, ToolRunner};
use crate::engine::progress::Progress;
use crate::engine::scratch::remove_file_logged;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const STAGE: &str = "scoring";

/// Suffix the scorer appends to the stem of every structure it writes.
const OUTPUT_STRUCTURE_SUFFIX: &str = "_0001.pdb";

/// The first predicted structure (by file name) belonging to `id`, if any.
pub fn find_prediction(dir: &Path, id: DesignId) -> Result<Option<PathBuf>, PipelineError> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdb = path.extension().is_some_and(|ext| ext == "pdb");
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| contains_design_token(name, id));
        if is_pdb && matches && path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates.into_iter().next())
}

pub fn score_file_path(config: &ScoringConfig, id: DesignId) -> PathBuf {
    config.work_dir.join(format!("{}.sc", id))
}

/// Where the scorer writes its copy of `structure`.
pub fn output_structure_path(config: &ScoringConfig, structure: &Path) -> PathBuf {
    let stem = structure
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    config
        .work_dir
        .join(format!("{}{}", stem, OUTPUT_STRUCTURE_SUFFIX))
}

pub fn command(config: &ScoringConfig, structure: &Path, id: DesignId) -> ToolCommand {
    ToolCommand::new(config.executable.to_string_lossy())
        .arg("-s")
        .path_arg(structure)
        .arg("-out:file:scorefile")
        .path_arg(&score_file_path(config, id))
        .arg("-out:path:pdb")
        .path_arg(&config.work_dir)
        .args(config.extra_args.iter().map(String::as_str))
        .timeout(config.timeout)
}

/// Scores every design that has a predicted structure and stores the result
/// as its `ddg`. Returns the number of designs that received a value.
pub async fn run(
    ctx: &RunContext<'_>,
    runner: &dyn ToolRunner,
    designs: &mut DesignSet,
) -> Result<usize, PipelineError> {
    let Some(config) = &ctx.config.scoring else {
        return Ok(0);
    };
    let predictions = &ctx.config.prediction.output_dir;
    require_dir(STAGE, predictions)?;
    fs::create_dir_all(&config.work_dir)?;

    let ids: Vec<DesignId> = designs.ids().collect();
    ctx.report(Progress::TaskStart {
        total: ids.len() as u64,
    });

    let mut scored = 0;
    for id in ids {
        ctx.report(Progress::StatusUpdate {
            text: format!("Scoring {}", id),
        });
        if score_design(ctx, runner, config, predictions, id, designs).await? {
            scored += 1;
        }
        ctx.report(Progress::TaskIncrement { amount: 1 });
    }
    ctx.report(Progress::TaskFinish);

    info!("Scored {} of {} designs", scored, designs.len());
    Ok(scored)
}

async fn score_design(
    ctx: &RunContext<'_>,
    runner: &dyn ToolRunner,
    config: &ScoringConfig,
    predictions: &Path,
    id: DesignId,
    designs: &mut DesignSet,
) -> Result<bool, PipelineError> {
    let Some(structure) = find_prediction(predictions, id)? else {
        warn!("No predicted structure for {}; skipping scoring", id);
        ctx.report(Progress::Message(format!(
            "No predicted structure for {}; not scored",
            id
        )));
        return Ok(false);
    };

    let cmd = command(config, &structure, id);
    run_tool(ctx, runner, STAGE, &cmd).await?;

    let score_file = score_file_path(config, id);
    let value = match read_score_value(&score_file, &config.score_column) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                "Could not read '{}' for {} from {:?}: {}",
                config.score_column, id, score_file, e
            );
            return Ok(false);
        }
    };
    let Some(ddg) = valid_metric(value) else {
        warn!(
            "'{}' for {} in {:?} is not a number; leaving ddg absent",
            config.score_column, id, score_file
        );
        return Ok(false);
    };
    designs.update(id, |m| m.ddg = Some(ddg));

    remove_file_logged(&score_file);
    remove_file_logged(&output_structure_path(config, &structure));
    Ok(true)
}
