use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileFilterConfig, FileScoringConfig};
use super::models::AppConfig;
use crate::cli::{RunArgs, ThresholdArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use binderflow::engine::config as core_config;
use binderflow::engine::config::Stage;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub fn build_config(args: &RunArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let target_file = file_config.target.take().unwrap_or_default();
    let raw_pdb_id = args
        .pdb_id
        .as_deref()
        .or(target_file.pdb_id.as_deref())
        .ok_or_else(|| {
            CliError::Config(
                "A target PDB id is required (use --pdb-id or `target.pdb-id`)".to_string(),
            )
        })?;
    let pdb_id =
        parser::parse_pdb_id(raw_pdb_id).map_err(|e| CliError::Argument(e.to_string()))?;

    let num_designs = args
        .num_designs
        .or(file_config.num_designs)
        .unwrap_or(defaults.num_designs);

    let backbone_file = file_config.backbone.take().unwrap_or_default();
    let hotspots = args
        .hotspots
        .as_deref()
        .or(backbone_file.hotspots.as_deref())
        .unwrap_or("");
    let hotspots =
        parser::normalize_hotspots(hotspots).map_err(|e| CliError::Argument(e.to_string()))?;

    let backbone = core_config::BackboneConfig {
        docker_executable: backbone_file
            .docker
            .unwrap_or_else(|| defaults.docker_executable.to_string()),
        image: backbone_file
            .image
            .unwrap_or_else(|| defaults.backbone_image.to_string()),
        use_gpus: !args.no_gpus && backbone_file.gpus.unwrap_or(defaults.use_gpus),
        models_dir: backbone_file
            .models_dir
            .unwrap_or_else(|| PathBuf::from(defaults.models_dir)),
        target_dir: target_file
            .input_dir
            .unwrap_or_else(|| PathBuf::from(defaults.target_dir)),
        target_file: target_file
            .file
            .unwrap_or_else(|| format!("{}_cleaned.pdb", pdb_id)),
        output_dir: backbone_file
            .output_dir
            .unwrap_or_else(|| PathBuf::from(defaults.backbone_output_dir)),
        output_prefix: backbone_file
            .output_prefix
            .unwrap_or_else(|| format!("{}_design", pdb_id)),
        contigs: args
            .contigs
            .clone()
            .or(backbone_file.contigs)
            .unwrap_or_default(),
        hotspots,
        noise_scale: args
            .noise_scale
            .or(backbone_file.noise_scale)
            .unwrap_or(defaults.noise_scale),
    };

    let sequence_file = file_config.sequence.take().unwrap_or_default();
    let sequence = core_config::SequenceConfig {
        environment: conda_environment(
            sequence_file.conda,
            sequence_file.environment,
            sequence_file.python,
            &defaults,
        ),
        script_path: sequence_file
            .script
            .unwrap_or_else(|| PathBuf::from(defaults.sequence_script)),
        scratch_dir: sequence_file
            .scratch_dir
            .unwrap_or_else(|| PathBuf::from(defaults.sequence_scratch_dir)),
        output_dir: sequence_file
            .output_dir
            .unwrap_or_else(|| PathBuf::from(defaults.sequence_output_dir)),
        relax_cycles: sequence_file.relax_cycles.unwrap_or(defaults.relax_cycles),
        seqs_per_struct: sequence_file
            .seqs_per_struct
            .unwrap_or(defaults.seqs_per_struct),
        checkpoint_file: sequence_file.checkpoint,
    };

    let prediction_file = file_config.prediction.take().unwrap_or_default();
    let prediction = core_config::PredictionConfig {
        environment: conda_environment(
            prediction_file.conda,
            prediction_file.environment,
            prediction_file.python,
            &defaults,
        ),
        script_path: prediction_file
            .script
            .unwrap_or_else(|| PathBuf::from(defaults.prediction_script)),
        scratch_dir: prediction_file
            .scratch_dir
            .unwrap_or_else(|| PathBuf::from(defaults.prediction_scratch_dir)),
        output_dir: prediction_file
            .output_dir
            .unwrap_or_else(|| PathBuf::from(defaults.prediction_output_dir)),
    };

    let scoring = merge_scoring(args.no_scoring, file_config.scoring.take(), &defaults)?;
    let filter = build_thresholds(&args.thresholds, file_config.filter);
    let stages = merge_stages(args, &file_config)?;

    let core_config = core_config::RunConfigBuilder::new()
        .num_designs(num_designs)
        .backbone(backbone)
        .sequence(sequence)
        .prediction(prediction)
        .scoring(scoring)
        .filter(filter)
        .stages(stages)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        pdb_id,
        report_path: args
            .report
            .clone()
            .or(file_config.report)
            .unwrap_or_else(|| PathBuf::from(defaults.report_path)),
        core_config,
    })
}

/// Thresholds from the CLI, then the `[filter]` table, then the built-in defaults.
pub fn build_thresholds(
    args: &ThresholdArgs,
    file_val: Option<FileFilterConfig>,
) -> core_config::FilterThresholds {
    let file_val = file_val.unwrap_or_default();
    let defaults = core_config::FilterThresholds::default();
    core_config::FilterThresholds {
        min_plddt_binder: args
            .min_plddt_binder
            .or(file_val.min_plddt_binder)
            .unwrap_or(defaults.min_plddt_binder),
        max_pae_interaction: args
            .max_pae_interaction
            .or(file_val.max_pae_interaction)
            .unwrap_or(defaults.max_pae_interaction),
        max_binder_aligned_rmsd: args
            .max_binder_aligned_rmsd
            .or(file_val.max_binder_aligned_rmsd)
            .unwrap_or(defaults.max_binder_aligned_rmsd),
        max_ddg: args
            .max_ddg
            .or(file_val.max_ddg)
            .unwrap_or(defaults.max_ddg),
    }
}

fn conda_environment(
    executable: Option<String>,
    name: Option<String>,
    python: Option<String>,
    defaults: &DefaultsConfig,
) -> core_config::CondaEnvironment {
    core_config::CondaEnvironment {
        executable: executable.unwrap_or_else(|| defaults.conda_executable.to_string()),
        name: name.unwrap_or_else(|| defaults.conda_environment.to_string()),
        python: python.unwrap_or_else(|| defaults.python.to_string()),
    }
}

fn merge_scoring(
    cli_no_scoring: bool,
    file_val: Option<FileScoringConfig>,
    defaults: &DefaultsConfig,
) -> Result<Option<core_config::ScoringConfig>> {
    if cli_no_scoring {
        return Ok(None);
    }
    let Some(p) = file_val else {
        return Ok(None);
    };
    let enabled = p.enabled.unwrap_or(p.executable.is_some());
    if !enabled {
        return Ok(None);
    }
    let executable = p.executable.ok_or_else(|| {
        CliError::Config("`scoring` is enabled but `scoring.executable` is not set".to_string())
    })?;
    Ok(Some(core_config::ScoringConfig {
        executable,
        work_dir: p
            .work_dir
            .unwrap_or_else(|| PathBuf::from(defaults.scoring_work_dir)),
        score_column: p
            .score_column
            .unwrap_or_else(|| defaults.score_column.to_string()),
        timeout: Duration::from_secs(p.timeout_secs.unwrap_or(defaults.scoring_timeout_secs)),
        extra_args: p.extra_args.unwrap_or_default(),
    }))
}

fn merge_stages(args: &RunArgs, file_config: &FileConfig) -> Result<core_config::StageSelection> {
    let file_stages = file_config.stages.clone().unwrap_or_default();
    let parse_stage = |value: Option<&str>| -> Result<Option<Stage>> {
        value
            .map(|s| Stage::from_str(s).map_err(|e| CliError::Config(e.to_string())))
            .transpose()
    };
    let defaults = core_config::StageSelection::default();
    let first = match args.from_stage {
        Some(stage) => stage,
        None => parse_stage(file_stages.from.as_deref())?.unwrap_or(defaults.first),
    };
    let last = match args.to_stage {
        Some(stage) => stage,
        None => parse_stage(file_stages.to.as_deref())?.unwrap_or(defaults.last),
    };
    Ok(core_config::StageSelection { first, last })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;

        match key {
            "num-designs" => config.num_designs = Some(parse_value(key, value_str, "integer")?),
            "report" => config.report = Some(PathBuf::from(value_str)),
            "target.pdb-id" => {
                config.target.get_or_insert_with(Default::default).pdb_id =
                    Some(value_str.to_string());
            }
            "target.file" => {
                config.target.get_or_insert_with(Default::default).file =
                    Some(value_str.to_string());
            }
            "backbone.image" => {
                config.backbone.get_or_insert_with(Default::default).image =
                    Some(value_str.to_string());
            }
            "backbone.gpus" => {
                config.backbone.get_or_insert_with(Default::default).gpus =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "backbone.contigs" => {
                config.backbone.get_or_insert_with(Default::default).contigs =
                    Some(value_str.to_string());
            }
            "backbone.hotspots" => {
                config.backbone.get_or_insert_with(Default::default).hotspots =
                    Some(value_str.to_string());
            }
            "backbone.noise-scale" => {
                config
                    .backbone
                    .get_or_insert_with(Default::default)
                    .noise_scale = Some(parse_value(key, value_str, "float")?);
            }
            "sequence.environment" => {
                config
                    .sequence
                    .get_or_insert_with(Default::default)
                    .environment = Some(value_str.to_string());
            }
            "sequence.relax-cycles" => {
                config
                    .sequence
                    .get_or_insert_with(Default::default)
                    .relax_cycles = Some(parse_value(key, value_str, "integer")?);
            }
            "sequence.seqs-per-struct" => {
                config
                    .sequence
                    .get_or_insert_with(Default::default)
                    .seqs_per_struct = Some(parse_value(key, value_str, "integer")?);
            }
            "prediction.environment" => {
                config
                    .prediction
                    .get_or_insert_with(Default::default)
                    .environment = Some(value_str.to_string());
            }
            "scoring.enabled" => {
                config.scoring.get_or_insert_with(Default::default).enabled =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "scoring.executable" => {
                config
                    .scoring
                    .get_or_insert_with(Default::default)
                    .executable = Some(PathBuf::from(value_str));
            }
            "scoring.score-column" => {
                config
                    .scoring
                    .get_or_insert_with(Default::default)
                    .score_column = Some(value_str.to_string());
            }
            "scoring.timeout-secs" => {
                config
                    .scoring
                    .get_or_insert_with(Default::default)
                    .timeout_secs = Some(parse_value(key, value_str, "integer")?);
            }
            "filter.min-plddt-binder" => {
                config
                    .filter
                    .get_or_insert_with(Default::default)
                    .min_plddt_binder = Some(parse_value(key, value_str, "float")?);
            }
            "filter.max-pae-interaction" => {
                config
                    .filter
                    .get_or_insert_with(Default::default)
                    .max_pae_interaction = Some(parse_value(key, value_str, "float")?);
            }
            "filter.max-binder-aligned-rmsd" => {
                config
                    .filter
                    .get_or_insert_with(Default::default)
                    .max_binder_aligned_rmsd = Some(parse_value(key, value_str, "float")?);
            }
            "filter.max-ddg" => {
                config.filter.get_or_insert_with(Default::default).max_ddg =
                    Some(parse_value(key, value_str, "float")?);
            }
            "stages.from" => {
                config.stages.get_or_insert_with(Default::default).from =
                    Some(value_str.to_string());
            }
            "stages.to" => {
                config.stages.get_or_insert_with(Default::default).to =
                    Some(value_str.to_string());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
