use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileTargetConfig {
    pub pdb_id: Option<String>,
    pub input_dir: Option<PathBuf>,
    pub file: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileBackboneConfig {
    pub docker: Option<String>,
    pub image: Option<String>,
    pub gpus: Option<bool>,
    pub models_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub output_prefix: Option<String>,
    pub contigs: Option<String>,
    pub hotspots: Option<String>,
    pub noise_scale: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSequenceConfig {
    pub conda: Option<String>,
    pub environment: Option<String>,
    pub python: Option<String>,
    pub script: Option<PathBuf>,
    pub scratch_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub relax_cycles: Option<u32>,
    pub seqs_per_struct: Option<u32>,
    pub checkpoint: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilePredictionConfig {
    pub conda: Option<String>,
    pub environment: Option<String>,
    pub python: Option<String>,
    pub script: Option<PathBuf>,
    pub scratch_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileScoringConfig {
    pub enabled: Option<bool>,
    pub executable: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub score_column: Option<String>,
    pub timeout_secs: Option<u64>,
    pub extra_args: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileFilterConfig {
    pub min_plddt_binder: Option<f64>,
    pub max_pae_interaction: Option<f64>,
    pub max_binder_aligned_rmsd: Option<f64>,
    pub max_ddg: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileStagesConfig {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub num_designs: Option<usize>,
    pub report: Option<PathBuf>,
    pub target: Option<FileTargetConfig>,
    pub backbone: Option<FileBackboneConfig>,
    pub sequence: Option<FileSequenceConfig>,
    pub prediction: Option<FilePredictionConfig>,
    pub scoring: Option<FileScoringConfig>,
    pub filter: Option<FileFilterConfig>,
    pub stages: Option<FileStagesConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::parsing(path, e))
    }
}
