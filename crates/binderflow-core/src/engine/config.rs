use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

/// The external-tool stages, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Backbone,
    Sequence,
    Prediction,
    Scoring,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Backbone,
        Stage::Sequence,
        Stage::Prediction,
        Stage::Scoring,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Backbone => "backbone",
            Stage::Sequence => "sequence",
            Stage::Prediction => "prediction",
            Stage::Scoring => "scoring",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown stage '{0}'. Expected one of: backbone, sequence, prediction, scoring.")]
pub struct UnknownStage(pub String);

impl FromStr for Stage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}

/// An inclusive, contiguous range of stages to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSelection {
    pub first: Stage,
    pub last: Stage,
}

impl Default for StageSelection {
    fn default() -> Self {
        Self {
            first: Stage::Backbone,
            last: Stage::Scoring,
        }
    }
}

impl StageSelection {
    pub fn contains(&self, stage: Stage) -> bool {
        self.first <= stage && stage <= self.last
    }
}

/// How to launch a script inside a named conda environment.
#[derive(Debug, Clone, PartialEq)]
pub struct CondaEnvironment {
    pub executable: String,
    pub name: String,
    pub python: String,
}

impl CondaEnvironment {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            executable: "conda".to_string(),
            name: name.into(),
            python: "python".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackboneConfig {
    pub docker_executable: String,
    pub image: String,
    pub use_gpus: bool,
    pub models_dir: PathBuf,
    pub target_dir: PathBuf,
    pub target_file: String,
    pub output_dir: PathBuf,
    pub output_prefix: String,
    pub contigs: String,
    pub hotspots: String,
    pub noise_scale: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceConfig {
    pub environment: CondaEnvironment,
    pub script_path: PathBuf,
    pub scratch_dir: PathBuf,
    pub output_dir: PathBuf,
    pub relax_cycles: u32,
    pub seqs_per_struct: u32,
    pub checkpoint_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionConfig {
    pub environment: CondaEnvironment,
    pub script_path: PathBuf,
    pub scratch_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub executable: PathBuf,
    pub work_dir: PathBuf,
    pub score_column: String,
    pub timeout: Duration,
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterThresholds {
    pub min_plddt_binder: f64,
    pub max_pae_interaction: f64,
    pub max_binder_aligned_rmsd: f64,
    pub max_ddg: f64,
}

impl Default for FilterThresholds {
    fn default() -> Self {
        Self {
            min_plddt_binder: 80.0,
            max_pae_interaction: 10.0,
            max_binder_aligned_rmsd: 1.0,
            max_ddg: -40.0,
        }
    }
}

/// Immutable configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub num_designs: usize,
    pub backbone: BackboneConfig,
    pub sequence: SequenceConfig,
    pub prediction: PredictionConfig,
    pub scoring: Option<ScoringConfig>,
    pub filter: FilterThresholds,
    pub stages: StageSelection,
}

impl RunConfig {
    pub fn runs(&self, stage: Stage) -> bool {
        self.stages.contains(stage) && (stage != Stage::Scoring || self.scoring.is_some())
    }
}

#[derive(Default)]
pub struct RunConfigBuilder {
    num_designs: Option<usize>,
    backbone: Option<BackboneConfig>,
    sequence: Option<SequenceConfig>,
    prediction: Option<PredictionConfig>,
    scoring: Option<ScoringConfig>,
    filter: Option<FilterThresholds>,
    stages: Option<StageSelection>,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_designs(mut self, n: usize) -> Self {
        self.num_designs = Some(n);
        self
    }
    pub fn backbone(mut self, config: BackboneConfig) -> Self {
        self.backbone = Some(config);
        self
    }
    pub fn sequence(mut self, config: SequenceConfig) -> Self {
        self.sequence = Some(config);
        self
    }
    pub fn prediction(mut self, config: PredictionConfig) -> Self {
        self.prediction = Some(config);
        self
    }
    pub fn scoring(mut self, config: Option<ScoringConfig>) -> Self {
        self.scoring = config;
        self
    }
    pub fn filter(mut self, thresholds: FilterThresholds) -> Self {
        self.filter = Some(thresholds);
        self
    }
    pub fn stages(mut self, selection: StageSelection) -> Self {
        self.stages = Some(selection);
        self
    }

    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let num_designs = self
            .num_designs
            .ok_or(ConfigError::MissingParameter("num_designs"))?;
        if num_designs == 0 {
            return Err(invalid("num_designs", "at least one design is required"));
        }

        let backbone = self
            .backbone
            .ok_or(ConfigError::MissingParameter("backbone"))?;
        if !backbone.noise_scale.is_finite() || backbone.noise_scale < 0.0 {
            return Err(invalid(
                "backbone.noise_scale",
                format!("{} is not a non-negative number", backbone.noise_scale),
            ));
        }
        if backbone.contigs.trim().is_empty() {
            return Err(invalid("backbone.contigs", "contig string is empty"));
        }
        if backbone.target_file.trim().is_empty() {
            return Err(invalid("backbone.target_file", "file name is empty"));
        }

        let sequence = self
            .sequence
            .ok_or(ConfigError::MissingParameter("sequence"))?;
        let prediction = self
            .prediction
            .ok_or(ConfigError::MissingParameter("prediction"))?;
        if sequence.scratch_dir == prediction.scratch_dir {
            return Err(invalid(
                "prediction.scratch_dir",
                "must differ from the sequence stage scratch directory",
            ));
        }

        if let Some(scoring) = &self.scoring {
            if scoring.timeout.is_zero() {
                return Err(invalid("scoring.timeout", "timeout must be positive"));
            }
            if scoring.score_column.trim().is_empty() {
                return Err(invalid("scoring.score_column", "column name is empty"));
            }
        }

        let stages = self.stages.unwrap_or_default();
        if stages.first > stages.last {
            return Err(invalid(
                "stages",
                format!("'{}' comes after '{}'", stages.first, stages.last),
            ));
        }
        if stages.first == Stage::Scoring && self.scoring.is_none() {
            return Err(invalid(
                "stages",
                "only the scoring stage was selected but scoring is disabled",
            ));
        }

        Ok(RunConfig {
            num_designs,
            backbone,
            sequence,
            prediction,
            scoring: self.scoring,
            filter: self.filter.unwrap_or_default(),
            stages,
        })
    }
}
