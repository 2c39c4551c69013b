use binderflow::engine::config::Stage;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "binderflow - Drive a protein-binder design pipeline: backbone generation, sequence design, structure prediction, interface scoring and filtering.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the design pipeline (or a contiguous range of its stages).
    Run(RunArgs),
    /// Download a target structure, strip non-protein records and list its chains.
    Target(TargetArgs),
    /// Re-apply the filter to a metrics table written by a previous run.
    Filter(FilterArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Path to the pipeline configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Target ---
    /// PDB id of the target (e.g., '5O45').
    #[arg(short, long, value_name = "ID")]
    pub pdb_id: Option<String>,

    // --- Backbone Overrides ---
    /// Number of designs to generate.
    #[arg(short, long, value_name = "INT")]
    pub num_designs: Option<usize>,

    /// Contig specification passed to the backbone generator (e.g., 'A17-145/0 50-100').
    #[arg(long, value_name = "CONTIGS")]
    pub contigs: Option<String>,

    /// Comma-separated hotspot residues on the target (e.g., 'A56,A115').
    #[arg(long, value_name = "LIST")]
    pub hotspots: Option<String>,

    /// Noise scale for both CA and frame denoising.
    #[arg(long, value_name = "FLOAT")]
    pub noise_scale: Option<f64>,

    /// Run the backbone container without GPU access.
    #[arg(long)]
    pub no_gpus: bool,

    // --- Stage Selection ---
    /// First stage to run.
    #[arg(long = "from", value_name = "STAGE")]
    pub from_stage: Option<Stage>,

    /// Last stage to run.
    #[arg(long = "to", value_name = "STAGE")]
    pub to_stage: Option<Stage>,

    /// Skip interface scoring, even if it is configured in the file.
    #[arg(long)]
    pub no_scoring: bool,

    // --- Output ---
    /// Where to write the per-design metrics table (CSV).
    #[arg(short, long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S sequence.relax-cycles=2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Filter threshold overrides shared by `run` and `filter`.
#[derive(Args, Debug, Default, Clone, Copy)]
pub struct ThresholdArgs {
    /// A design passes only if its binder pLDDT is above this value.
    #[arg(long, value_name = "FLOAT")]
    pub min_plddt_binder: Option<f64>,

    /// A design passes only if its interaction PAE is below this value.
    #[arg(long, value_name = "FLOAT")]
    pub max_pae_interaction: Option<f64>,

    /// A design passes only if its binder-aligned RMSD is below this value.
    #[arg(long, value_name = "FLOAT")]
    pub max_binder_aligned_rmsd: Option<f64>,

    /// A scored design passes only if its ddG is below this value.
    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub max_ddg: Option<f64>,
}

/// Arguments for the `target` subcommand.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// PDB id of the target to fetch from RCSB.
    #[arg(required = true, value_name = "ID")]
    pub pdb_id: String,

    /// Directory that receives '<ID>.pdb' and '<ID>_cleaned.pdb'.
    #[arg(short, long, value_name = "DIR", default_value = "inputs")]
    pub input_dir: PathBuf,

    /// Use an existing '<ID>.pdb' in the input directory instead of downloading it.
    #[arg(long)]
    pub skip_download: bool,
}

/// Arguments for the `filter` subcommand.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Metrics table written by `binderflow run`.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub metrics: PathBuf,

    /// Optional configuration file providing the `[filter]` thresholds.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the re-filtered table here instead of only printing the summary.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}
