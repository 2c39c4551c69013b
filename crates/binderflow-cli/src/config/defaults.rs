/// Fallback values used when neither the CLI nor the config file sets a key.
pub struct DefaultsConfig {
    pub num_designs: usize,
    pub docker_executable: &'static str,
    pub backbone_image: &'static str,
    pub use_gpus: bool,
    pub noise_scale: f64,
    pub models_dir: &'static str,
    pub target_dir: &'static str,
    pub backbone_output_dir: &'static str,
    pub conda_executable: &'static str,
    pub conda_environment: &'static str,
    pub python: &'static str,
    pub sequence_script: &'static str,
    pub sequence_scratch_dir: &'static str,
    pub sequence_output_dir: &'static str,
    pub relax_cycles: u32,
    pub seqs_per_struct: u32,
    pub prediction_script: &'static str,
    pub prediction_scratch_dir: &'static str,
    pub prediction_output_dir: &'static str,
    pub scoring_work_dir: &'static str,
    pub score_column: &'static str,
    pub scoring_timeout_secs: u64,
    pub report_path: &'static str,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            num_designs: 20,
            docker_executable: "docker",
            backbone_image: "rfdiffusion",
            use_gpus: true,
            noise_scale: 0.0,
            models_dir: "models",
            target_dir: "inputs",
            backbone_output_dir: "outputs/backbones",
            conda_executable: "conda",
            conda_environment: "binder_design",
            python: "python",
            sequence_script: "dl_binder_design/mpnn_fr/dl_interface_design.py",
            sequence_scratch_dir: "scratch/mpnn",
            sequence_output_dir: "outputs/sequences",
            relax_cycles: 1,
            seqs_per_struct: 1,
            prediction_script: "dl_binder_design/af2_initial_guess/predict.py",
            prediction_scratch_dir: "scratch/af2",
            prediction_output_dir: "outputs/predictions",
            scoring_work_dir: "outputs/scores",
            score_column: "ddg",
            scoring_timeout_secs: 600,
            report_path: "designs.csv",
        }
    }
}
