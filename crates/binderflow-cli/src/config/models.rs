use binderflow::engine::config::RunConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub pdb_id: String,
    pub report_path: PathBuf,
    pub core_config: RunConfig,
}
