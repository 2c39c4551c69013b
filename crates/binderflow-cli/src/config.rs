//! Layered configuration for the CLI: CLI flags override `--set` values,
//! which override the TOML file, which overrides [`defaults::DefaultsConfig`].

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

pub use builder::{build_config, build_thresholds};
pub use file::FileConfig;
pub use models::AppConfig;
