use super::filter::summary_lines;
use crate::cli::RunArgs;
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use crate::ui::{CliProgressHandler, UiEvent};
use binderflow::{
    core::io::metrics_table,
    engine::{config::Stage, process::LocalToolRunner, progress::ProgressReporter},
    workflows::{self, design::DesignReport},
};
use std::fs;
use tokio::sync::mpsc;
use tracing::{info, warn};

pub async fn run(args: RunArgs, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args)?;
    let config = &app.core_config;

    let progress_handler = CliProgressHandler::new(ui_sender.clone());
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Starting binder design for {} ({} design(s), stages {}..{})",
        app.pdb_id, config.num_designs, config.stages.first, config.stages.last
    );
    info!("Invoking the core design workflow...");

    let report = workflows::design::run(config, &LocalToolRunner, &reporter).await?;

    for line in report_lines(&app, &report)? {
        if ui_sender.send(UiEvent::Log(line)).await.is_err() {
            warn!("UI channel closed before the run summary was printed.");
            break;
        }
    }
    Ok(())
}

/// Writes the metrics table when any metric-producing stage ran and returns
/// the lines to show the user.
fn report_lines(app: &AppConfig, report: &DesignReport) -> Result<Vec<String>> {
    let config = &app.core_config;
    let mut lines = Vec::new();

    if let Some(summary) = &report.summary {
        lines.extend(summary_lines(summary));
    }

    if config.runs(Stage::Prediction) || config.runs(Stage::Scoring) {
        if let Some(parent) = app
            .report_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            fs::create_dir_all(parent)?;
        }
        let passing = report
            .summary
            .as_ref()
            .map(|s| s.passing.as_slice())
            .unwrap_or(&[]);
        metrics_table::write_metrics_to_path(&app.report_path, &report.designs, passing)
            .map_err(|e| CliError::parsing(&app.report_path, e))?;
        info!("Metrics for {} design(s) written to {:?}", report.designs.len(), app.report_path);
        lines.push(format!("Metrics written to {}", app.report_path.display()));
    } else {
        info!("No metric-producing stage ran; skipping the metrics table.");
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RunArgs;
    use binderflow::core::models::design::{DesignId, DesignSet};
    use binderflow::engine::filter::FilterSummary;

    fn app_config(report_path: std::path::PathBuf, to: Stage) -> AppConfig {
        let args = RunArgs {
            pdb_id: Some("5O45".to_string()),
            contigs: Some("A17-145/0 50-100".to_string()),
            report: Some(report_path),
            to_stage: Some(to),
            ..Default::default()
        };
        build_config(&args).unwrap()
    }

    fn sample_report() -> DesignReport {
        let mut designs = DesignSet::with_count(2);
        designs.update(DesignId(1), |m| {
            m.plddt_binder = Some(92.0);
            m.pae_interaction = Some(4.0);
            m.binder_aligned_rmsd = Some(0.4);
        });
        DesignReport {
            designs,
            summary: Some(FilterSummary {
                passing: vec![DesignId(1)],
                count: 1,
                total: 2,
                rate: 0.5,
            }),
        }
    }

    #[test]
    fn report_is_written_with_pass_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/designs.csv");
        let app = app_config(path.clone(), Stage::Prediction);

        let lines = report_lines(&app, &sample_report()).unwrap();

        assert_eq!(lines[0], "1/2 design(s) passed the filter (50.0%)");
        assert_eq!(lines[1], "  ✓ design_1");
        assert!(lines[2].starts_with("Metrics written to"));
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("design_1,92.0,4.0,0.4,,true"));
        assert!(text.contains("design_0,,,,,false"));
    }

    #[test]
    fn no_table_when_only_early_stages_ran() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("designs.csv");
        let app = app_config(path.clone(), Stage::Sequence);
        let report = DesignReport {
            designs: DesignSet::with_count(2),
            summary: None,
        };

        let lines = report_lines(&app, &report).unwrap();
        assert!(lines.is_empty());
        assert!(!path.exists());
    }
}
