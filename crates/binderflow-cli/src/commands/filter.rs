use crate::cli::FilterArgs;
use crate::config::{FileConfig, build_thresholds};
use crate::error::{CliError, Result};
use binderflow::core::io::metrics_table;
use binderflow::engine::filter::{FilterSummary, apply_filter};
use tracing::info;

pub fn run(args: FilterArgs) -> Result<()> {
    let file_filter = match &args.config {
        Some(path) => FileConfig::from_file(path)?.filter,
        None => None,
    };
    let thresholds = build_thresholds(&args.thresholds, file_filter);
    info!("Filtering with thresholds {:?}", thresholds);

    let designs = metrics_table::read_metrics_from_path(&args.metrics)
        .map_err(|e| CliError::parsing(&args.metrics, e))?;
    let summary = apply_filter(&designs, designs.len(), &thresholds);

    for line in summary_lines(&summary) {
        println!("{}", line);
    }

    if let Some(output) = &args.output {
        metrics_table::write_metrics_to_path(output, &designs, &summary.passing)
            .map_err(|e| CliError::parsing(output, e))?;
        println!("Metrics written to {}", output.display());
    }
    Ok(())
}

pub(crate) fn summary_lines(summary: &FilterSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "{}/{} design(s) passed the filter ({:.1}%)",
        summary.count,
        summary.total,
        summary.rate * 100.0
    )];
    lines.extend(summary.passing.iter().map(|id| format!("  ✓ {}", id)));
    lines
}
