//! CSV persistence of per-design metrics, so a finished run can be filtered
//! again without re-running any external tool.

use crate::core::models::design::{
    DesignId, DesignMetrics, DesignRecord, DesignSet, valid_metric,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsTableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Design {0} appears more than once")]
    DuplicateDesign(DesignId),
}

#[derive(Debug, Serialize, Deserialize)]
struct MetricsRow {
    design: DesignId,
    plddt_binder: Option<f64>,
    pae_interaction: Option<f64>,
    binder_aligned_rmsd: Option<f64>,
    ddg: Option<f64>,
    #[serde(default)]
    passed: bool,
}

pub fn write_metrics(
    writer: impl Write,
    designs: &DesignSet,
    passing: &[DesignId],
) -> Result<(), MetricsTableError> {
    let passing: HashSet<_> = passing.iter().copied().collect();
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in designs {
        let m = record.metrics;
        csv_writer.serialize(MetricsRow {
            design: record.id,
            plddt_binder: m.plddt_binder,
            pae_interaction: m.pae_interaction,
            binder_aligned_rmsd: m.binder_aligned_rmsd,
            ddg: m.ddg,
            passed: passing.contains(&record.id),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_metrics_to_path(
    path: &Path,
    designs: &DesignSet,
    passing: &[DesignId],
) -> Result<(), MetricsTableError> {
    let file = std::fs::File::create(path)?;
    write_metrics(file, designs, passing)
}

/// Reads a metrics table back into a design set, in file order. The stored
/// `passed` column is ignored; filtering is always recomputed. NaN cells are
/// read as absent values.
pub fn read_metrics(reader: impl Read) -> Result<DesignSet, MetricsTableError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        let row: MetricsRow = row?;
        if !seen.insert(row.design) {
            return Err(MetricsTableError::DuplicateDesign(row.design));
        }
        records.push(DesignRecord {
            id: row.design,
            metrics: DesignMetrics {
                plddt_binder: row.plddt_binder.and_then(valid_metric),
                pae_interaction: row.pae_interaction.and_then(valid_metric),
                binder_aligned_rmsd: row.binder_aligned_rmsd.and_then(valid_metric),
                ddg: row.ddg.and_then(valid_metric),
            },
        });
    }
    Ok(DesignSet::from_records(records))
}

pub fn read_metrics_from_path(path: &Path) -> Result<DesignSet, MetricsTableError> {
    let file = std::fs::File::open(path)?;
    read_metrics(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> DesignSet {
        let mut set = DesignSet::with_count(3);
        set.update(DesignId(0), |m| {
            m.plddt_binder = Some(88.5);
            m.pae_interaction = Some(4.25);
            m.binder_aligned_rmsd = Some(0.5);
        });
        set.update(DesignId(2), |m| m.ddg = Some(-41.0));
        set
    }

    #[test]
    fn absent_metrics_are_written_as_empty_cells() {
        let mut out = Vec::new();
        write_metrics(&mut out, &sample_set(), &[DesignId(0)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines[0],
            "design,plddt_binder,pae_interaction,binder_aligned_rmsd,ddg,passed"
        );
        assert_eq!(lines[1], "design_0,88.5,4.25,0.5,,true");
        assert_eq!(lines[2], "design_1,,,,,false");
        assert_eq!(lines[3], "design_2,,,,-41.0,false");
    }

    #[test]
    fn written_table_reads_back_to_the_same_designs() {
        let set = sample_set();
        let mut out = Vec::new();
        write_metrics(&mut out, &set, &[]).unwrap();
        let reloaded = read_metrics(out.as_slice()).unwrap();
        assert_eq!(reloaded, set);
    }

    #[test]
    fn passed_column_is_optional_on_read() {
        let text = "design,plddt_binder,pae_interaction,binder_aligned_rmsd,ddg\ndesign_4,81,9,0.9,\n";
        let set = read_metrics(text.as_bytes()).unwrap();
        let record = set.get(DesignId(4)).unwrap();
        assert_eq!(record.metrics.plddt_binder, Some(81.0));
        assert_eq!(record.metrics.ddg, None);
    }

    #[test]
    fn nan_cells_read_as_absent_and_write_back_empty() {
        let csv = "design,plddt_binder,pae_interaction,binder_aligned_rmsd,ddg,passed\n\
                   design_0,NaN,5.0,0.5,nan,false\n";
        let set = read_metrics(csv.as_bytes()).unwrap();
        let m = set.get(DesignId(0)).unwrap().metrics;
        assert_eq!(m.plddt_binder, None);
        assert_eq!(m.pae_interaction, Some(5.0));
        assert_eq!(m.ddg, None);

        let mut out = Vec::new();
        write_metrics(&mut out, &set, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(1), Some("design_0,,5.0,0.5,,false"));
    }

    #[test]
    fn duplicate_designs_are_rejected() {
        let text = "design,plddt_binder,pae_interaction,binder_aligned_rmsd,ddg,passed\ndesign_1,,,,,false\ndesign_1,,,,,false\n";
        assert!(matches!(
            read_metrics(text.as_bytes()),
            Err(MetricsTableError::DuplicateDesign(DesignId(1)))
        ));
    }
}
