use super::config::FilterThresholds;
use crate::core::models::design::{DesignId, DesignMetrics, DesignSet};
use tracing::{debug, info};

/// Outcome of filtering a design set.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSummary {
    pub passing: Vec<DesignId>,
    pub count: usize,
    pub total: usize,
    pub rate: f64,
}

/// Whether a single design clears every threshold.
///
/// The three predictor metrics are required; a design missing any of them
/// never passes. `ddg` is only checked when present.
pub fn passes(metrics: &DesignMetrics, thresholds: &FilterThresholds) -> bool {
    let (Some(plddt), Some(pae), Some(rmsd)) = (
        metrics.plddt_binder,
        metrics.pae_interaction,
        metrics.binder_aligned_rmsd,
    ) else {
        return false;
    };

    plddt > thresholds.min_plddt_binder
        && pae < thresholds.max_pae_interaction
        && rmsd < thresholds.max_binder_aligned_rmsd
        && metrics.ddg.is_none_or(|ddg| ddg < thresholds.max_ddg)
}

/// Selects passing designs in iteration order. `total` is the number of
/// designs that were requested and is the denominator of the pass rate.
pub fn apply_filter(
    designs: &DesignSet,
    total: usize,
    thresholds: &FilterThresholds,
) -> FilterSummary {
    let passing: Vec<DesignId> = designs
        .iter()
        .filter(|record| {
            let ok = passes(&record.metrics, thresholds);
            if !ok {
                debug!("{} rejected: {:?}", record.id, record.metrics);
            }
            ok
        })
        .map(|record| record.id)
        .collect();

    let count = passing.len();
    let rate = if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    };
    info!("{} of {} designs passed the filter", count, total);

    FilterSummary {
        passing,
        count,
        total,
        rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::design::DesignRecord;

    fn metrics(plddt: f64, pae: f64, rmsd: f64, ddg: Option<f64>) -> DesignMetrics {
        DesignMetrics {
            plddt_binder: Some(plddt),
            pae_interaction: Some(pae),
            binder_aligned_rmsd: Some(rmsd),
            ddg,
        }
    }

    fn set_of(all: Vec<DesignMetrics>) -> DesignSet {
        DesignSet::from_records(
            all.into_iter()
                .enumerate()
                .map(|(i, m)| DesignRecord {
                    id: DesignId(i),
                    metrics: m,
                })
                .collect(),
        )
    }

    #[test]
    fn design_meeting_all_thresholds_passes() {
        let t = FilterThresholds::default();
        assert!(passes(&metrics(85.0, 5.0, 0.5, Some(-50.0)), &t));
        assert!(passes(&metrics(85.0, 5.0, 0.5, None), &t));
    }

    #[test]
    fn thresholds_are_strict() {
        let t = FilterThresholds::default();
        assert!(!passes(&metrics(80.0, 5.0, 0.5, None), &t));
        assert!(!passes(&metrics(85.0, 10.0, 0.5, None), &t));
        assert!(!passes(&metrics(85.0, 5.0, 1.0, None), &t));
        assert!(!passes(&metrics(85.0, 5.0, 0.5, Some(-40.0)), &t));
    }

    #[test]
    fn absent_ddg_differs_from_failing_ddg() {
        let t = FilterThresholds::default();
        assert!(passes(&metrics(90.0, 2.0, 0.2, None), &t));
        assert!(!passes(&metrics(90.0, 2.0, 0.2, Some(-10.0)), &t));
    }

    #[test]
    fn missing_required_metric_is_skipped() {
        let t = FilterThresholds::default();
        let mut m = metrics(90.0, 2.0, 0.2, Some(-60.0));
        m.pae_interaction = None;
        assert!(!passes(&m, &t));
        assert!(!passes(&DesignMetrics::default(), &t));
    }

    #[test]
    fn summary_reports_passing_ids_in_order_and_rate() {
        let designs = set_of(vec![
            metrics(85.0, 5.0, 0.5, Some(-50.0)),
            metrics(70.0, 5.0, 0.5, None),
            DesignMetrics::default(),
            metrics(92.0, 3.0, 0.8, None),
        ]);
        let summary = apply_filter(&designs, 4, &FilterThresholds::default());
        assert_eq!(summary.passing, vec![DesignId(0), DesignId(3)]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total, 4);
        assert!((summary.rate - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_total_gives_zero_rate() {
        let summary = apply_filter(&DesignSet::default(), 0, &FilterThresholds::default());
        assert_eq!(summary.count, 0);
        assert_eq!(summary.rate, 0.0);
    }

    #[test]
    fn filtering_twice_gives_the_same_summary() {
        let designs = set_of(vec![
            metrics(85.0, 5.0, 0.5, None),
            metrics(81.0, 9.0, 0.9, Some(-39.0)),
        ]);
        let t = FilterThresholds::default();
        assert_eq!(apply_filter(&designs, 2, &t), apply_filter(&designs, 2, &t));
    }

    #[test]
    fn custom_thresholds_are_honoured() {
        let t = FilterThresholds {
            min_plddt_binder: 60.0,
            ..FilterThresholds::default()
        };
        assert!(passes(&metrics(70.0, 5.0, 0.5, None), &t));
    }
}
