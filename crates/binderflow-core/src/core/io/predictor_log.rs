//! Line parser for the text stream printed by the AlphaFold2 initial-guess
//! predictor.
//!
//! The stream interleaves plain progress lines, some of which name the design
//! being predicted (`..._design_3_dldesign_0...`), with dictionary-literal lines
//! holding that design's metrics. A metrics line belongs to the design named
//! most recently above it.

use super::literal::{self, DictLiteral};
use crate::core::models::design::{
    DesignId, DesignMetrics, DesignSet, first_design_token, valid_metric,
};
use tracing::{debug, warn};

pub const PLDDT_BINDER: &str = "plddt_binder";
pub const PAE_INTERACTION: &str = "pae_interaction";
pub const BINDER_ALIGNED_RMSD: &str = "binder_aligned_rmsd";

/// The classification of a single predictor output line.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictorLine {
    DesignMarker(DesignId),
    Metrics(DictLiteral),
    Other,
}

pub fn classify_line(line: &str) -> PredictorLine {
    let trimmed = line.trim();
    if literal::looks_like_dict(trimmed) {
        return match literal::parse_dict(trimmed) {
            Ok(dict) => PredictorLine::Metrics(dict),
            Err(e) => {
                debug!("Ignoring malformed metrics line '{}': {}", trimmed, e);
                PredictorLine::Other
            }
        };
    }

    first_design_token(trimmed)
        .map(PredictorLine::DesignMarker)
        .unwrap_or(PredictorLine::Other)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    #[default]
    AwaitingDesign,
    AwaitingMetrics {
        current: DesignId,
    },
    MetricsSeen {
        current: DesignId,
    },
}

/// Metrics extracted from one dictionary line for one design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricUpdate {
    pub id: DesignId,
    pub plddt_binder: Option<f64>,
    pub pae_interaction: Option<f64>,
    pub binder_aligned_rmsd: Option<f64>,
}

impl MetricUpdate {
    fn from_dict(id: DesignId, dict: &DictLiteral) -> Self {
        let field = |key: &str| {
            match dict.get(key) {
                Some(value) if value.as_number().is_none() => {
                    warn!("Metric '{}' for {} is not a number: {:?}", key, id, value);
                }
                _ => {}
            }
            dict.number(key).and_then(valid_metric)
        };
        Self {
            id,
            plddt_binder: field(PLDDT_BINDER),
            pae_interaction: field(PAE_INTERACTION),
            binder_aligned_rmsd: field(BINDER_ALIGNED_RMSD),
        }
    }

    /// Fields missing from the update leave the existing values untouched.
    pub fn apply_to(&self, metrics: &mut DesignMetrics) {
        if let Some(v) = self.plddt_binder {
            metrics.plddt_binder = Some(v);
        }
        if let Some(v) = self.pae_interaction {
            metrics.pae_interaction = Some(v);
        }
        if let Some(v) = self.binder_aligned_rmsd {
            metrics.binder_aligned_rmsd = Some(v);
        }
    }
}

#[derive(Debug, Default)]
pub struct PredictorLogParser {
    state: ParserState,
}

impl PredictorLogParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn feed(&mut self, line: &str) -> Option<MetricUpdate> {
        match (classify_line(line), self.state) {
            (PredictorLine::DesignMarker(id), _) => {
                self.state = ParserState::AwaitingMetrics { current: id };
                None
            }
            (PredictorLine::Metrics(_), ParserState::AwaitingDesign) => {
                debug!("Metrics line before any design identifier; dropping it.");
                None
            }
            (PredictorLine::Metrics(dict), ParserState::AwaitingMetrics { current }) => {
                self.state = ParserState::MetricsSeen { current };
                Some(MetricUpdate::from_dict(current, &dict))
            }
            (PredictorLine::Metrics(dict), ParserState::MetricsSeen { current }) => {
                warn!(
                    "Second metrics line for {} without a new design identifier; the later values replace the earlier ones.",
                    current
                );
                Some(MetricUpdate::from_dict(current, &dict))
            }
            (PredictorLine::Other, _) => None,
        }
    }
}

/// Parses `text` and writes every attributed metric into `designs`.
/// Returns the number of metric lines that were applied to a known design.
pub fn apply_predictor_output(text: &str, designs: &mut DesignSet) -> usize {
    let mut parser = PredictorLogParser::new();
    text.lines()
        .filter_map(|line| parser.feed(line))
        .filter(|update| designs.update(update.id, |m| update.apply_to(m)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRICS_3: &str =
        "{'plddt_binder': 85.1, 'pae_interaction': 5.2, 'binder_aligned_rmsd': 0.4}";

    #[test]
    fn metrics_after_design_marker_populate_that_design() {
        let text = format!("Processing 5O45_design_3_dldesign_0_cycle1\n{}\n", METRICS_3);
        let mut designs = DesignSet::with_count(5);

        assert_eq!(apply_predictor_output(&text, &mut designs), 1);

        let m = designs.get(DesignId(3)).unwrap().metrics;
        assert_eq!(m.plddt_binder, Some(85.1));
        assert_eq!(m.pae_interaction, Some(5.2));
        assert_eq!(m.binder_aligned_rmsd, Some(0.4));
        assert_eq!(m.ddg, None);
        assert!(designs.get(DesignId(0)).unwrap().metrics.is_empty());
    }

    #[test]
    fn first_design_token_on_a_line_wins() {
        assert_eq!(
            classify_line("5O45_design_3_dldesign_0"),
            PredictorLine::DesignMarker(DesignId(3))
        );
    }

    #[test]
    fn designer_suffix_alone_is_not_a_marker() {
        assert_eq!(
            classify_line("relaxed 5O45_dldesign_7_cycle1"),
            PredictorLine::Other
        );
    }

    #[test]
    fn metrics_after_designer_suffix_line_stay_with_previous_design() {
        let text = format!(
            "5O45_design_2_dldesign_0_cycle1\nrelaxed 5O45_dldesign_1_cycle1\n{}\n",
            METRICS_3
        );
        let mut designs = DesignSet::with_count(3);
        assert_eq!(apply_predictor_output(&text, &mut designs), 1);
        assert_eq!(
            designs.get(DesignId(2)).unwrap().metrics.plddt_binder,
            Some(85.1)
        );
        assert!(designs.get(DesignId(1)).unwrap().metrics.is_empty());
    }

    #[test]
    fn metrics_without_preceding_marker_are_dropped() {
        let mut designs = DesignSet::with_count(2);
        assert_eq!(apply_predictor_output(METRICS_3, &mut designs), 0);
        assert!(designs.iter().all(|r| r.metrics.is_empty()));
    }

    #[test]
    fn metrics_are_attributed_to_the_most_recent_marker() {
        let text = format!(
            "design_0\nsome log line\ndesign_1\nanother line\n{}\n",
            METRICS_3
        );
        let mut designs = DesignSet::with_count(2);
        apply_predictor_output(&text, &mut designs);
        assert!(designs.get(DesignId(0)).unwrap().metrics.is_empty());
        assert_eq!(
            designs.get(DesignId(1)).unwrap().metrics.plddt_binder,
            Some(85.1)
        );
    }

    #[test]
    fn second_metrics_line_for_same_design_overwrites_the_first() {
        let text = "design_0\n{'plddt_binder': 70.0, 'pae_interaction': 3.0}\n{'plddt_binder': 91.0}\n";
        let mut designs = DesignSet::with_count(1);
        assert_eq!(apply_predictor_output(text, &mut designs), 2);
        let m = designs.get(DesignId(0)).unwrap().metrics;
        assert_eq!(m.plddt_binder, Some(91.0));
        assert_eq!(m.pae_interaction, Some(3.0));
    }

    #[test]
    fn parser_state_tracks_markers_and_metrics() {
        let mut parser = PredictorLogParser::new();
        assert_eq!(parser.state(), ParserState::AwaitingDesign);
        parser.feed("design_2");
        assert_eq!(
            parser.state(),
            ParserState::AwaitingMetrics {
                current: DesignId(2)
            }
        );
        parser.feed(METRICS_3);
        assert_eq!(
            parser.state(),
            ParserState::MetricsSeen {
                current: DesignId(2)
            }
        );
    }

    #[test]
    fn unsafe_or_malformed_dict_lines_are_ignored() {
        let text = "design_0\n{'plddt_binder': __import__('os').system('ls')}\n";
        let mut designs = DesignSet::with_count(1);
        assert_eq!(apply_predictor_output(text, &mut designs), 0);
        assert!(designs.get(DesignId(0)).unwrap().metrics.is_empty());
    }

    #[test]
    fn non_numeric_and_nan_values_leave_fields_absent() {
        let text = "design_0\n{'plddt_binder': 'high', 'pae_interaction': nan, 'binder_aligned_rmsd': 0.7}\n";
        let mut designs = DesignSet::with_count(1);
        apply_predictor_output(text, &mut designs);
        let m = designs.get(DesignId(0)).unwrap().metrics;
        assert_eq!(m.plddt_binder, None);
        assert_eq!(m.pae_interaction, None);
        assert_eq!(m.binder_aligned_rmsd, Some(0.7));
    }

    #[test]
    fn metrics_for_designs_outside_the_set_are_not_counted() {
        let text = format!("design_9\n{}\n", METRICS_3);
        let mut designs = DesignSet::with_count(2);
        assert_eq!(apply_predictor_output(&text, &mut designs), 0);
    }
}
