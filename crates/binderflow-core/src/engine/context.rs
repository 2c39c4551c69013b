use super::config::{RunConfig, Stage};
use super::progress::{Progress, ProgressReporter};
use tracing::{Span, info_span};

/// Per-run state handed to every stage: the configuration, the progress
/// reporter and the tracing span that scopes all of the run's log output.
pub struct RunContext<'a> {
    pub label: String,
    pub config: &'a RunConfig,
    pub reporter: &'a ProgressReporter<'a>,
    span: Span,
}

impl<'a> RunContext<'a> {
    pub fn new(
        label: impl Into<String>,
        config: &'a RunConfig,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        let label = label.into();
        let span = info_span!("run", label = %label);
        Self {
            label,
            config,
            reporter,
            span,
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// A child span of the run span for one stage.
    pub fn stage_span(&self, stage: Stage) -> Span {
        info_span!(parent: &self.span, "stage", name = stage.name())
    }

    pub fn report(&self, event: Progress) {
        self.reporter.report(event);
    }
}
