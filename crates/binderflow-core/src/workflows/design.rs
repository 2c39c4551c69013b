use crate::core::models::design::DesignSet;
use crate::engine::config::{RunConfig, Stage};
use crate::engine::context::RunContext;
use crate::engine::error::PipelineError;
use crate::engine::filter::{FilterSummary, apply_filter};
use crate::engine::process::ToolRunner;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::stages;
use tracing::{Instrument, info, instrument};

#[derive(Debug, Clone)]
pub struct DesignReport {
    pub designs: DesignSet,
    /// Present whenever the prediction stage ran.
    pub summary: Option<FilterSummary>,
}

#[instrument(skip_all, name = "design_workflow")]
pub async fn run(
    config: &RunConfig,
    runner: &dyn ToolRunner,
    reporter: &ProgressReporter<'_>,
) -> Result<DesignReport, PipelineError> {
    let ctx = RunContext::new(config.backbone.output_prefix.clone(), config, reporter);
    let span = ctx.span().clone();
    run_stages(&ctx, runner).instrument(span).await
}

async fn run_stages(
    ctx: &RunContext<'_>,
    runner: &dyn ToolRunner,
) -> Result<DesignReport, PipelineError> {
    let config = ctx.config;
    let mut designs = DesignSet::with_count(config.num_designs);
    info!(
        "Starting design run '{}' for {} design(s), stages {}..{}",
        ctx.label, config.num_designs, config.stages.first, config.stages.last
    );

    // === Stage 1: Backbone generation ===
    if config.runs(Stage::Backbone) {
        ctx.report(Progress::PhaseStart {
            name: "Backbone Generation",
        });
        stages::backbone::run(ctx, runner)
            .instrument(ctx.stage_span(Stage::Backbone))
            .await?;
        ctx.report(Progress::PhaseFinish);
    }

    // === Stage 2: Sequence design ===
    if config.runs(Stage::Sequence) {
        ctx.report(Progress::PhaseStart {
            name: "Sequence Design",
        });
        stages::sequence::run(ctx, runner, &config.backbone.output_dir)
            .instrument(ctx.stage_span(Stage::Sequence))
            .await?;
        ctx.report(Progress::PhaseFinish);
    }

    // === Stage 3: Structure prediction ===
    if config.runs(Stage::Prediction) {
        ctx.report(Progress::PhaseStart {
            name: "Structure Prediction",
        });
        stages::prediction::run(ctx, runner, &config.sequence.output_dir, &mut designs)
            .instrument(ctx.stage_span(Stage::Prediction))
            .await?;
        ctx.report(Progress::PhaseFinish);
    }

    // === Stage 4: Interface scoring (optional) ===
    if config.runs(Stage::Scoring) {
        ctx.report(Progress::PhaseStart {
            name: "Interface Scoring",
        });
        stages::scoring::run(ctx, runner, &mut designs)
            .instrument(ctx.stage_span(Stage::Scoring))
            .await?;
        ctx.report(Progress::PhaseFinish);
    }

    // === Filter ===
    let summary = config.runs(Stage::Prediction).then(|| {
        ctx.report(Progress::PhaseStart { name: "Filtering" });
        let summary = apply_filter(&designs, config.num_designs, &config.filter);
        ctx.report(Progress::PhaseFinish);
        summary
    });

    info!("Design run '{}' complete.", ctx.label);
    Ok(DesignReport { designs, summary })
}
