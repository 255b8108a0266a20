//! Whole-run orchestration: load, compute, build, render.
//!
//! A run either produces all six artifacts or nothing. The first error from
//! any stage moves the run to [`PipelineState::Failed`], is logged once as the
//! run diagnostic, and the caller sees no [`Report`].

use super::metrics::{RunMetrics, RunMetricsSnapshot};
use crate::analysis::{Metrics, RangeInvariantWarning};
use crate::chart::build_charts;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::io::{
    create_output_store, ArtifactPath, ArtifactStore, ChartBackend, PlottersBackend, ReportRenderer,
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Where a run is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Loading,
    Computing,
    Building,
    Rendering,
    Done,
    Failed,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}

/// The artifacts of a successful run, in chart order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    artifacts: Vec<ArtifactPath>,
}

impl Report {
    pub fn artifacts(&self) -> &[ArtifactPath] {
        &self.artifacts
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.artifacts.iter()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Plots created at:")?;
        for path in &self.artifacts {
            writeln!(f, "{}", path.display())?;
        }
        Ok(())
    }
}

/// Everything observable about one run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// `Done` or `Failed`
    pub state: PipelineState,

    /// Every state entered, starting at `Idle`
    pub states: Vec<PipelineState>,

    pub report: Option<Report>,

    /// Error message when the run failed
    pub diagnostic: Option<String>,

    pub warnings: Vec<RangeInvariantWarning>,

    /// Counters and timings of this run only
    pub metrics: RunMetricsSnapshot,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        self.state == PipelineState::Done
    }
}

/// Tracks state transitions for one run.
struct RunTrace {
    states: Vec<PipelineState>,
    warnings: Vec<RangeInvariantWarning>,
}

impl RunTrace {
    fn new() -> Self {
        Self {
            states: vec![PipelineState::Idle],
            warnings: Vec::new(),
        }
    }

    fn enter(&mut self, state: PipelineState) {
        tracing::debug!("Pipeline state: {:?}", state);
        self.states.push(state);
    }
}

/// Report pipeline bound to one configuration, backend and store.
///
/// Each [`execute`](Pipeline::execute) collects its own metrics, so a
/// pipeline can be run repeatedly.
pub struct Pipeline {
    config: Config,
    backend: Arc<dyn ChartBackend>,
    store: Arc<dyn ArtifactStore>,
}

impl Pipeline {
    pub fn new(config: Config, backend: Arc<dyn ChartBackend>, store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            config,
            backend,
            store,
        }
    }

    /// Pipeline rendering with plotters into the local filesystem.
    pub fn from_config(config: Config) -> Self {
        let backend = Arc::new(PlottersBackend::from_config(&config.output));
        Self::new(config, backend, create_output_store())
    }

    /// Run the report for `source`, returning `None` on any failure.
    pub fn run(&self, source: &Path) -> Option<Report> {
        self.execute(source).report
    }

    /// Run the report for `source` and describe how it went.
    pub fn execute(&self, source: &Path) -> RunOutcome {
        let mut trace = RunTrace::new();
        let metrics = RunMetrics::new();

        match self.try_run(source, &mut trace, &metrics) {
            Ok(report) => {
                trace.enter(PipelineState::Done);
                tracing::info!("Report complete: {} artifacts in {}", report.len(), self.config.output.dir.display());
                RunOutcome {
                    state: PipelineState::Done,
                    states: trace.states,
                    report: Some(report),
                    diagnostic: None,
                    warnings: trace.warnings,
                    metrics: metrics.snapshot(),
                }
            }
            Err(e) => {
                let stage = trace.states.last().copied().unwrap_or(PipelineState::Idle);
                trace.enter(PipelineState::Failed);
                metrics.add_failure();

                let diagnostic = e.to_string();
                tracing::error!("Report failed during {:?}: {}", stage, diagnostic);
                RunOutcome {
                    state: PipelineState::Failed,
                    states: trace.states,
                    report: None,
                    diagnostic: Some(diagnostic),
                    warnings: trace.warnings,
                    metrics: metrics.snapshot(),
                }
            }
        }
    }

    fn try_run(&self, source: &Path, trace: &mut RunTrace, run_metrics: &Arc<RunMetrics>) -> Result<Report> {
        trace.enter(PipelineState::Loading);
        let start = Instant::now();
        let dataset = Dataset::from_path(source)?;
        run_metrics.add_load_time(start.elapsed());
        run_metrics.add_records_loaded(dataset.len() as u64);

        trace.enter(PipelineState::Computing);
        let start = Instant::now();
        let metrics = Metrics::compute(&dataset, &self.config.labels)?;
        run_metrics.add_compute_time(start.elapsed());
        run_metrics.add_range_warnings(metrics.warnings().len() as u64);
        trace.warnings = metrics.warnings().to_vec();

        trace.enter(PipelineState::Building);
        let start = Instant::now();
        let specs = build_charts(&metrics, &dataset);
        run_metrics.add_build_time(start.elapsed());

        trace.enter(PipelineState::Rendering);
        let renderer = ReportRenderer::new(self.backend.clone(), self.store.clone(), run_metrics.clone())
            .with_parallel(self.config.processing.parallel_render);
        let artifacts = renderer.render(specs.into(), &self.config.output.dir)?;

        Ok(Report { artifacts })
    }
}
