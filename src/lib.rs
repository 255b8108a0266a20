//! Deviation Report
//!
//! Turns a dataset of per-trial corner-count and floor/ceiling measurements
//! into a fixed battery of six PNG charts: a normalized confusion matrix of
//! ground-truth versus predicted corner counts, three floor-versus-ceiling
//! scatters (mean, min, max), and two consistency scatters plotting each mean
//! against its min-max range.
//!
//! # Architecture
//!
//! - **Dataset**: JSON loading (records or columns layout) into typed records
//! - **Analysis**: confusion matrix, row normalization, floor/ceiling ranges
//! - **Chart**: declarative descriptions of the six charts
//! - **I/O**: plotters rasterization and artifact persistence
//! - **Pipeline**: all-or-nothing orchestration with run metrics
//!
//! # Usage
//!
//! ```no_run
//! use deviation_report::{run_report, Config};
//!
//! let config = Config::default();
//! match run_report(config) {
//!     Some(report) => print!("{}", report),
//!     None => eprintln!("Plot creation failed."),
//! }
//! ```

pub mod analysis;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod error;
pub mod io;
pub mod pipeline;

pub use analysis::{ConfusionMatrix, LabelSet, Metrics};
pub use chart::{build_charts, ChartSpec, ReportChart};
pub use config::Config;
pub use dataset::{Dataset, Record};
pub use error::ReportError;
pub use io::{ArtifactStore, ChartBackend, PlottersBackend, ReportRenderer};
pub use pipeline::{Pipeline, PipelineState, Report, RunMetrics, RunOutcome};

use anyhow::Result;

/// Run the full report with the given configuration.
///
/// Returns `None` when the configuration is invalid or any stage fails; the
/// reason has already been logged.
pub fn run_report(config: Config) -> Option<Report> {
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {:#}", e);
        return None;
    }

    tracing::info!("Starting deviation report");
    tracing::info!("Reading dataset from {}", config.input.path.display());

    let source = config.input.path.clone();
    let metrics_path = config.processing.metrics_output_path.clone();
    let pipeline = Pipeline::from_config(config);

    let outcome = pipeline.execute(&source);

    tracing::info!("Final: {}", outcome.metrics);
    if let Some(path) = metrics_path {
        if let Err(e) = outcome.metrics.save_to_file(&path) {
            tracing::warn!("Failed to save metrics to {}: {}", path, e);
        }
    }

    outcome.report
}

/// Initialize the Rayon thread pool.
pub fn init_rayon(threads: Option<usize>) -> Result<()> {
    if let Some(threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }
    Ok(())
}
