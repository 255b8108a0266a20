//! Pipeline orchestration and run metrics.

mod metrics;
mod orchestrator;


pub use metrics::{RunMetrics, RunMetricsSnapshot};
pub use orchestrator::{Pipeline, PipelineState, Report, RunOutcome};
