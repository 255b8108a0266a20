//! Chart descriptions for the report.

mod builder;
mod spec;

pub use builder::build_charts;
pub use spec::{
    ChartData, ChartKind, ChartSpec, HeatmapData, ReportChart, ScatterData, ScatterPoint,
};
