//! Turn derived metrics into the six report chart descriptions.

use super::spec::{ChartData, ChartSpec, HeatmapData, ReportChart, ScatterData, ScatterPoint};
use crate::analysis::Metrics;
use crate::dataset::{Dataset, Record};

/// Build every chart of the report, in [`ReportChart::ALL`] order.
pub fn build_charts(metrics: &Metrics, dataset: &Dataset) -> [ChartSpec; 6] {
    let records = dataset.records();

    [
        confusion_heatmap(metrics),
        sized_scatter(
            ReportChart::FloorCeilingMean,
            records,
            ("Floor Mean", |r: &Record| r.floor_mean),
            ("Ceiling Mean", |r: &Record| r.ceiling_mean),
            ("mean", |r: &Record| r.mean),
        ),
        sized_scatter(
            ReportChart::FloorCeilingMin,
            records,
            ("Floor Min", |r: &Record| r.floor_min),
            ("Ceiling Min", |r: &Record| r.ceiling_min),
            ("min", |r: &Record| r.min),
        ),
        sized_scatter(
            ReportChart::FloorCeilingMax,
            records,
            ("Floor Max", |r: &Record| r.floor_max),
            ("Ceiling Max", |r: &Record| r.ceiling_max),
            ("max", |r: &Record| r.max),
        ),
        consistency_scatter(
            ReportChart::ConsistencyCeiling,
            records.iter().map(|r| r.ceiling_mean),
            &metrics.ranges.ceiling,
            "Ceiling Mean",
            "Ceiling Min-Max range",
            "Ceiling consistency and precision plot",
        ),
        consistency_scatter(
            ReportChart::ConsistencyFloor,
            records.iter().map(|r| r.floor_mean),
            &metrics.ranges.floor,
            "Floor Mean",
            "Floor Min-Max range",
            "Floor consistency and precision plot",
        ),
    ]
}

fn confusion_heatmap(metrics: &Metrics) -> ChartSpec {
    let ticks = metrics.confusion.labels().tick_labels();

    ChartSpec::new(
        ReportChart::ConfusionMatrix,
        "Normalized confusion Matrix",
        "Predicted",
        "True",
        ChartData::Heatmap(HeatmapData {
            values: metrics.normalized.clone(),
            x_ticks: ticks.clone(),
            y_ticks: ticks,
        }),
    )
}

type Field = fn(&Record) -> f64;
type SizeField = fn(&Record) -> Option<f64>;

fn sized_scatter(
    chart: ReportChart,
    records: &[Record],
    (x_label, x): (&str, Field),
    (y_label, y): (&str, Field),
    (size_name, size): (&str, SizeField),
) -> ChartSpec {
    let points: Vec<ScatterPoint> = records
        .iter()
        .map(|r| ScatterPoint {
            x: x(r),
            y: y(r),
            size: size(r),
        })
        .collect();

    let size_field = points
        .iter()
        .any(|p| p.size.is_some())
        .then(|| size_name.to_string());

    let title = format!("{} vs {}", x_label, y_label);
    ChartSpec::new(
        chart,
        &title,
        x_label,
        y_label,
        ChartData::Scatter(ScatterData { points, size_field }),
    )
}

fn consistency_scatter(
    chart: ReportChart,
    means: impl Iterator<Item = f64>,
    ranges: &[f64],
    x_label: &str,
    y_label: &str,
    title: &str,
) -> ChartSpec {
    let points = means
        .zip(ranges.iter().copied())
        .map(|(x, y)| ScatterPoint { x, y, size: None })
        .collect();

    ChartSpec::new(
        chart,
        title,
        x_label,
        y_label,
        ChartData::Scatter(ScatterData {
            points,
            size_field: None,
        }),
    )
}
