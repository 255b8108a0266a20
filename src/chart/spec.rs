//! Declarative chart descriptions handed to the rendering backend.

use ndarray::Array2;
use serde::Serialize;
use std::fmt;

/// The six artifacts of the report, in production order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportChart {
    ConfusionMatrix,
    FloorCeilingMean,
    FloorCeilingMin,
    FloorCeilingMax,
    ConsistencyCeiling,
    ConsistencyFloor,
}

impl ReportChart {
    /// Every chart in the order the report produces them.
    pub const ALL: [ReportChart; 6] = [
        ReportChart::ConfusionMatrix,
        ReportChart::FloorCeilingMean,
        ReportChart::FloorCeilingMin,
        ReportChart::FloorCeilingMax,
        ReportChart::ConsistencyCeiling,
        ReportChart::ConsistencyFloor,
    ];

    /// Artifact base name, without extension.
    pub fn filename(&self) -> &'static str {
        match self {
            ReportChart::ConfusionMatrix => "confusion_matrix",
            ReportChart::FloorCeilingMean => "floor_ceiling_mean",
            ReportChart::FloorCeilingMin => "floor_ceiling_min",
            ReportChart::FloorCeilingMax => "floor_ceiling_max",
            ReportChart::ConsistencyCeiling => "consistency_ceiling",
            ReportChart::ConsistencyFloor => "consistency_floor",
        }
    }
}

impl fmt::Display for ReportChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.filename())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Heatmap,
    Scatter,
}

/// Annotated grid of values. Row 0 is drawn at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapData {
    pub values: Array2<f64>,
    pub x_ticks: Vec<String>,
    pub y_ticks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,

    /// Marker size value; `None` draws the base size
    pub size: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterData {
    pub points: Vec<ScatterPoint>,

    /// Name of the field the marker sizes come from, if any record had it
    pub size_field: Option<String>,
}

impl ScatterData {
    /// Smallest and largest size values present.
    pub fn size_bounds(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.size)
            .filter(|s| s.is_finite())
            .fold(None, |acc, s| match acc {
                None => Some((s, s)),
                Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Heatmap(HeatmapData),
    Scatter(ScatterData),
}

/// One chart of the report: what to draw, how to label it, where it goes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    chart: ReportChart,
    title: String,
    x_label: String,
    y_label: String,
    data: ChartData,
}

impl ChartSpec {
    pub(crate) fn new(
        chart: ReportChart,
        title: &str,
        x_label: &str,
        y_label: &str,
        data: ChartData,
    ) -> Self {
        Self {
            chart,
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            data,
        }
    }

    pub fn chart(&self) -> ReportChart {
        self.chart
    }

    pub fn kind(&self) -> ChartKind {
        match self.data {
            ChartData::Heatmap(_) => ChartKind::Heatmap,
            ChartData::Scatter(_) => ChartKind::Scatter,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    pub fn filename(&self) -> &'static str {
        self.chart.filename()
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filenames_unique_and_ordered() {
        let names: Vec<&str> = ReportChart::ALL.iter().map(|c| c.filename()).collect();
        assert_eq!(
            names,
            vec![
                "confusion_matrix",
                "floor_ceiling_mean",
                "floor_ceiling_min",
                "floor_ceiling_max",
                "consistency_ceiling",
                "consistency_floor",
            ]
        );
    }

    #[test]
    fn test_size_bounds() {
        let data = ScatterData {
            points: vec![
                ScatterPoint { x: 0.0, y: 0.0, size: Some(3.0) },
                ScatterPoint { x: 0.0, y: 0.0, size: None },
                ScatterPoint { x: 0.0, y: 0.0, size: Some(-1.0) },
            ],
            size_field: Some("mean".to_string()),
        };
        assert_eq!(data.size_bounds(), Some((-1.0, 3.0)));

        let unsized_data = ScatterData {
            points: vec![ScatterPoint { x: 1.0, y: 1.0, size: None }],
            size_field: None,
        };
        assert_eq!(unsized_data.size_bounds(), None);
    }
}
