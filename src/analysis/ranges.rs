//! Per-record min/max spreads of the floor and ceiling measurements.

use crate::dataset::Record;
use serde::Serialize;
use std::fmt;

/// Which measurement a range belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeAxis {
    Floor,
    Ceiling,
}

impl fmt::Display for RangeAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeAxis::Floor => write!(f, "floor"),
            RangeAxis::Ceiling => write!(f, "ceiling"),
        }
    }
}

/// A record whose maximum is below its minimum. Logged, never raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeInvariantWarning {
    pub record: usize,
    pub axis: RangeAxis,
    pub min: f64,
    pub max: f64,
}

impl fmt::Display for RangeInvariantWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record {}: {}_max ({}) < {}_min ({})",
            self.record, self.axis, self.max, self.axis, self.min
        )
    }
}

/// Floor and ceiling ranges, parallel to the dataset's records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranges {
    pub floor: Vec<f64>,
    pub ceiling: Vec<f64>,
    pub warnings: Vec<RangeInvariantWarning>,
}

impl Ranges {
    /// Compute `max - min` for both axes of every record.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut ranges = Self::default();

        for (i, record) in records.into_iter().enumerate() {
            ranges.push(i, RangeAxis::Floor, record.floor_min, record.floor_max);
            ranges.push(i, RangeAxis::Ceiling, record.ceiling_min, record.ceiling_max);
        }

        ranges
    }

    fn push(&mut self, record: usize, axis: RangeAxis, min: f64, max: f64) {
        if max < min {
            let warning = RangeInvariantWarning { record, axis, min, max };
            tracing::warn!("Range invariant violated: {}", warning);
            self.warnings.push(warning);
        }

        let range = max - min;
        match axis {
            RangeAxis::Floor => self.floor.push(range),
            RangeAxis::Ceiling => self.ceiling.push(range),
        }
    }

    /// Summary statistics for one axis.
    pub fn summary(&self, axis: RangeAxis) -> RangeSummary {
        let values = match axis {
            RangeAxis::Floor => &self.floor,
            RangeAxis::Ceiling => &self.ceiling,
        };
        RangeSummary::from_values(axis, values)
    }
}

/// Count, extremes and mean of one axis' ranges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSummary {
    pub axis: RangeAxis,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl RangeSummary {
    fn from_values(axis: RangeAxis, values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                axis,
                count: 0,
                min: None,
                max: None,
                mean: None,
            };
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;

        Self {
            axis,
            count: values.len(),
            min: Some(min),
            max: Some(max),
            mean: Some(mean),
        }
    }
}

impl fmt::Display for RangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max, self.mean) {
            (Some(min), Some(max), Some(mean)) => write!(
                f,
                "{} range: n={} min={:.4} max={:.4} mean={:.4}",
                self.axis, self.count, min, max, mean
            ),
            _ => write!(f, "{} range: n=0", self.axis),
        }
    }
}
