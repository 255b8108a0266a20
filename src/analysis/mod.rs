//! Derived quantities: confusion matrix and floor/ceiling ranges.

mod confusion;
mod labels;
mod ranges;

pub use confusion::ConfusionMatrix;
pub use labels::LabelSet;
pub use ranges::{RangeAxis, RangeInvariantWarning, RangeSummary, Ranges};

use crate::dataset::Dataset;
use crate::error::UnknownLabelError;
use ndarray::Array2;

/// Everything the charts are drawn from, computed once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub confusion: ConfusionMatrix,

    /// Row-normalized confusion matrix; zero-support rows are zeros
    pub normalized: Array2<f64>,

    pub ranges: Ranges,
}

impl Metrics {
    /// Derive all quantities from a loaded dataset.
    pub fn compute(dataset: &Dataset, labels: &LabelSet) -> Result<Self, UnknownLabelError> {
        let confusion = ConfusionMatrix::from_records(dataset, labels)?;
        let normalized = confusion.normalized();
        let ranges = Ranges::from_records(dataset);

        tracing::info!(
            "Computed metrics over {} records: accuracy {:.3}, {} range warnings",
            dataset.len(),
            confusion.accuracy(),
            ranges.warnings.len()
        );

        Ok(Self {
            confusion,
            normalized,
            ranges,
        })
    }

    pub fn warnings(&self) -> &[RangeInvariantWarning] {
        &self.ranges.warnings
    }
}
