//! Confusion matrix over a fixed label set.

use super::labels::LabelSet;
use crate::dataset::Record;
use crate::error::UnknownLabelError;
use ndarray::{Array2, Axis};
use std::fmt;

/// Count table of (true label, predicted label) pairs.
///
/// Element `[i, j]` is the number of records whose ground truth is label `i`
/// and whose prediction is label `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    counts: Array2<u64>,
    labels: LabelSet,
}

impl ConfusionMatrix {
    /// Empty matrix sized to the label set.
    pub fn new(labels: LabelSet) -> Self {
        let n = labels.len();
        Self {
            counts: Array2::zeros((n, n)),
            labels,
        }
    }

    /// Tally `gt_corners` against `rb_corners` for every record.
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a Record>,
        labels: &LabelSet,
    ) -> Result<Self, UnknownLabelError> {
        let mut cm = Self::new(labels.clone());

        for (i, record) in records.into_iter().enumerate() {
            let truth = cm.label_index(i, "gt_corners", record.gt_corners)?;
            let predicted = cm.label_index(i, "rb_corners", record.rb_corners)?;
            cm.counts[[truth, predicted]] += 1;
        }

        Ok(cm)
    }

    fn label_index(
        &self,
        record: usize,
        field: &'static str,
        value: f64,
    ) -> Result<usize, UnknownLabelError> {
        self.labels.index_of(value).ok_or_else(|| UnknownLabelError {
            record,
            field,
            value,
            labels: self.labels.values().to_vec(),
        })
    }

    /// Raw counts.
    pub fn counts(&self) -> &Array2<u64> {
        &self.counts
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }

    /// Count at `[true_label, predicted_label]`.
    pub fn get(&self, true_label: usize, predicted_label: usize) -> u64 {
        self.counts[[true_label, predicted_label]]
    }

    /// Number of records whose ground truth is `class`.
    pub fn support(&self, class: usize) -> u64 {
        self.counts.row(class).sum()
    }

    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    /// Fraction of records on the diagonal; 0.0 when empty.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.counts.diag().sum() as f64 / total as f64
    }

    /// Divide each row by its sum. Rows with no support stay all zeros.
    pub fn normalized(&self) -> Array2<f64> {
        let mut out = self.counts.mapv(|c| c as f64);
        for mut row in out.axis_iter_mut(Axis(0)) {
            let sum = row.sum();
            if sum > 0.0 {
                row.mapv_inplace(|v| v / sum);
            }
        }
        out
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ticks = self.labels.tick_labels();
        let width = ticks.iter().map(|t| t.len()).max().unwrap_or(0).max(6);

        let head = width.max(9);

        write!(f, "{:>head$}", "true\\pred")?;
        for t in &ticks {
            write!(f, " {:>width$}", t)?;
        }
        writeln!(f)?;

        for (i, t) in ticks.iter().enumerate() {
            write!(f, "{:>head$}", t)?;
            for j in 0..ticks.len() {
                write!(f, " {:>width$}", self.counts[[i, j]])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
