//! Categorical axis of the confusion matrix.

use serde::{Deserialize, Serialize};

/// Tolerance for matching a parsed value against a label.
const LABEL_EPSILON: f64 = 1e-9;

/// Ordered set of class values used as confusion-matrix axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(Vec<f64>);

impl Default for LabelSet {
    fn default() -> Self {
        Self(vec![4.0, 6.0, 8.0, 10.0])
    }
}

impl LabelSet {
    /// Create a label set, keeping the given order.
    pub fn new(labels: Vec<f64>) -> Self {
        Self(labels)
    }

    /// Position of `value` on the axis.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        self.0.iter().position(|l| (l - value).abs() < LABEL_EPSILON)
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Tick strings, one decimal place ("4.0", "10.0").
    pub fn tick_labels(&self) -> Vec<String> {
        self.0.iter().map(|l| format!("{:.1}", l)).collect()
    }

    /// Check that labels are non-empty, finite and distinct.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.0.is_empty() {
            anyhow::bail!("Label set must not be empty");
        }
        if let Some(bad) = self.0.iter().find(|l| !l.is_finite()) {
            anyhow::bail!("Label {} is not finite", bad);
        }
        for (i, a) in self.0.iter().enumerate() {
            if self.0[i + 1..].iter().any(|b| (a - b).abs() < LABEL_EPSILON) {
                anyhow::bail!("Duplicate label {}", a);
            }
        }
        Ok(())
    }
}
