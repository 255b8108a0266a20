//! Error taxonomy for a report run.
//!
//! Every stage returns its own error type; [`ReportError`] unifies them so the
//! pipeline can abort on the first failure and report a single diagnostic.

use std::path::PathBuf;
use thiserror::Error;

/// The input could not be read or parsed into records.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("record {record} is missing required field `{field}`")]
    MissingField { record: usize, field: String },

    #[error("unsupported dataset layout: expected an array of records or an object of columns, found {0}")]
    Layout(&'static str),
}

/// A categorical value fell outside the configured label set.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("record {record}: `{field}` value {value} is not in the label set {labels:?}")]
pub struct UnknownLabelError {
    pub record: usize,
    pub field: &'static str,
    pub value: f64,
    pub labels: Vec<f64>,
}

/// The rendering backend could not produce an image for a chart.
#[derive(Debug, Clone, Error)]
#[error("failed to render chart `{chart}`: {reason}")]
pub struct RenderError {
    pub chart: String,
    pub reason: String,
}

impl RenderError {
    pub fn new(chart: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self {
            chart: chart.into(),
            reason: reason.to_string(),
        }
    }
}

/// An artifact (or its directory) could not be persisted.
#[derive(Debug, Error)]
#[error("failed to write {path}: {source}")]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Any failure that aborts a report run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    UnknownLabel(#[from] UnknownLabelError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Result type for report stages.
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_names_field() {
        let err = LoadError::MissingField {
            record: 3,
            field: "gt_corners".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("gt_corners"));
        assert!(msg.contains("record 3"));
    }

    #[test]
    fn test_unknown_label_display() {
        let err = UnknownLabelError {
            record: 0,
            field: "rb_corners",
            value: 5.0,
            labels: vec![4.0, 6.0],
        };
        let msg = err.to_string();
        assert!(msg.contains("rb_corners"));
        assert!(msg.contains('5'));
    }

    #[test]
    fn test_report_error_is_transparent() {
        let err: ReportError = RenderError::new("confusion_matrix", "no font").into();
        assert_eq!(
            err.to_string(),
            "failed to render chart `confusion_matrix`: no font"
        );
        assert!(matches!(err, ReportError::Render(_)));
    }
}
