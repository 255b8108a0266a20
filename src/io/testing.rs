//! Font-free chart backends for tests.

use super::backend::ChartBackend;
use crate::chart::{ChartData, ChartSpec, ReportChart};
use crate::error::RenderError;
use std::sync::Mutex;

/// Encodes the full chart description as the artifact body.
///
/// Equal specs give equal bytes, so repeated runs can be compared file by file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintBackend;

impl ChartBackend for FingerprintBackend {
    fn render_to_image(&self, spec: &ChartSpec) -> Result<Vec<u8>, RenderError> {
        if let ChartData::Heatmap(h) = spec.data() {
            if h.values.is_empty() {
                return Err(RenderError::new(spec.filename(), "heatmap has no cells"));
            }
        }
        let body = format!(
            "{}\n{}\n{}\n{}\n{:?}",
            spec.filename(),
            spec.title(),
            spec.x_label(),
            spec.y_label(),
            spec.data()
        );
        Ok(body.into_bytes())
    }
}

/// Fails on one chart and fingerprints the rest.
#[derive(Debug, Clone, Copy)]
pub struct FailingBackend {
    chart: ReportChart,
}

impl FailingBackend {
    pub fn on(chart: ReportChart) -> Self {
        Self { chart }
    }
}

impl ChartBackend for FailingBackend {
    fn render_to_image(&self, spec: &ChartSpec) -> Result<Vec<u8>, RenderError> {
        if spec.chart() == self.chart {
            return Err(RenderError::new(spec.filename(), "backend unavailable"));
        }
        FingerprintBackend.render_to_image(spec)
    }
}

/// Keeps every spec it is asked to render, in call order.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    seen: Mutex<Vec<ChartSpec>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<ChartSpec> {
        self.seen.lock().unwrap().clone()
    }
}

impl ChartBackend for RecordingBackend {
    fn render_to_image(&self, spec: &ChartSpec) -> Result<Vec<u8>, RenderError> {
        self.seen.lock().unwrap().push(spec.clone());
        FingerprintBackend.render_to_image(spec)
    }
}
