//! Render chart specs and persist them as report artifacts.

use super::backend::ChartBackend;
use super::store::ArtifactStore;
use crate::chart::ChartSpec;
use crate::error::Result;
use crate::pipeline::RunMetrics;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Extension of every artifact.
pub const ARTIFACT_EXTENSION: &str = "png";

/// Location of one written chart.
pub type ArtifactPath = PathBuf;

/// Renders charts through a backend and writes them into an output directory.
pub struct ReportRenderer {
    backend: Arc<dyn ChartBackend>,
    store: Arc<dyn ArtifactStore>,
    metrics: Arc<RunMetrics>,
    parallel: bool,
}

impl ReportRenderer {
    pub fn new(
        backend: Arc<dyn ChartBackend>,
        store: Arc<dyn ArtifactStore>,
        metrics: Arc<RunMetrics>,
    ) -> Self {
        Self {
            backend,
            store,
            metrics,
            parallel: false,
        }
    }

    /// Render on the rayon pool. Output order is unchanged.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Path an artifact for `spec` is written to.
    pub fn artifact_path(output_dir: &Path, spec: &ChartSpec) -> ArtifactPath {
        output_dir.join(format!("{}.{}", spec.filename(), ARTIFACT_EXTENSION))
    }

    /// Render and persist every spec, returning artifact paths in spec order.
    ///
    /// The output directory is created before the first write. The first
    /// render or write failure aborts the whole call.
    pub fn render(&self, specs: Vec<ChartSpec>, output_dir: &Path) -> Result<Vec<ArtifactPath>> {
        self.store.ensure_directory(output_dir)?;

        if self.parallel {
            tracing::debug!("Rendering {} charts in parallel", specs.len());
            specs
                .into_par_iter()
                .map(|spec| self.render_one(spec, output_dir))
                .collect()
        } else {
            specs
                .into_iter()
                .map(|spec| self.render_one(spec, output_dir))
                .collect()
        }
    }

    fn render_one(&self, spec: ChartSpec, output_dir: &Path) -> Result<ArtifactPath> {
        let start = Instant::now();
        let bytes = self.backend.render_to_image(&spec)?;
        self.metrics.add_render_time(start.elapsed());

        let path = Self::artifact_path(output_dir, &spec);

        let start = Instant::now();
        self.store.write_file(&path, &bytes)?;
        self.metrics.add_write_time(start.elapsed());
        self.metrics.add_chart_rendered(bytes.len() as u64);

        tracing::debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{LabelSet, Metrics};
    use crate::chart::{build_charts, ReportChart};
    use crate::dataset::Dataset;
    use crate::error::ReportError;
    use crate::io::testing::{FailingBackend, FingerprintBackend};
    use crate::io::{LocalStore, MemoryStore};
    use tempfile::TempDir;

    fn specs() -> Vec<ChartSpec> {
        let ds = Dataset::from_json_str(
            r#"[{"gt_corners": 6, "rb_corners": 6, "floor_mean": 1.0, "ceiling_mean": 2.0,
                 "floor_min": 2.0, "ceiling_min": 1.0, "floor_max": 5.0, "ceiling_max": 4.0}]"#,
        )
        .unwrap();
        let metrics = Metrics::compute(&ds, &LabelSet::default()).unwrap();
        build_charts(&metrics, &ds).into()
    }

    fn expected_paths(dir: &Path) -> Vec<PathBuf> {
        ReportChart::ALL
            .iter()
            .map(|c| dir.join(format!("{}.png", c.filename())))
            .collect()
    }

    #[test]
    fn test_render_creates_directory_and_files() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("plots");
        let metrics = RunMetrics::new();

        let renderer = ReportRenderer::new(
            Arc::new(FingerprintBackend),
            Arc::new(LocalStore),
            metrics.clone(),
        );
        let paths = renderer.render(specs(), &out).unwrap();

        assert_eq!(paths, expected_paths(&out));
        assert!(paths.iter().all(|p| p.is_file()));
        assert_eq!(metrics.snapshot().charts_rendered, 6);
    }

    #[test]
    fn test_parallel_preserves_order() {
        let store = Arc::new(MemoryStore::new());
        let renderer = ReportRenderer::new(Arc::new(FingerprintBackend), store.clone(), RunMetrics::new())
            .with_parallel(true);

        let out = Path::new("plots");
        let paths = renderer.render(specs(), out).unwrap();
        assert_eq!(paths, expected_paths(out));
        assert_eq!(store.paths().len(), 6);
    }

    #[test]
    fn test_backend_failure_aborts() {
        let store = Arc::new(MemoryStore::new());
        let renderer = ReportRenderer::new(
            Arc::new(FailingBackend::on(ReportChart::FloorCeilingMin)),
            store.clone(),
            RunMetrics::new(),
        );

        let err = renderer.render(specs(), Path::new("plots")).unwrap_err();
        match err {
            ReportError::Render(e) => assert_eq!(e.chart, "floor_ceiling_min"),
            other => panic!("unexpected error: {other}"),
        }
        // Charts before the failing one were already written
        assert_eq!(store.paths().len(), 2);
    }

    #[test]
    fn test_unwritable_directory_is_write_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("plots");
        std::fs::write(&blocker, b"file").unwrap();

        let renderer = ReportRenderer::new(Arc::new(FingerprintBackend), Arc::new(LocalStore), RunMetrics::new());
        let err = renderer.render(specs(), &blocker).unwrap_err();
        assert!(matches!(err, ReportError::Write(_)));
    }
}
