//! Run metrics collection.

use serde::{Serialize, Serializer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn serialize_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Counters and per-stage timings for one report run.
#[derive(Debug, Default)]
pub struct RunMetrics {
    /// Records loaded from the dataset
    pub records_loaded: AtomicU64,

    /// Charts rendered and written
    pub charts_rendered: AtomicU64,

    /// Total artifact bytes written
    pub bytes_written: AtomicU64,

    /// Records whose max was below their min
    pub range_warnings: AtomicU64,

    /// Number of failed stages
    pub failures: AtomicU64,

    /// Start time
    start_time: Option<Instant>,

    // Per-stage timing (in microseconds for precision)
    /// Time spent loading the dataset (microseconds)
    pub load_us: AtomicU64,

    /// Time spent computing metrics (microseconds)
    pub compute_us: AtomicU64,

    /// Time spent building chart specs (microseconds)
    pub build_us: AtomicU64,

    /// Time spent rendering images (microseconds, summed across threads)
    pub render_us: AtomicU64,

    /// Time spent writing artifacts (microseconds, summed across threads)
    pub write_us: AtomicU64,
}

impl RunMetrics {
    /// Create new metrics.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            start_time: Some(Instant::now()),
            ..Self::default()
        })
    }

    pub fn add_records_loaded(&self, count: u64) {
        self.records_loaded.fetch_add(count, Ordering::Relaxed);
    }

    /// Record one chart written with `bytes` of content.
    pub fn add_chart_rendered(&self, bytes: u64) {
        self.charts_rendered.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn add_range_warnings(&self, count: u64) {
        self.range_warnings.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a failure.
    pub fn add_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_load_time(&self, duration: Duration) {
        self.load_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn add_compute_time(&self, duration: Duration) {
        self.compute_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn add_build_time(&self, duration: Duration) {
        self.build_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn add_render_time(&self, duration: Duration) {
        self.render_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn add_write_time(&self, duration: Duration) {
        self.write_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    /// Get elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map_or(Duration::ZERO, |t| t.elapsed())
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> RunMetricsSnapshot {
        let secs = |us: &AtomicU64| us.load(Ordering::Relaxed) as f64 / 1_000_000.0;

        RunMetricsSnapshot {
            records_loaded: self.records_loaded.load(Ordering::Relaxed),
            charts_rendered: self.charts_rendered.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            range_warnings: self.range_warnings.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            elapsed: self.elapsed(),
            load_secs: secs(&self.load_us),
            compute_secs: secs(&self.compute_us),
            build_secs: secs(&self.build_us),
            render_secs: secs(&self.render_us),
            write_secs: secs(&self.write_us),
        }
    }
}

/// Snapshot of run metrics at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetricsSnapshot {
    pub records_loaded: u64,
    pub charts_rendered: u64,
    pub bytes_written: u64,
    pub range_warnings: u64,
    pub failures: u64,
    #[serde(serialize_with = "serialize_duration")]
    pub elapsed: Duration,
    pub load_secs: f64,
    pub compute_secs: f64,
    pub build_secs: f64,
    /// Summed across threads when rendering in parallel
    pub render_secs: f64,
    /// Summed across threads when rendering in parallel
    pub write_secs: f64,
}

impl RunMetricsSnapshot {
    fn stage_total_secs(&self) -> f64 {
        self.load_secs + self.compute_secs + self.build_secs + self.render_secs + self.write_secs
    }

    /// Save metrics to a JSON file.
    pub fn save_to_file(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!("Metrics saved to {}", path);
        Ok(())
    }
}

impl std::fmt::Display for RunMetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total = self.stage_total_secs();
        let pct = |secs: f64| if total > 0.0 { secs / total * 100.0 } else { 0.0 };

        write!(
            f,
            "Records: {} | Charts: {} | Written: {:.1} KB | Range warnings: {} | \
             Failures: {} | Elapsed: {:.3}s | \
             Time: load {:.0}% | compute {:.0}% | build {:.0}% | render {:.0}% | write {:.0}%",
            self.records_loaded,
            self.charts_rendered,
            self.bytes_written as f64 / 1024.0,
            self.range_warnings,
            self.failures,
            self.elapsed.as_secs_f64(),
            pct(self.load_secs),
            pct(self.compute_secs),
            pct(self.build_secs),
            pct(self.render_secs),
            pct(self.write_secs),
        )
    }
}
