//! Chart rasterization.
//!
//! Every chart is drawn into its own RGB buffer with plotters and encoded to
//! PNG, so there is no drawing surface shared between charts.

use crate::chart::{ChartData, ChartSpec, HeatmapData, ScatterData, ScatterPoint};
use crate::config::OutputConfig;
use crate::error::RenderError;
use image::{ImageFormat, RgbImage};
use plotters::coord::ranged1d::{DiscreteRanged, IntoSegmentedCoord, SegmentValue};
use plotters::coord::types::RangedCoordi32;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::io::Cursor;
use std::ops::Range;

/// Produces a PNG image from a chart description.
pub trait ChartBackend: Send + Sync {
    fn render_to_image(&self, spec: &ChartSpec) -> Result<Vec<u8>, RenderError>;
}

/// Smallest and largest marker radius in pixels for sized scatters.
const MIN_MARKER: f64 = 3.0;
const MAX_MARKER: f64 = 12.0;
const BASE_MARKER: u32 = 5;

/// Seaborn-style "Blues" ramp, light to dark.
const BLUES: [(u8, u8, u8); 5] = [
    (247, 251, 255),
    (198, 219, 239),
    (107, 174, 214),
    (33, 113, 181),
    (8, 48, 107),
];

/// Bitmap renderer built on plotters.
#[derive(Debug, Clone, Copy)]
pub struct PlottersBackend {
    width: u32,
    height: u32,
}

impl PlottersBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.image_width, config.image_height)
    }

    fn draw(&self, spec: &ChartSpec, buffer: &mut [u8]) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::with_buffer(buffer, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        match spec.data() {
            ChartData::Heatmap(heatmap) => draw_heatmap(&root, spec, heatmap)?,
            ChartData::Scatter(scatter) => draw_scatter(&root, spec, scatter)?,
        }

        root.present()?;
        Ok(())
    }
}

impl ChartBackend for PlottersBackend {
    fn render_to_image(&self, spec: &ChartSpec) -> Result<Vec<u8>, RenderError> {
        if let ChartData::Heatmap(h) = spec.data() {
            if h.values.is_empty() {
                return Err(RenderError::new(spec.filename(), "heatmap has no cells"));
            }
        }

        let mut buffer = vec![0u8; self.width as usize * self.height as usize * 3];
        self.draw(spec, &mut buffer)
            .map_err(|e| RenderError::new(spec.filename(), e))?;

        encode_png(buffer, self.width, self.height).map_err(|e| RenderError::new(spec.filename(), e))
    }
}

fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, Box<dyn Error>> {
    let image = RgbImage::from_raw(width, height, buffer).ok_or("bitmap buffer does not match image size")?;
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

fn draw_heatmap(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    spec: &ChartSpec,
    heatmap: &HeatmapData,
) -> Result<(), Box<dyn Error>> {
    let (rows, cols) = heatmap.values.dim();

    let mut chart = ChartBuilder::on(root)
        .caption(spec.title(), ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            cell_axis(cols).into_segmented(),
            cell_axis(rows).into_segmented(),
        )?;

    // Row 0 is drawn at the top, so the y axis is flipped.
    let flip = |row: usize| (rows - 1 - row) as i32;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(spec.x_label())
        .y_desc(spec.y_label())
        .x_labels(cols)
        .y_labels(rows)
        .x_label_formatter(&|v| segment_tick(v, &heatmap.x_ticks, |i| i))
        .y_label_formatter(&|v| segment_tick(v, &heatmap.y_ticks, |i| rows - 1 - i))
        .draw()?;

    let (lo, hi) = value_bounds(heatmap.values.iter().copied());

    chart.draw_series(heatmap.values.indexed_iter().map(|((row, col), &v)| {
        let (x, y) = (col as i32, flip(row));
        Rectangle::new(
            [
                (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
            ],
            blues(scale(v, lo, hi)).filled(),
        )
    }))?;

    chart.draw_series(heatmap.values.indexed_iter().map(|((row, col), &v)| {
        let color = if scale(v, lo, hi) > 0.5 { WHITE } else { BLACK };
        let style = ("sans-serif", 16)
            .into_font()
            .color(&color)
            .pos(Pos::new(HPos::Center, VPos::Center));
        Text::new(
            format_cell(v),
            (SegmentValue::CenterOf(col as i32), SegmentValue::CenterOf(flip(row))),
            style,
        )
    }))?;

    Ok(())
}

fn draw_scatter(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    spec: &ChartSpec,
    scatter: &ScatterData,
) -> Result<(), Box<dyn Error>> {
    let finite: Vec<&ScatterPoint> = scatter
        .points
        .iter()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();

    let x_range = padded_range(finite.iter().map(|p| p.x)).ok_or("x values span more than f64 can represent")?;
    let y_range = padded_range(finite.iter().map(|p| p.y)).ok_or("y values span more than f64 can represent")?;

    let mut chart = ChartBuilder::on(root)
        .caption(spec.title(), ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label())
        .y_desc(spec.y_label())
        .draw()?;

    let size_bounds = scatter.size_bounds();
    let style = BLUE.mix(0.7).filled();

    let series = chart.draw_series(
        finite
            .iter()
            .map(|p| Circle::new((p.x, p.y), marker_radius(p.size, size_bounds), style)),
    )?;

    if let Some(field) = &scatter.size_field {
        series
            .label(format!("size: {}", field))
            .legend(move |(x, y)| Circle::new((x, y), BASE_MARKER, style));

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    Ok(())
}

/// One segment per cell. Integer ranges include their end, so `n` cells
/// need `0..n - 1`.
fn cell_axis(n: usize) -> RangedCoordi32 {
    (0..n as i32 - 1).into()
}

fn segment_tick(value: &SegmentValue<i32>, ticks: &[String], index: impl Fn(usize) -> usize) -> String {
    match value {
        SegmentValue::CenterOf(i) if *i >= 0 && (*i as usize) < ticks.len() => {
            ticks[index(*i as usize)].clone()
        }
        _ => String::new(),
    }
}

/// Min and max of the finite values; `(0, 0)` when there are none.
fn value_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 0.0))
}

/// Position of `v` in `[lo, hi]` as a fraction in `[0, 1]`.
fn scale(v: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo && v.is_finite() {
        ((v - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Axis range covering all values with 5% padding on each side.
///
/// `None` when the padded width is not a finite, positive f64.
fn padded_range(values: impl Iterator<Item = f64>) -> Option<Range<f64>> {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        return Some(0.0..1.0);
    }

    let (lo, hi) = value_bounds(collected.into_iter());
    let pad = if hi > lo {
        (hi - lo) * 0.05
    } else {
        lo.abs().mul_add(0.05, 1.0)
    };

    let range = (lo - pad)..(hi + pad);
    let width = range.end - range.start;
    (width.is_finite() && width > 0.0).then_some(range)
}

fn marker_radius(size: Option<f64>, bounds: Option<(f64, f64)>) -> u32 {
    match (size, bounds) {
        (Some(s), Some((lo, hi))) if s.is_finite() => {
            let t = if hi > lo { (s - lo) / (hi - lo) } else { 0.5 };
            (MIN_MARKER + t * (MAX_MARKER - MIN_MARKER)).round() as u32
        }
        _ => BASE_MARKER,
    }
}

fn blues(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0) * (BLUES.len() - 1) as f64;
    let i = (t.floor() as usize).min(BLUES.len() - 2);
    let frac = t - i as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (r0, g0, b0) = BLUES[i];
    let (r1, g1, b1) = BLUES[i + 1];
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Six significant decimals with trailing zeros trimmed ("1", "0.5", "0.333333").
fn format_cell(v: f64) -> String {
    let s = format!("{:.6}", v);
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
