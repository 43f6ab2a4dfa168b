use crate::domain::model::{ChartArtifact, ChartOptions, MetricSeries};
use crate::domain::ports::ChartRenderer;
use crate::utils::error::{ChartError, Result};
use chrono::NaiveDateTime;
use image::codecs::jpeg::JpegEncoder;
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::ops::Range;

/// Line charts drawn with plotters into an in-memory RGB buffer, encoded as JPEG.
///
/// Every call allocates its own buffer and drawing area, so rendering one
/// metric never affects another.
#[derive(Debug, Clone, Default)]
pub struct PlottersChartRenderer {
    options: ChartOptions,
}

impl PlottersChartRenderer {
    pub fn new(options: ChartOptions) -> Self {
        Self { options }
    }

    fn draw(
        &self,
        series: &MetricSeries,
        buffer: &mut [u8],
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let opts = &self.options;
        let title = series.metric.code();

        let root =
            BitMapBackend::with_buffer(buffer, (opts.width, opts.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let segments = line_segments(series);
        let ticks = axis_ticks(series, opts);
        let (x_range, y_range) = axis_ranges(series, &segments);

        let time_axis = TimeAxis {
            coord: x_range.into(),
            ticks: ticks.iter().map(|(x, _)| *x).collect(),
        };

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 24).into_font())
            .margin(15)
            .x_label_area_size(140)
            .y_label_area_size(70)
            .build_cartesian_2d(time_axis, y_range)?;

        let label_for = |x: &f64| {
            ticks
                .iter()
                .find(|(t, _)| (t - x).abs() < 0.5)
                .map(|(_, label)| label.clone())
                .unwrap_or_default()
        };

        chart
            .configure_mesh()
            .x_labels(ticks.len().max(1))
            .x_label_formatter(&label_for)
            .x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_desc("Time")
            .y_desc(title)
            .draw()?;

        for segment in segments {
            chart.draw_series(LineSeries::new(segment, &BLUE))?;
        }

        root.present()?;
        Ok(())
    }
}

impl ChartRenderer for PlottersChartRenderer {
    fn render(&self, series: &MetricSeries) -> Result<ChartArtifact> {
        let (width, height) = (self.options.width, self.options.height);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];

        self.draw(series, &mut buffer)
            .map_err(|e| ChartError::RenderError {
                metric: series.metric.code().to_string(),
                message: e.to_string(),
            })?;

        let mut bytes = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, self.options.jpeg_quality);
        encoder.encode(&buffer, width, height, image::ColorType::Rgb8)?;

        tracing::debug!(
            "Rendered '{}' ({} points) into {} bytes",
            series.metric,
            series.points.len(),
            bytes.len()
        );

        Ok(ChartArtifact {
            metric: series.metric,
            bytes,
        })
    }
}

/// Time axis whose key points are exactly the decimated tick positions.
struct TimeAxis {
    coord: RangedCoordf64,
    ticks: Vec<f64>,
}

impl Ranged for TimeAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.coord.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.coord.range()
    }
}

/// Timestamps at every `stride`-th position of the series, counted by index
/// rather than by time. Undated positions are skipped.
pub fn tick_positions(series: &MetricSeries, stride: usize) -> Vec<NaiveDateTime> {
    series
        .points
        .iter()
        .step_by(stride.max(1))
        .filter_map(|p| p.start)
        .collect()
}

/// Axis position and label of every tick the renderer draws.
pub fn axis_ticks(series: &MetricSeries, options: &ChartOptions) -> Vec<(f64, String)> {
    tick_positions(series, options.tick_stride)
        .into_iter()
        .map(|t| (to_x(t), t.format(&options.time_format).to_string()))
        .collect()
}

/// Contiguous runs of dated, valued points. A missing value ends a run, so
/// the line shows a gap there.
pub fn line_segments(series: &MetricSeries) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for point in &series.points {
        let Some(start) = point.start else {
            continue;
        };
        match point.value {
            Some(value) if value.is_finite() => current.push((to_x(start), value)),
            _ => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn to_x(t: NaiveDateTime) -> f64 {
    t.and_utc().timestamp() as f64
}

/// x spans every dated point (so every tick is on the axis), y only the
/// drawn values.
fn axis_ranges(
    series: &MetricSeries,
    segments: &[Vec<(f64, f64)>],
) -> (Range<f64>, Range<f64>) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for x in series.points.iter().filter_map(|p| p.start).map(to_x) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
    }

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in segments.iter().flatten() {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let x_range = if !x_min.is_finite() {
        0.0..1.0
    } else if x_max <= x_min {
        (x_min - 60.0)..(x_max + 60.0)
    } else {
        x_min..x_max
    };

    let y_range = if !y_min.is_finite() {
        0.0..1.0
    } else {
        if y_max <= y_min {
            y_min -= 1.0;
            y_max += 1.0;
        }
        let pad = (y_max - y_min) * 0.05;
        (y_min - pad)..(y_max + pad)
    };

    (x_range, y_range)
}
