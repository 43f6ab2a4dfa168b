use crate::domain::metric::Metric;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single spreadsheet cell, independent of the workbook format it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Error(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// The cell as it would read on screen.
    pub fn display_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Cell::Error(e) => e.clone(),
        }
    }
}

/// Untyped rows as loaded from the first worksheet, header rows included.
#[derive(Debug, Clone, Default)]
pub struct RawReport {
    pub rows: Vec<Vec<Cell>>,
    pub width: usize,
}

impl RawReport {
    /// Width is taken from the widest row.
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, width }
    }

    pub fn with_width(rows: Vec<Vec<Cell>>, width: usize) -> Self {
        Self { rows, width }
    }
}

/// One data row with canonical columns Group, Code, Value, Start, End.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub group: String,
    pub code: String,
    pub raw_value: String,
    pub numeric_value: Option<f64>,
    pub start: Option<NaiveDateTime>,
    pub end: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub start: Option<NaiveDateTime>,
    pub value: Option<f64>,
}

/// Points for one metric, ascending by start with undated points last.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub metric: Metric,
    pub points: Vec<SeriesPoint>,
}

impl MetricSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ChartArtifact {
    pub metric: Metric,
    pub bytes: Vec<u8>,
}

impl ChartArtifact {
    pub fn file_name(&self) -> String {
        self.metric.file_name()
    }
}

#[derive(Debug, Clone)]
pub struct OutputBundle {
    /// `<YYYYmmdd_HHMMSS>.zip`
    pub name: String,
    pub generated_at: NaiveDateTime,
    pub entries: Vec<String>,
    pub bytes: Vec<u8>,
}

impl OutputBundle {
    /// The generation stamp without the `.zip` suffix.
    pub fn stamp(&self) -> &str {
        self.name.trim_end_matches(".zip")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    /// Label every n-th point on the time axis.
    pub tick_stride: usize,
    pub time_format: String,
    pub jpeg_quality: u8,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 500,
            tick_stride: 10,
            time_format: "%Y-%m-%d %H:%M".to_string(),
            jpeg_quality: 90,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub series: Vec<MetricSeries>,
    pub artifacts: Vec<ChartArtifact>,
}
