use crate::core::numeric::extract_number;
use crate::domain::model::{Cell, NormalizedRecord, RawReport};
use crate::utils::error::{ChartError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Canonical column names, in sheet order.
pub const COLUMNS: [&str; 5] = ["Group", "Code", "Value", "Start", "End"];

pub const DEFAULT_HEADER_ROWS: usize = 4;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Drops the header rows and maps each remaining row onto [`COLUMNS`].
///
/// Fails only when the report is not exactly five columns wide. Unreadable
/// values and start times become `None` and never stop other rows.
pub fn normalize(report: &RawReport, header_rows: usize) -> Result<Vec<NormalizedRecord>> {
    if report.width != COLUMNS.len() {
        return Err(ChartError::StructuralMismatch {
            expected: COLUMNS.len(),
            found: report.width,
        });
    }

    let records: Vec<NormalizedRecord> = report
        .rows
        .iter()
        .skip(header_rows)
        .map(|row| normalize_row(row))
        .collect();

    let undated = records.iter().filter(|r| r.start.is_none()).count();
    let unvalued = records.iter().filter(|r| r.numeric_value.is_none()).count();
    tracing::debug!(
        "Normalized {} rows ({} without start time, {} without numeric value)",
        records.len(),
        undated,
        unvalued
    );

    Ok(records)
}

static EMPTY: Cell = Cell::Empty;

fn normalize_row(row: &[Cell]) -> NormalizedRecord {
    let cell = |idx: usize| row.get(idx).unwrap_or(&EMPTY);

    NormalizedRecord {
        group: cell(0).display_text(),
        code: cell(1).display_text(),
        raw_value: cell(2).display_text(),
        numeric_value: extract_number(cell(2)),
        start: parse_timestamp(cell(3)),
        end: cell(4).display_text(),
    }
}

pub fn parse_timestamp(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::DateTime(dt) => Some(*dt),
        Cell::Text(text) => parse_timestamp_str(text),
        _ => None,
    }
}

pub fn parse_timestamp_str(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
