use crate::core::normalize::parse_timestamp_str;
use crate::domain::model::{Cell, RawReport};
use crate::utils::error::{ChartError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use std::io::Cursor;

/// Loads the first worksheet of an xlsx/xlsm/xlsb/xls/ods workbook.
///
/// Rows and columns are anchored at A1 even when the sheet's first used cell
/// is further in, so blank title rows still count as header rows.
pub fn read_report(bytes: Vec<u8>) -> Result<RawReport> {
    let mut workbook: Sheets<_> = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ChartError::ProcessingError {
            message: "Workbook contains no worksheets".to_string(),
        })?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; col_offset];
        cells.extend(row.iter().map(to_cell));
        rows.push(cells);
    }

    let width = if range.is_empty() {
        0
    } else {
        col_offset + range.width()
    };

    tracing::debug!(
        "Loaded sheet '{}': {} rows x {} columns",
        sheet_name,
        rows.len(),
        width
    );

    Ok(RawReport::with_width(rows, width))
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => Cell::DateTime(naive),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_timestamp_str(s) {
            Some(naive) => Cell::DateTime(naive),
            None => Cell::Text(s.clone()),
        },
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_spreadsheet_errors() {
        let err = read_report(b"definitely not a workbook".to_vec()).unwrap_err();
        assert!(matches!(err, ChartError::SpreadsheetError(_)));
    }

    #[test]
    fn test_to_cell_conversions() {
        assert_eq!(to_cell(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(to_cell(&Data::String("10 Mbps".into())), Cell::text("10 Mbps"));
        assert_eq!(to_cell(&Data::Empty), Cell::Empty);
        assert!(matches!(
            to_cell(&Data::DateTimeIso("2024-03-01T10:00:00".into())),
            Cell::DateTime(_)
        ));
    }
}
