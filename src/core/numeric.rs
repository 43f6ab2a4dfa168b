use crate::domain::model::Cell;
use regex::Regex;
use std::sync::OnceLock;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-?[0-9]+\.?[0-9]*").expect("number pattern is valid"))
}

/// First signed decimal found in a text cell, e.g. `"RSRP: -102.5 dBm"` gives `-102.5`.
///
/// Only text cells are scanned; numeric, date and empty cells yield `None`.
pub fn extract_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Text(text) => extract_number_from_str(text),
        _ => None,
    }
}

pub fn extract_number_from_str(text: &str) -> Option<f64> {
    let found = number_pattern().find(text)?;
    found.as_str().parse::<f64>().ok()
}
