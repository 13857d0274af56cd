//! The line-color reference table.

use std::path::Path;

use serde::Deserialize;

use super::error::ColorTableError;

/// One row of the reference table: a line of one operator and its colors.
///
/// Field names mirror the CSV headers of the published table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColorTableEntry {
    #[serde(rename = "shortOperatorName")]
    pub short_operator_name: String,
    #[serde(rename = "lineName")]
    pub line_name: String,
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
    #[serde(rename = "textColor")]
    pub text_color: String,
}

/// Parse the reference table from CSV bytes.
///
/// Extra columns are ignored; a row missing one of the expected columns
/// fails the whole parse (the table is machine-generated, a malformed file
/// means the download was bad).
pub fn parse_table(bytes: &[u8]) -> Result<Vec<ColorTableEntry>, ColorTableError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);
    let mut entries = Vec::new();
    for row in reader.deserialize() {
        entries.push(row?);
    }
    Ok(entries)
}

/// Load the reference table from a previously downloaded file.
pub fn load_table(path: &Path) -> Result<Vec<ColorTableEntry>, ColorTableError> {
    let bytes = std::fs::read(path)?;
    parse_table(&bytes)
}
