//! Tabular file parsing for the two supported row-oriented encodings.
//!
//! CSV files are streamed record-by-record; XLSX/XLS workbooks are read
//! from their first sheet with the header row as keys. Both produce the
//! same shape: an ordered sequence of column-name → string-value maps.
//! Cells that are absent (short CSV rows never occur - the reader rejects
//! ragged rows - but spreadsheet cells can be empty) are omitted from the
//! map, so a missing value and a missing column look the same to the
//! validator.

use crate::errors::{Error, Result};
use calamine::{Data, Reader, open_workbook_auto};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// One parsed row: column name to raw string value
pub type RawRecord = HashMap<String, String>;

/// Supported upload encodings, derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
    Xls,
}

impl FromStr for FileKind {
    type Err = String;

    /// Case-insensitive extension match, without the leading dot
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(FileKind::Csv),
            "xlsx" => Ok(FileKind::Xlsx),
            "xls" => Ok(FileKind::Xls),
            other => Err(format!("Unsupported file extension: {}", other)),
        }
    }
}

impl FileKind {
    /// Derive the kind from an uploaded filename, if its extension is supported
    pub fn from_filename(filename: &str) -> Option<Self> {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

/// Parse the file at `path` according to `kind`, preserving row order.
///
/// Fails with [`Error::Parse`] carrying the underlying cause; never panics
/// on malformed input.
pub fn parse_file(path: &Path, kind: FileKind) -> Result<Vec<RawRecord>> {
    match kind {
        FileKind::Csv => parse_csv(path),
        FileKind::Xlsx | FileKind::Xls => parse_workbook(path),
    }
}

fn parse_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(parse_error)?;

    let headers = reader.headers().map_err(parse_error)?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(parse_error)?;
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        records.push(record);
    }
    Ok(records)
}

fn parse_workbook(path: &Path) -> Result<Vec<RawRecord>> {
    let mut workbook = open_workbook_auto(path).map_err(parse_error)?;

    // First sheet only, header row as keys
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Parse {
            message: "Workbook contains no sheets".to_string(),
        })?
        .map_err(parse_error)?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };

    let headers: Vec<Option<String>> = header_row.iter().map(|c| cell_to_string(c).map(|h| h.trim().to_string())).collect();

    let mut records = Vec::new();
    for row in rows {
        let mut record = RawRecord::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            let (Some(header), Some(value)) = (header, cell_to_string(cell)) else {
                continue;
            };
            record.insert(header.clone(), value);
        }
        records.push(record);
    }
    Ok(records)
}

/// Empty cells become `None` so absent values stay indistinguishable from
/// absent columns. Integral floats lose their trailing `.0` because phone
/// numbers arrive as numeric cells.
fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9e15 => Some(format!("{}", *f as i64)),
        other => Some(other.to_string()),
    }
}

fn parse_error(err: impl std::fmt::Display) -> Error {
    Error::Parse {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &[u8], suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn file_kind_from_filename() {
        assert_eq!(FileKind::from_filename("leads.csv"), Some(FileKind::Csv));
        assert_eq!(FileKind::from_filename("Leads.XLSX"), Some(FileKind::Xlsx));
        assert_eq!(FileKind::from_filename("old.xls"), Some(FileKind::Xls));
        assert_eq!(FileKind::from_filename("notes.txt"), None);
        assert_eq!(FileKind::from_filename("no-extension"), None);
    }

    #[test]
    fn csv_rows_keep_order_and_headers() {
        let file = write_temp(
            b"FirstName,Phone,Notes\nAlice,5550100,call back\nBob,5550101,\n",
            ".csv",
        );
        let records = parse_file(file.path(), FileKind::Csv).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["FirstName"], "Alice");
        assert_eq!(records[0]["Notes"], "call back");
        assert_eq!(records[1]["FirstName"], "Bob");
        // Empty CSV cell is still a present column
        assert_eq!(records[1]["Notes"], "");
    }

    #[test]
    fn csv_header_only_yields_empty_sequence() {
        let file = write_temp(b"FirstName,Phone,Notes\n", ".csv");
        let records = parse_file(file.path(), FileKind::Csv).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn ragged_csv_is_a_parse_error() {
        let file = write_temp(b"FirstName,Phone,Notes\nAlice,5550100\n", ".csv");
        let err = parse_file(file.path(), FileKind::Csv).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn garbage_workbook_is_a_parse_error() {
        let file = write_temp(b"definitely not a zip archive", ".xlsx");
        let err = parse_file(file.path(), FileKind::Xlsx).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
