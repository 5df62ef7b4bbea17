//! Required-column validation and typing of parsed rows.

use crate::errors::{Error, Result};
use crate::ingest::parser::RawRecord;

/// Exact header names an upload must carry (case-sensitive)
pub const REQUIRED_COLUMNS: [&str; 3] = ["FirstName", "Phone", "Notes"];

/// One validated lead, typed once at this boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRecord {
    pub first_name: String,
    pub phone: String,
    pub notes: String,
}

/// Validate the whole parsed sequence and convert it to typed leads.
///
/// All-or-nothing: the sequence must be non-empty and every record must
/// carry all of [`REQUIRED_COLUMNS`]. A present-but-empty value passes
/// (matching CSV cells), a missing key does not (matching empty
/// spreadsheet cells). The failure carries the columns found in the first
/// record for diagnostics.
pub fn validate_records(records: Vec<RawRecord>) -> Result<Vec<LeadRecord>> {
    let valid = !records.is_empty()
        && records
            .iter()
            .all(|record| REQUIRED_COLUMNS.iter().all(|column| record.contains_key(*column)));

    if !valid {
        let columns_found = records.first().map(|r| r.keys().cloned().collect()).unwrap_or_default();
        return Err(Error::Validation {
            message: "Invalid file format. File must contain FirstName, Phone, and Notes columns".to_string(),
            columns_found,
        });
    }

    Ok(records
        .into_iter()
        .map(|mut record| LeadRecord {
            first_name: record.remove("FirstName").unwrap_or_default().trim().to_string(),
            phone: record.remove("Phone").unwrap_or_default().trim().to_string(),
            notes: record.remove("Notes").unwrap_or_default().trim().to_string(),
        })
        .collect())
}
