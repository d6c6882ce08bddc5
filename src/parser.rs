// 🏗️ CSV Parser - district application exports
//
// Decodes the district export into raw rows keyed by cleaned column name.
// The header is checked against REQUIRED_COLUMNS before any row is read, so a
// malformed file never reaches the database.

use crate::error::{ImportError, Result};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

// ============================================================================
// REQUIRED COLUMNS
// ============================================================================

pub const STUDENT_NUMBER: &str = "student_number";
pub const COLLEGE_NAME: &str = "college_name";
pub const CEEB_CODE: &str = "ceeb_code";
pub const APPLICATION_TYPE: &str = "application_type";
pub const APPLICATION_RESULT: &str = "application_result";
pub const ATTENDING: &str = "attending";

pub const REQUIRED_COLUMNS: [&str; 6] = [
    STUDENT_NUMBER,
    COLLEGE_NAME,
    CEEB_CODE,
    APPLICATION_TYPE,
    APPLICATION_RESULT,
    ATTENDING,
];

// ============================================================================
// RAW ROW
// ============================================================================

/// RawRow - one decoded data line, before normalization
///
/// Cells are stored under their cleaned column name. A cell that the line did
/// not provide at all (short row) is absent, which is different from an empty
/// cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Line in the source file (header is line 1)
    pub line: usize,

    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new(line: usize) -> Self {
        RawRow {
            line,
            cells: HashMap::new(),
        }
    }

    /// Builder pattern: add a cell (column name is cleaned)
    pub fn with_cell(mut self, column: &str, value: &str) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: &str, value: &str) {
        self.cells.insert(clean_column_name(column), value.to_string());
    }

    /// Raw cell value, `None` when the line had no such cell
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

// ============================================================================
// HEADER HANDLING
// ============================================================================

/// District exports are inconsistent about case and padding in headers.
pub fn clean_column_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Check a cleaned header against REQUIRED_COLUMNS
pub fn validate_columns(columns: &[String]) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !columns.iter().any(|c| c == *required))
        .map(|required| required.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ImportError::MissingColumns {
            missing,
            found: columns.to_vec(),
        })
    }
}

// ============================================================================
// CSV PARSER
// ============================================================================

pub struct ApplicationCsvParser;

impl ApplicationCsvParser {
    pub fn new() -> Self {
        ApplicationCsvParser
    }

    /// Parse an export file from disk
    pub fn parse(&self, file_path: &Path) -> Result<Vec<RawRow>> {
        let file = File::open(file_path)?;
        let rows = self.parse_reader(file)?;

        debug!(
            path = %file_path.display(),
            rows = rows.len(),
            "decoded application export"
        );

        Ok(rows)
    }

    /// Parse any reader holding CSV text
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Vec<RawRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = reader.headers()?.iter().map(clean_column_name).collect();
        validate_columns(&columns)?;

        let mut rows = Vec::new();

        for (index, result) in reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(index + 2); // +2 because: 1-indexed + header row

            let mut row = RawRow::new(line);
            for (column, value) in columns.iter().zip(record.iter()) {
                row.cells.insert(column.clone(), value.to_string());
            }

            rows.push(row);
        }

        Ok(rows)
    }
}

impl Default for ApplicationCsvParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and validate an export in one call
pub fn load_csv(csv_path: &Path) -> Result<Vec<RawRow>> {
    ApplicationCsvParser::new().parse(csv_path)
}

// ============================================================================
// TESTS
// ============================================================================
