// 🧹 Row Normalizer
//
// Turns raw cells into the canonical row the rest of the pipeline works on:
// trimmed text, lower-cased outcomes and a tri-state attending flag.

use crate::parser::{
    RawRow, APPLICATION_RESULT, APPLICATION_TYPE, ATTENDING, CEEB_CODE, COLLEGE_NAME,
    STUDENT_NUMBER,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// ATTENDING (tri-state)
// ============================================================================

/// Whether the student will attend: yes, no, or not known yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Attending {
    Yes,
    No,
    #[default]
    Unknown,
}

impl Attending {
    /// Parse a raw cell. Anything unrecognised is Unknown, never an error.
    pub fn parse(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Attending::Unknown;
        };

        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => Attending::Yes,
            "0" | "false" | "no" => Attending::No,
            "unknown" | "" | "nan" | "none" => Attending::Unknown,
            other => {
                debug!(value = other, "unrecognised attending value treated as unknown");
                Attending::Unknown
            }
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Attending::Yes => Some(true),
            Attending::No => Some(false),
            Attending::Unknown => None,
        }
    }

    pub fn from_bool(value: Option<bool>) -> Self {
        match value {
            Some(true) => Attending::Yes,
            Some(false) => Attending::No,
            None => Attending::Unknown,
        }
    }
}

// ============================================================================
// NORMALIZED ROW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    /// Line in the source file, kept for logging
    pub line: usize,

    pub student_number: String,
    pub ceeb_code: String,
    pub college_name: String,

    /// Lower-cased outcome ("accepted", "denied", ...); empty when not reported
    pub application_result: String,

    /// As written by the district ("Early Action", "Rolling", ...)
    pub application_type: String,

    pub attending: Attending,
}

impl NormalizedRow {
    /// College grouping key: CEEB code when present, else the lower-cased name
    pub fn college_key(&self) -> String {
        if self.ceeb_code.is_empty() {
            self.college_name.to_lowercase()
        } else {
            self.ceeb_code.clone()
        }
    }
}

fn trimmed(row: &RawRow, column: &str) -> String {
    row.get(column).map(str::trim).unwrap_or("").to_string()
}

pub fn normalize_row(row: &RawRow) -> NormalizedRow {
    NormalizedRow {
        line: row.line,
        student_number: trimmed(row, STUDENT_NUMBER),
        ceeb_code: trimmed(row, CEEB_CODE),
        college_name: trimmed(row, COLLEGE_NAME),
        application_result: trimmed(row, APPLICATION_RESULT).to_lowercase(),
        application_type: trimmed(row, APPLICATION_TYPE),
        attending: Attending::parse(row.get(ATTENDING)),
    }
}

pub fn normalize_rows(rows: &[RawRow]) -> Vec<NormalizedRow> {
    rows.iter().map(normalize_row).collect()
}

// ============================================================================
// TESTS
// ============================================================================
