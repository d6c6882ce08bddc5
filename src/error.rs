// ⚠️ Error taxonomy for the import pipeline
//
// Schema problems are raised before the database is touched; everything the
// store reports is passed through untouched so the transaction can roll back.

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Debug, Error)]
pub enum ImportError {
    /// The CSV header lacks one or more required columns.
    #[error("CSV missing required columns: {missing:?}. Found columns: {found:?}")]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// Raised when the CSV decoder rejects the file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any failure reported by the relational store.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored timestamp could not be parsed back into a `DateTime<Utc>`.
    #[error("invalid timestamp '{value}' in column {column}")]
    InvalidTimestamp { column: String, value: String },
}
