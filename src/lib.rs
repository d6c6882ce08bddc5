// College Applications Sync - Core Library
// Exposes the import pipeline for the CLI and tests

pub mod config;
pub mod db;
pub mod deduplication;
pub mod entities;
pub mod error;
pub mod importer;
pub mod normalize;
pub mod parser;
pub mod reconciliation;

// Re-export commonly used types
pub use config::ImportConfig;
pub use db::{
    count_archived, count_rows, get_all_applications, get_applications_for_student,
    open_database, setup_database, ApplicationView, Table,
};
pub use deduplication::{Deduplicated, DeduplicationEngine, DuplicateMatch};
pub use entities::{ActiveApplication, Application, ApplicationFields, College, District, Student};
pub use error::{ImportError, Result};
pub use importer::{import_applications_from_csv, import_rows, run_import};
pub use normalize::{normalize_row, normalize_rows, Attending, NormalizedRow};
pub use parser::{load_csv, validate_columns, ApplicationCsvParser, RawRow, REQUIRED_COLUMNS};
pub use reconciliation::{archive_targets, ImportSummary, ReconciliationEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
