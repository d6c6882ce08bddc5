// 📥 Import pipeline
//
// file → raw rows → normalized rows → deduplicated rows → reconciled state
//
// Header validation happens while the file is decoded, before a transaction
// is opened, so a malformed export leaves the database untouched.

use crate::config::ImportConfig;
use crate::db::open_database;
use crate::deduplication::DeduplicationEngine;
use crate::error::Result;
use crate::normalize::normalize_rows;
use crate::parser::{load_csv, RawRow};
use crate::reconciliation::{ImportSummary, ReconciliationEngine};
use rusqlite::Connection;
use std::path::Path;
use tracing::{info, instrument};

/// Import an export file into an open database
#[instrument(
    level = "info",
    skip_all,
    fields(path = %csv_path.display(), district = %district_name)
)]
pub fn import_applications_from_csv(
    conn: &mut Connection,
    csv_path: &Path,
    district_name: &str,
) -> Result<ImportSummary> {
    let raw_rows = load_csv(csv_path)?;
    info!(rows = raw_rows.len(), "loaded application export");

    import_rows(conn, &raw_rows, district_name)
}

/// Run the pipeline over rows that were already decoded and validated
pub fn import_rows(conn: &mut Connection, raw_rows: &[RawRow], district_name: &str) -> Result<ImportSummary> {
    let normalized = normalize_rows(raw_rows);
    let deduplicated = DeduplicationEngine::new().deduplicate(normalized);

    ReconciliationEngine::new(district_name).reconcile(conn, &deduplicated.rows)
}

/// Import the configured file into the configured database
///
/// The file is decoded and its header validated before the database is
/// opened, so a bad export never creates or migrates the database file.
#[instrument(
    level = "info",
    skip_all,
    fields(path = %config.csv_path.display(), district = %config.district_name)
)]
pub fn run_import(config: &ImportConfig) -> Result<ImportSummary> {
    let raw_rows = load_csv(&config.csv_path)?;
    info!(rows = raw_rows.len(), "loaded application export");

    let mut conn = open_database(&config.database_path)?;
    let normalized = normalize_rows(&raw_rows);
    let deduplicated = DeduplicationEngine::new().deduplicate(normalized);

    ReconciliationEngine::from_config(config).reconcile(&mut conn, &deduplicated.rows)
}
