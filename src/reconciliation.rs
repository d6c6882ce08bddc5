// ⚖️ Reconciliation Engine - make the database match the export
//
// One import = one transaction:
//   1. resolve district/student/college for every row and upsert its application
//   2. remember every (student_id, college_id) pair touched
//   3. archive_targets = active pairs in the district − touched pairs
//
// If anything fails the transaction is dropped and SQLite rolls it back.

use crate::config::ImportConfig;
use crate::entities::{ActiveApplication, Application, ApplicationFields, College, District, Student};
use crate::error::Result;
use crate::normalize::NormalizedRow;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

// ============================================================================
// IMPORT SUMMARY
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Rows left after deduplication
    pub total_processed: usize,
    pub created: usize,
    pub updated: usize,
    pub archived: usize,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed: {} created, {} updated, {} archived",
            self.total_processed, self.created, self.updated, self.archived
        )
    }
}

// ============================================================================
// ARCHIVE SWEEP
// ============================================================================

/// Ids of active applications whose pair was not touched by this run
pub fn archive_targets(active: &[ActiveApplication], touched: &HashSet<(i64, i64)>) -> Vec<i64> {
    active
        .iter()
        .filter(|application| !touched.contains(&application.pair()))
        .map(|application| application.id)
        .collect()
}

// ============================================================================
// RECONCILIATION ENGINE
// ============================================================================

pub struct ReconciliationEngine {
    /// District every student in the export belongs to
    pub district_name: String,
}

impl ReconciliationEngine {
    pub fn new(district_name: impl Into<String>) -> Self {
        ReconciliationEngine {
            district_name: district_name.into(),
        }
    }

    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new(config.district_name.clone())
    }

    /// Reconcile deduplicated rows, stamping the run with the current time
    pub fn reconcile(&self, conn: &mut Connection, rows: &[NormalizedRow]) -> Result<ImportSummary> {
        self.reconcile_at(conn, rows, Utc::now())
    }

    /// Reconcile with an explicit run timestamp (shared by every write and the whole sweep)
    pub fn reconcile_at(
        &self,
        conn: &mut Connection,
        rows: &[NormalizedRow],
        run_at: DateTime<Utc>,
    ) -> Result<ImportSummary> {
        let tx = conn.transaction()?;
        let summary = self.apply(&tx, rows, run_at)?;
        tx.commit()?;

        info!(
            district = %self.district_name,
            total_processed = summary.total_processed,
            created = summary.created,
            updated = summary.updated,
            archived = summary.archived,
            "reconciliation committed"
        );

        Ok(summary)
    }

    fn apply(&self, conn: &Connection, rows: &[NormalizedRow], run_at: DateTime<Utc>) -> Result<ImportSummary> {
        let (district, district_created) = District::get_or_create(conn, &self.district_name)?;
        if district_created {
            info!(district = %district, "created district");
        }

        let mut summary = ImportSummary {
            total_processed: rows.len(),
            ..ImportSummary::default()
        };
        let mut touched: HashSet<(i64, i64)> = HashSet::with_capacity(rows.len());

        for row in rows {
            let (student, _) = Student::get_or_create(conn, &district, &row.student_number)?;
            let (college, _) = College::get_or_create(conn, &row.ceeb_code, &row.college_name)?;

            let fields = ApplicationFields::from(row);
            let (application, created) = Application::upsert(conn, student.id, college.id, &fields, run_at)?;

            debug!(
                line = row.line,
                student = %student.label(&district),
                college = %college,
                application_id = application.id,
                created,
                "application upserted"
            );

            touched.insert((student.id, college.id));
            if created {
                summary.created += 1;
            } else {
                summary.updated += 1;
            }
        }

        let active = Application::find_active_for_district(conn, district.id)?;
        for id in archive_targets(&active, &touched) {
            if Application::archive(conn, id, run_at)? {
                debug!(application_id = id, "application archived");
                summary.archived += 1;
            }
        }

        Ok(summary)
    }
}

// ============================================================================
// TESTS
// ============================================================================
