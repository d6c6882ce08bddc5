// 🗄️ Database - schema bootstrap and read-side queries
//
// Timestamps are stored as RFC 3339 text.

use crate::error::{ImportError, Result};
use crate::normalize::Attending;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

// ============================================================================
// CONNECTION BOOTSTRAP
// ============================================================================

/// Open (or create) the database file and make sure the schema exists
pub fn open_database(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    setup_database(&conn)?;
    debug!(path = %db_path.display(), "database ready");
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    // ==========================================================================
    // Districts / Students / Colleges
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS districts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            district_id INTEGER NOT NULL REFERENCES districts(id) ON DELETE CASCADE,
            student_number TEXT NOT NULL,
            UNIQUE (district_id, student_number)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS colleges (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            ceeb_code TEXT NOT NULL DEFAULT ''
        )",
        [],
    )?;

    // ==========================================================================
    // Applications (one row per student/college pair, soft-archived)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS applications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
            college_id INTEGER NOT NULL REFERENCES colleges(id) ON DELETE CASCADE,
            application_result TEXT,
            application_type TEXT,
            attending INTEGER,
            is_archived INTEGER NOT NULL DEFAULT 0,
            archived_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (student_id, college_id)
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_districts_name ON districts(name)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_colleges_ceeb_code ON colleges(ceeb_code)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_colleges_name ON colleges(name)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_applications_student_archived
         ON applications(student_id, is_archived)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// TIMESTAMPS (stored as RFC 3339 text)
// ============================================================================

pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

pub fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ImportError::InvalidTimestamp {
            column: column.to_string(),
            value: value.to_string(),
        })
}

// ============================================================================
// READ SIDE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Districts,
    Students,
    Colleges,
    Applications,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Districts => "districts",
            Table::Students => "students",
            Table::Colleges => "colleges",
            Table::Applications => "applications",
        }
    }
}

pub fn count_rows(conn: &Connection, table: Table) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.as_str());
    let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;

    Ok(count)
}

pub fn count_archived(conn: &Connection, archived: bool) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM applications WHERE is_archived = ?1",
        params![archived],
        |row| row.get(0),
    )?;

    Ok(count)
}

/// Application joined with the names a person would look for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationView {
    pub district_name: String,
    pub student_number: String,
    pub college_name: String,
    pub ceeb_code: String,
    pub application_result: Option<String>,
    pub application_type: Option<String>,
    pub attending: Attending,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
}

impl std::fmt::Display for ApplicationView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.student_number, self.college_name)
    }
}

const APPLICATION_VIEW_SELECT: &str = "
    SELECT d.name, s.student_number, c.name, c.ceeb_code,
           a.application_result, a.application_type, a.attending,
           a.is_archived, a.archived_at
    FROM applications a
    JOIN students s ON s.id = a.student_id
    JOIN districts d ON d.id = s.district_id
    JOIN colleges c ON c.id = a.college_id";

type ViewRow = (
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<bool>,
    bool,
    Option<String>,
);

fn query_views(conn: &Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<ApplicationView>> {
    let mut stmt = conn.prepare(sql)?;

    let rows = stmt
        .query_map(args, |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<ViewRow>>>()?;

    let mut views = Vec::with_capacity(rows.len());

    for (district_name, student_number, college_name, ceeb_code, result, app_type, attending, is_archived, archived_at) in rows {
        let archived_at = match archived_at {
            Some(value) => Some(parse_timestamp("archived_at", &value)?),
            None => None,
        };

        views.push(ApplicationView {
            district_name,
            student_number,
            college_name,
            ceeb_code,
            application_result: result,
            application_type: app_type,
            attending: Attending::from_bool(attending),
            is_archived,
            archived_at,
        });
    }

    Ok(views)
}

pub fn get_all_applications(conn: &Connection) -> Result<Vec<ApplicationView>> {
    let sql = format!("{} ORDER BY a.id", APPLICATION_VIEW_SELECT);
    query_views(conn, &sql, &[])
}

/// Every application (active or archived) for one student of a district
pub fn get_applications_for_student(
    conn: &Connection,
    district_name: &str,
    student_number: &str,
) -> Result<Vec<ApplicationView>> {
    let sql = format!(
        "{} WHERE d.name = ?1 AND s.student_number = ?2 ORDER BY a.id",
        APPLICATION_VIEW_SELECT
    );
    query_views(conn, &sql, &[&district_name, &student_number])
}
