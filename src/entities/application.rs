// 📨 Application Entity - the (student, college) join
//
// At most one row per (student_id, college_id). Rows are archived, never
// deleted, and come back to life when a later import lists the pair again.

use crate::db::{format_timestamp, parse_timestamp};
use crate::error::Result;
use crate::normalize::{Attending, NormalizedRow};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

// ============================================================================
// APPLICATION FIELDS (what an import writes)
// ============================================================================

/// The values an import overwrites on every run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApplicationFields {
    pub application_result: Option<String>,
    pub application_type: Option<String>,
    pub attending: Attending,
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl From<&NormalizedRow> for ApplicationFields {
    fn from(row: &NormalizedRow) -> Self {
        ApplicationFields {
            application_result: non_empty(&row.application_result),
            application_type: non_empty(&row.application_type),
            attending: row.attending,
        }
    }
}

// ============================================================================
// APPLICATION ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub student_id: i64,
    pub college_id: i64,
    pub application_result: Option<String>,
    pub application_type: Option<String>,
    pub attending: Attending,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal projection used by the archive sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveApplication {
    pub id: i64,
    pub student_id: i64,
    pub college_id: i64,
}

impl ActiveApplication {
    pub fn pair(&self) -> (i64, i64) {
        (self.student_id, self.college_id)
    }
}

/// Row as stored, before timestamps are parsed
struct StoredApplication {
    id: i64,
    student_id: i64,
    college_id: i64,
    application_result: Option<String>,
    application_type: Option<String>,
    attending: Option<bool>,
    is_archived: bool,
    archived_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl StoredApplication {
    fn into_application(self) -> Result<Application> {
        let archived_at = match self.archived_at {
            Some(value) => Some(parse_timestamp("archived_at", &value)?),
            None => None,
        };

        Ok(Application {
            id: self.id,
            student_id: self.student_id,
            college_id: self.college_id,
            application_result: self.application_result,
            application_type: self.application_type,
            attending: Attending::from_bool(self.attending),
            is_archived: self.is_archived,
            archived_at,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

impl Application {
    pub fn find(conn: &Connection, student_id: i64, college_id: i64) -> Result<Option<Application>> {
        let stored = conn
            .query_row(
                "SELECT id, student_id, college_id, application_result, application_type,
                        attending, is_archived, archived_at, created_at, updated_at
                 FROM applications
                 WHERE student_id = ?1 AND college_id = ?2",
                params![student_id, college_id],
                |row| {
                    Ok(StoredApplication {
                        id: row.get(0)?,
                        student_id: row.get(1)?,
                        college_id: row.get(2)?,
                        application_result: row.get(3)?,
                        application_type: row.get(4)?,
                        attending: row.get(5)?,
                        is_archived: row.get(6)?,
                        archived_at: row.get(7)?,
                        created_at: row.get(8)?,
                        updated_at: row.get(9)?,
                    })
                },
            )
            .optional()?;

        stored.map(StoredApplication::into_application).transpose()
    }

    pub fn create(
        conn: &Connection,
        student_id: i64,
        college_id: i64,
        fields: &ApplicationFields,
        now: DateTime<Utc>,
    ) -> Result<Application> {
        let now_str = format_timestamp(now);

        conn.execute(
            "INSERT INTO applications (
                student_id, college_id, application_result, application_type,
                attending, is_archived, archived_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 0, NULL, ?6, ?6)",
            params![
                student_id,
                college_id,
                fields.application_result,
                fields.application_type,
                fields.attending.as_bool(),
                now_str,
            ],
        )?;

        Ok(Application {
            id: conn.last_insert_rowid(),
            student_id,
            college_id,
            application_result: fields.application_result.clone(),
            application_type: fields.application_type.clone(),
            attending: fields.attending,
            is_archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Overwrite the imported fields and clear any archive state
    pub fn overwrite(&mut self, conn: &Connection, fields: &ApplicationFields, now: DateTime<Utc>) -> Result<()> {
        conn.execute(
            "UPDATE applications
             SET application_result = ?1,
                 application_type = ?2,
                 attending = ?3,
                 is_archived = 0,
                 archived_at = NULL,
                 updated_at = ?4
             WHERE id = ?5",
            params![
                fields.application_result,
                fields.application_type,
                fields.attending.as_bool(),
                format_timestamp(now),
                self.id,
            ],
        )?;

        self.application_result = fields.application_result.clone();
        self.application_type = fields.application_type.clone();
        self.attending = fields.attending;
        self.is_archived = false;
        self.archived_at = None;
        self.updated_at = now;

        Ok(())
    }

    /// Create or overwrite the application for a pair. Returns `true` when created.
    pub fn upsert(
        conn: &Connection,
        student_id: i64,
        college_id: i64,
        fields: &ApplicationFields,
        now: DateTime<Utc>,
    ) -> Result<(Application, bool)> {
        match Self::find(conn, student_id, college_id)? {
            Some(mut application) => {
                application.overwrite(conn, fields, now)?;
                Ok((application, false))
            }
            None => Ok((Self::create(conn, student_id, college_id, fields, now)?, true)),
        }
    }

    /// Non-archived applications whose student belongs to the district
    pub fn find_active_for_district(conn: &Connection, district_id: i64) -> Result<Vec<ActiveApplication>> {
        let mut stmt = conn.prepare(
            "SELECT a.id, a.student_id, a.college_id
             FROM applications a
             JOIN students s ON s.id = a.student_id
             WHERE s.district_id = ?1 AND a.is_archived = 0
             ORDER BY a.id",
        )?;

        let active = stmt
            .query_map(params![district_id], |row| {
                Ok(ActiveApplication {
                    id: row.get(0)?,
                    student_id: row.get(1)?,
                    college_id: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(active)
    }

    /// Soft delete. Already archived rows are left alone.
    pub fn archive(conn: &Connection, id: i64, archived_at: DateTime<Utc>) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE applications
             SET is_archived = 1, archived_at = ?1
             WHERE id = ?2 AND is_archived = 0",
            params![format_timestamp(archived_at), id],
        )?;

        Ok(changed > 0)
    }
}

// ============================================================================
// TESTS
// ============================================================================
