// 🏛️ College Entity
//
// Colleges are global. The CEEB code is the lookup key when the export
// provides one; otherwise the exact (case-sensitive) name is used.
//
// Known limitation: a college first seen without a code and later with one
// ends up as two rows. They are not merged.

use crate::error::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct College {
    pub id: i64,
    pub name: String,

    /// Empty when the college was created from a row without a code
    pub ceeb_code: String,
}

impl College {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<College> {
        Ok(College {
            id: row.get(0)?,
            name: row.get(1)?,
            ceeb_code: row.get(2)?,
        })
    }

    pub fn find_by_ceeb_code(conn: &Connection, ceeb_code: &str) -> Result<Option<College>> {
        let college = conn
            .query_row(
                "SELECT id, name, ceeb_code FROM colleges
                 WHERE ceeb_code = ?1 ORDER BY id LIMIT 1",
                params![ceeb_code],
                Self::from_row,
            )
            .optional()?;

        Ok(college)
    }

    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<College>> {
        let college = conn
            .query_row(
                "SELECT id, name, ceeb_code FROM colleges
                 WHERE name = ?1 ORDER BY id LIMIT 1",
                params![name],
                Self::from_row,
            )
            .optional()?;

        Ok(college)
    }

    pub fn create(conn: &Connection, name: &str, ceeb_code: &str) -> Result<College> {
        conn.execute(
            "INSERT INTO colleges (name, ceeb_code) VALUES (?1, ?2)",
            params![name, ceeb_code],
        )?;

        Ok(College {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            ceeb_code: ceeb_code.to_string(),
        })
    }

    /// Resolve a college from a row's code and name.
    ///
    /// An existing college is returned untouched, even when the export now
    /// reports a different name for the same code.
    pub fn get_or_create(conn: &Connection, ceeb_code: &str, name: &str) -> Result<(College, bool)> {
        let ceeb_code = ceeb_code.trim();
        let name = name.trim();

        let existing = if ceeb_code.is_empty() {
            Self::find_by_name(conn, name)?
        } else {
            Self::find_by_ceeb_code(conn, ceeb_code)?
        };

        match existing {
            Some(college) => Ok((college, false)),
            None => Ok((Self::create(conn, name, ceeb_code)?, true)),
        }
    }
}

impl fmt::Display for College {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.ceeb_code)
    }
}
