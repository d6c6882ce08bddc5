// 🏫 District Entity
//
// One district owns every student in an export. It is looked up by name and
// created on first use.

use crate::error::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub id: i64,
    pub name: String,
}

impl District {
    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<District>> {
        let district = conn
            .query_row(
                "SELECT id, name FROM districts WHERE name = ?1 ORDER BY id LIMIT 1",
                params![name],
                |row| {
                    Ok(District {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(district)
    }

    pub fn create(conn: &Connection, name: &str) -> Result<District> {
        conn.execute("INSERT INTO districts (name) VALUES (?1)", params![name])?;

        Ok(District {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    pub fn get_or_create(conn: &Connection, name: &str) -> Result<(District, bool)> {
        match Self::find_by_name(conn, name)? {
            Some(district) => Ok((district, false)),
            None => Ok((Self::create(conn, name)?, true)),
        }
    }
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
