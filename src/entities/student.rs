// 🎓 Student Entity
//
// Identity key is (district_id, student_number). The number is stored as text
// exactly as the export wrote it and is never updated.

use crate::entities::District;
use crate::error::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub district_id: i64,
    pub student_number: String,
}

impl Student {
    pub fn find(conn: &Connection, district_id: i64, student_number: &str) -> Result<Option<Student>> {
        let student = conn
            .query_row(
                "SELECT id, district_id, student_number
                 FROM students
                 WHERE district_id = ?1 AND student_number = ?2",
                params![district_id, student_number],
                |row| {
                    Ok(Student {
                        id: row.get(0)?,
                        district_id: row.get(1)?,
                        student_number: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(student)
    }

    pub fn create(conn: &Connection, district_id: i64, student_number: &str) -> Result<Student> {
        conn.execute(
            "INSERT INTO students (district_id, student_number) VALUES (?1, ?2)",
            params![district_id, student_number],
        )?;

        Ok(Student {
            id: conn.last_insert_rowid(),
            district_id,
            student_number: student_number.to_string(),
        })
    }

    pub fn get_or_create(
        conn: &Connection,
        district: &District,
        student_number: &str,
    ) -> Result<(Student, bool)> {
        match Self::find(conn, district.id, student_number)? {
            Some(student) => Ok((student, false)),
            None => Ok((Self::create(conn, district.id, student_number)?, true)),
        }
    }

    /// "<district> - <student_number>"
    pub fn label(&self, district: &District) -> String {
        format!("{} - {}", district.name, self.student_number)
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.student_number)
    }
}
