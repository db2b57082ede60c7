//! Assignment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the assignment catalog keyed by assignment name.
//!
//! # Invariants
//! - Due dates are stored as `YYYY-MM-DD` text and rejected on read when the
//!   persisted value no longer parses.
//! - `update_assignment` is name-preserving: ledger entries keyed by the name
//!   survive the edit.

use crate::model::assignment::Assignment;
use crate::repo::{map_insert_error, RecordKey, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository interface for the assignment catalog.
pub trait AssignmentRepository {
    fn insert_assignment(&self, assignment: &Assignment) -> RepoResult<()>;
    fn update_assignment(
        &self,
        name: &str,
        due_date: NaiveDate,
        point_value: u32,
    ) -> RepoResult<()>;
    fn delete_assignment(&self, name: &str) -> RepoResult<()>;
    fn list_assignments(&self) -> RepoResult<Vec<Assignment>>;
}

/// SQLite-backed assignment repository scoped to one course.
pub struct SqliteAssignmentRepository<'conn> {
    conn: &'conn Connection,
    course: String,
}

impl<'conn> SqliteAssignmentRepository<'conn> {
    pub fn new(conn: &'conn Connection, course: impl Into<String>) -> Self {
        Self {
            conn,
            course: course.into(),
        }
    }
}

impl AssignmentRepository for SqliteAssignmentRepository<'_> {
    fn insert_assignment(&self, assignment: &Assignment) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO assignments (name, due_date, point_value, course)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    assignment.name.as_str(),
                    assignment.due_date.format(DUE_DATE_FORMAT).to_string(),
                    assignment.point_value,
                    self.course.as_str(),
                ],
            )
            .map_err(|err| {
                map_insert_error(err, RecordKey::Assignment(assignment.name.clone()))
            })?;

        Ok(())
    }

    fn update_assignment(
        &self,
        name: &str,
        due_date: NaiveDate,
        point_value: u32,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE assignments
             SET due_date = ?1, point_value = ?2
             WHERE name = ?3 AND course = ?4;",
            params![
                due_date.format(DUE_DATE_FORMAT).to_string(),
                point_value,
                name,
                self.course.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(RecordKey::Assignment(name.to_string())));
        }

        Ok(())
    }

    fn delete_assignment(&self, name: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM assignments WHERE name = ?1 AND course = ?2;",
            params![name, self.course.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(RecordKey::Assignment(name.to_string())));
        }

        Ok(())
    }

    fn list_assignments(&self) -> RepoResult<Vec<Assignment>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, due_date, point_value
             FROM assignments
             WHERE course = ?1
             ORDER BY due_date ASC, name ASC;",
        )?;

        let mut rows = stmt.query([self.course.as_str()])?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next()? {
            assignments.push(parse_assignment_row(row)?);
        }

        Ok(assignments)
    }
}

fn parse_assignment_row(row: &Row<'_>) -> RepoResult<Assignment> {
    let name: String = row.get("name")?;
    let due_text: String = row.get("due_date")?;
    let due_date = NaiveDate::parse_from_str(&due_text, DUE_DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid due date `{due_text}` in assignments.due_date"
        ))
    })?;

    let point_value: i64 = row.get("point_value")?;
    let point_value = u32::try_from(point_value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid point value `{point_value}` in assignments.point_value"
        ))
    })?;

    Assignment::new(name, due_date, point_value).map_err(RepoError::Validation)
}
