//! Grade ledger repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Record one grade per (student, assignment) pair for the course.
//! - Provide the ledger sums used for running-total reconciliation.
//!
//! # Invariants
//! - `insert_entry` never upserts: a duplicate pair is a keyed error and
//!   callers must check `find_entry` first.
//! - Bulk deletes report how many rows were removed and succeed at zero.

use crate::model::grade::GradeEntry;
use crate::repo::{map_insert_error, RecordKey, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for the grade ledger.
pub trait GradeRepository {
    /// Exact-match lookup on the (student, assignment) composite key.
    fn find_entry(&self, student: &str, assignment: &str) -> RepoResult<Option<GradeEntry>>;
    fn insert_entry(&self, entry: &GradeEntry) -> RepoResult<()>;
    /// Replaces stored points earned for an existing entry.
    fn update_points(&self, student: &str, assignment: &str, points_earned: f64)
        -> RepoResult<()>;
    /// Removes all entries for one student; used by cascade deletes.
    fn delete_by_student(&self, student: &str) -> RepoResult<usize>;
    /// Removes all entries for one assignment; used by cascade deletes.
    fn delete_by_assignment(&self, assignment: &str) -> RepoResult<usize>;
    /// Total points earned across all of a student's entries.
    fn sum_for_student(&self, student: &str) -> RepoResult<f64>;
    /// All of a student's entries ordered by assignment name.
    fn list_for_student(&self, student: &str) -> RepoResult<Vec<GradeEntry>>;
}

/// SQLite-backed grade ledger scoped to one course.
pub struct SqliteGradeRepository<'conn> {
    conn: &'conn Connection,
    course: String,
}

impl<'conn> SqliteGradeRepository<'conn> {
    pub fn new(conn: &'conn Connection, course: impl Into<String>) -> Self {
        Self {
            conn,
            course: course.into(),
        }
    }
}

impl GradeRepository for SqliteGradeRepository<'_> {
    fn find_entry(&self, student: &str, assignment: &str) -> RepoResult<Option<GradeEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT student_number, assignment_name, points_possible, points_earned
             FROM graded_assignments
             WHERE student_number = ?1 AND assignment_name = ?2 AND course = ?3;",
        )?;

        let mut rows = stmt.query(params![student, assignment, self.course.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_grade_row(row)?));
        }

        Ok(None)
    }

    fn insert_entry(&self, entry: &GradeEntry) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO graded_assignments
                     (student_number, assignment_name, points_possible, points_earned, course)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    entry.student_number.as_str(),
                    entry.assignment_name.as_str(),
                    entry.points_possible,
                    entry.points_earned,
                    self.course.as_str(),
                ],
            )
            .map_err(|err| {
                map_insert_error(
                    err,
                    RecordKey::Grade {
                        student: entry.student_number.clone(),
                        assignment: entry.assignment_name.clone(),
                    },
                )
            })?;

        Ok(())
    }

    fn update_points(
        &self,
        student: &str,
        assignment: &str,
        points_earned: f64,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE graded_assignments
             SET points_earned = ?1
             WHERE student_number = ?2 AND assignment_name = ?3 AND course = ?4;",
            params![points_earned, student, assignment, self.course.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(RecordKey::Grade {
                student: student.to_string(),
                assignment: assignment.to_string(),
            }));
        }

        Ok(())
    }

    fn delete_by_student(&self, student: &str) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM graded_assignments
             WHERE student_number = ?1 AND course = ?2;",
            params![student, self.course.as_str()],
        )?;

        Ok(removed)
    }

    fn delete_by_assignment(&self, assignment: &str) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM graded_assignments
             WHERE assignment_name = ?1 AND course = ?2;",
            params![assignment, self.course.as_str()],
        )?;

        Ok(removed)
    }

    fn sum_for_student(&self, student: &str) -> RepoResult<f64> {
        let total = self.conn.query_row(
            "SELECT COALESCE(SUM(points_earned), 0)
             FROM graded_assignments
             WHERE student_number = ?1 AND course = ?2;",
            params![student, self.course.as_str()],
            |row| row.get::<_, f64>(0),
        )?;

        Ok(total)
    }

    fn list_for_student(&self, student: &str) -> RepoResult<Vec<GradeEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT student_number, assignment_name, points_possible, points_earned
             FROM graded_assignments
             WHERE student_number = ?1 AND course = ?2
             ORDER BY assignment_name ASC;",
        )?;

        let mut rows = stmt.query(params![student, self.course.as_str()])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_grade_row(row)?);
        }

        Ok(entries)
    }
}

fn parse_grade_row(row: &Row<'_>) -> RepoResult<GradeEntry> {
    let points_possible: i64 = row.get("points_possible")?;
    let points_possible = u32::try_from(points_possible).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid points possible `{points_possible}` in graded_assignments.points_possible"
        ))
    })?;

    GradeEntry::new(
        row.get::<_, String>("student_number")?,
        row.get::<_, String>("assignment_name")?,
        points_possible,
        row.get::<_, f64>("points_earned")?,
    )
    .map_err(RepoError::Validation)
}
