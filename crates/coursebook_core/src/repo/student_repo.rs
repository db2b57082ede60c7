//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist roster records and cached running totals.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate the model before SQL mutations.
//! - Listing returns students ordered by last name for roster display.

use crate::model::student::Student;
use crate::repo::{map_insert_error, RecordKey, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for roster persistence.
pub trait StudentRepository {
    fn insert_student(&self, student: &Student) -> RepoResult<()>;
    fn update_total(&self, number: &str, total_points: f64) -> RepoResult<()>;
    fn delete_student(&self, number: &str) -> RepoResult<()>;
    fn list_students(&self) -> RepoResult<Vec<Student>>;
}

/// SQLite-backed student repository scoped to one course.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
    course: String,
}

impl<'conn> SqliteStudentRepository<'conn> {
    pub fn new(conn: &'conn Connection, course: impl Into<String>) -> Self {
        Self {
            conn,
            course: course.into(),
        }
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn insert_student(&self, student: &Student) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO students (number, first_name, last_name, course, total_points)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    student.number.as_str(),
                    student.first_name.as_str(),
                    student.last_name.as_str(),
                    self.course.as_str(),
                    student.total_points,
                ],
            )
            .map_err(|err| map_insert_error(err, RecordKey::Student(student.number.clone())))?;

        Ok(())
    }

    fn update_total(&self, number: &str, total_points: f64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE students
             SET total_points = ?1
             WHERE number = ?2 AND course = ?3;",
            params![total_points, number, self.course.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(RecordKey::Student(number.to_string())));
        }

        Ok(())
    }

    fn delete_student(&self, number: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM students WHERE number = ?1 AND course = ?2;",
            params![number, self.course.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(RecordKey::Student(number.to_string())));
        }

        Ok(())
    }

    fn list_students(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(
            "SELECT number, first_name, last_name, total_points
             FROM students
             WHERE course = ?1
             ORDER BY last_name COLLATE NOCASE ASC;",
        )?;

        let mut rows = stmt.query([self.course.as_str()])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }

        Ok(students)
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    Ok(Student::from_parts(
        row.get::<_, String>("number")?,
        row.get::<_, String>("first_name")?,
        row.get::<_, String>("last_name")?,
        row.get::<_, f64>("total_points")?,
    ))
}
