//! Roster and assignment catalog use-cases.
//!
//! # Responsibility
//! - Load the course catalog from the store at startup.
//! - Add/delete students and assignments with cascade semantics.
//! - Recompute cached running totals from the grade ledger.
//!
//! # Invariants
//! - Catalog adds are all-or-nothing: the durable insert runs first and the
//!   in-memory append happens only after it succeeded.
//! - Hard-deleting an assignment recomputes every student's total from the
//!   ledger; incremental adjustment is not possible on that path.
//! - Assignment updates are name-preserving and leave the ledger untouched.

use crate::model::assignment::Assignment;
use crate::model::course::Course;
use crate::model::student::Student;
use crate::model::ValidationError;
use crate::repo::assignment_repo::AssignmentRepository;
use crate::repo::grade_repo::GradeRepository;
use crate::repo::student_repo::StudentRepository;
use crate::repo::{RecordKey, RepoError};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from roster/catalog use-cases.
#[derive(Debug)]
pub enum RosterError {
    /// Rejected operator input; recover by re-prompting.
    Validation(ValidationError),
    /// A student with this number is already enrolled.
    DuplicateStudent(String),
    /// An assignment with this name already exists.
    DuplicateAssignment(String),
    /// Positional selection does not name an existing row.
    SelectionOutOfRange(usize),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateStudent(number) => {
                write!(f, "student {number} is already enrolled")
            }
            Self::DuplicateAssignment(name) => {
                write!(f, "assignment `{name}` already exists")
            }
            Self::SelectionOutOfRange(index) => write!(f, "selection {index} is out of range"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RosterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RosterError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for RosterError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Duplicate(RecordKey::Student(number)) => Self::DuplicateStudent(number),
            RepoError::Duplicate(RecordKey::Assignment(name)) => Self::DuplicateAssignment(name),
            other => Self::Repo(other),
        }
    }
}

/// Use-case facade for roster and catalog management.
pub struct RosterService<S, A, G>
where
    S: StudentRepository,
    A: AssignmentRepository,
    G: GradeRepository,
{
    students: S,
    assignments: A,
    grades: G,
}

impl<S, A, G> RosterService<S, A, G>
where
    S: StudentRepository,
    A: AssignmentRepository,
    G: GradeRepository,
{
    pub fn new(students: S, assignments: A, grades: G) -> Self {
        Self {
            students,
            assignments,
            grades,
        }
    }

    /// Builds the in-memory catalog from the durable store.
    pub fn load_course(&self, course_name: &str) -> Result<Course, RosterError> {
        let students = self.students.list_students()?;
        let assignments = self.assignments.list_assignments()?;
        info!(
            "event=course_load module=roster status=ok students={} assignments={}",
            students.len(),
            assignments.len()
        );
        Ok(Course::from_records(course_name, students, assignments))
    }

    /// Enrolls a new student.
    ///
    /// The full name must be exactly `First Last`; duplicate numbers are
    /// rejected before anything is written.
    pub fn add_student(
        &self,
        course: &mut Course,
        full_name: &str,
        number: &str,
    ) -> Result<(), RosterError> {
        let student = Student::new(full_name, number)?;
        if course.student_by_number(&student.number).is_some() {
            return Err(RosterError::DuplicateStudent(student.number));
        }

        self.students.insert_student(&student)?;
        course.insert_student(student);
        info!("event=roster_add module=roster status=ok number={number}");
        Ok(())
    }

    /// Adds a new assignment to the catalog.
    pub fn add_assignment(
        &self,
        course: &mut Course,
        name: &str,
        due_date: NaiveDate,
        point_value: u32,
    ) -> Result<(), RosterError> {
        let assignment = Assignment::new(name, due_date, point_value)?;
        if course.assignment_by_name(&assignment.name).is_some() {
            return Err(RosterError::DuplicateAssignment(assignment.name));
        }

        self.assignments.insert_assignment(&assignment)?;
        course.insert_assignment(assignment);
        info!("event=catalog_add module=roster status=ok assignment={name}");
        Ok(())
    }

    /// Removes a student and every ledger entry for them.
    pub fn delete_student(
        &self,
        course: &mut Course,
        index: usize,
    ) -> Result<Student, RosterError> {
        let number = course
            .student_at(index)
            .ok_or(RosterError::SelectionOutOfRange(index))?
            .number
            .clone();

        let removed_grades = self.grades.delete_by_student(&number)?;
        self.students.delete_student(&number)?;
        let student = course
            .remove_student_at(index)
            .ok_or(RosterError::SelectionOutOfRange(index))?;

        info!(
            "event=roster_delete module=roster status=ok number={number} cascaded_grades={removed_grades}"
        );
        Ok(student)
    }

    /// Hard-deletes an assignment, cascades its ledger entries and recomputes
    /// every student's running total from the remaining ledger rows.
    pub fn delete_assignment(
        &self,
        course: &mut Course,
        index: usize,
    ) -> Result<Assignment, RosterError> {
        let name = course
            .assignment_at(index)
            .ok_or(RosterError::SelectionOutOfRange(index))?
            .name
            .clone();

        let removed_grades = self.grades.delete_by_assignment(&name)?;
        self.assignments.delete_assignment(&name)?;
        let assignment = course
            .remove_assignment_at(index)
            .ok_or(RosterError::SelectionOutOfRange(index))?;

        info!(
            "event=catalog_delete module=roster status=ok assignment={name} cascaded_grades={removed_grades}"
        );

        // The delete path does not know which students lost rows.
        self.recompute_totals(course)?;
        Ok(assignment)
    }

    /// Name-preserving edit of due date and point value; ledger entries for
    /// the assignment survive unchanged.
    pub fn update_assignment(
        &self,
        course: &mut Course,
        index: usize,
        due_date: NaiveDate,
        point_value: u32,
    ) -> Result<(), RosterError> {
        let name = course
            .assignment_at(index)
            .ok_or(RosterError::SelectionOutOfRange(index))?
            .name
            .clone();

        Assignment::new(name.as_str(), due_date, point_value)?;
        self.assignments
            .update_assignment(&name, due_date, point_value)?;
        course.update_assignment_at(index, due_date, point_value);
        info!("event=catalog_update module=roster status=ok assignment={name}");
        Ok(())
    }

    /// Recovery procedure: rebuilds every cached running total from the
    /// ledger and persists it. Runnable on demand.
    pub fn recompute_totals(&self, course: &mut Course) -> Result<(), RosterError> {
        let numbers: Vec<String> = course
            .students()
            .iter()
            .map(|student| student.number.clone())
            .collect();

        for number in numbers {
            let total = self.grades.sum_for_student(&number)?;
            self.students.update_total(&number, total)?;
            course.set_total(&number, total);
        }

        info!("event=totals_recompute module=roster status=ok");
        Ok(())
    }
}
