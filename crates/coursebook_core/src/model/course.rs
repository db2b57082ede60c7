//! In-memory course catalog.
//!
//! # Responsibility
//! - Own the session's student roster and assignment list.
//! - Enforce duplicate-free insertion by business key.
//! - Keep the roster sorted by case-insensitive last name.
//!
//! # Invariants
//! - The catalog is a read-through/write-through cache of the durable store;
//!   callers mutate it only after the paired durable write succeeded.
//! - Roster order is re-established on insert, not on every read.
//! - Sort ties keep insertion order (stable sort).

use crate::model::assignment::Assignment;
use crate::model::student::Student;
use chrono::NaiveDate;

/// Catalog of students and assignments for the active session.
#[derive(Debug, Clone, Default)]
pub struct Course {
    name: String,
    students: Vec<Student>,
    assignments: Vec<Assignment>,
}

impl Course {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            students: Vec::new(),
            assignments: Vec::new(),
        }
    }

    /// Builds a catalog from persisted records, sorting the roster once.
    pub fn from_records(
        name: impl Into<String>,
        students: Vec<Student>,
        assignments: Vec<Assignment>,
    ) -> Self {
        let mut course = Self {
            name: name.into(),
            students,
            assignments,
        };
        course.sort_roster();
        course
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Roster in display order (last name, case-insensitive).
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Key lookup by student number.
    pub fn student_by_number(&self, number: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.number == number)
    }

    /// Key lookup by assignment name.
    pub fn assignment_by_name(&self, name: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.name == name)
    }

    /// Positional selection used by menu-driven flows.
    pub fn student_at(&self, index: usize) -> Option<&Student> {
        self.students.get(index)
    }

    pub fn assignment_at(&self, index: usize) -> Option<&Assignment> {
        self.assignments.get(index)
    }

    /// Inserts a student and re-sorts the roster.
    ///
    /// Returns `false` and leaves the roster unchanged when a student with
    /// the same number is already enrolled.
    pub fn insert_student(&mut self, student: Student) -> bool {
        if self.student_by_number(&student.number).is_some() {
            return false;
        }
        self.students.push(student);
        self.sort_roster();
        true
    }

    /// Inserts an assignment.
    ///
    /// Returns `false` and leaves the catalog unchanged when an assignment
    /// with the same name already exists.
    pub fn insert_assignment(&mut self, assignment: Assignment) -> bool {
        if self.assignment_by_name(&assignment.name).is_some() {
            return false;
        }
        self.assignments.push(assignment);
        true
    }

    pub fn remove_student_at(&mut self, index: usize) -> Option<Student> {
        if index >= self.students.len() {
            return None;
        }
        Some(self.students.remove(index))
    }

    pub fn remove_assignment_at(&mut self, index: usize) -> Option<Assignment> {
        if index >= self.assignments.len() {
            return None;
        }
        Some(self.assignments.remove(index))
    }

    /// Replaces the cached running total for one student.
    ///
    /// Returns `false` when the student number is not enrolled.
    pub fn set_total(&mut self, number: &str, total_points: f64) -> bool {
        match self.students.iter_mut().find(|s| s.number == number) {
            Some(student) => {
                student.total_points = total_points;
                true
            }
            None => false,
        }
    }

    /// Name-preserving edit of an assignment's due date and point value.
    pub fn update_assignment_at(
        &mut self,
        index: usize,
        due_date: NaiveDate,
        point_value: u32,
    ) -> bool {
        match self.assignments.get_mut(index) {
            Some(assignment) => {
                assignment.due_date = due_date;
                assignment.point_value = point_value;
                true
            }
            None => false,
        }
    }

    fn sort_roster(&mut self) {
        self.students.sort_by_key(Student::sort_key);
    }
}
