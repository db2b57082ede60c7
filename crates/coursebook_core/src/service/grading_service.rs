//! Grading workflow and reconciliation engine.
//!
//! # Responsibility
//! - Record a grade for a (student, assignment) pair: lateness evaluation,
//!   opt-in penalty, ledger reconciliation, running-total upkeep.
//! - Assemble per-student grade reports.
//!
//! # Invariants
//! - Any early return before the first ledger write leaves no side effects.
//! - Regrading adjusts the total as one net delta (`total - old + new`),
//!   never as two independent totals.
//! - The in-memory total always tracks the ledger; a failed total write to
//!   the store is surfaced distinctly, with recompute as the recovery path.

use crate::model::assignment::Assignment;
use crate::model::course::Course;
use crate::model::grade::GradeEntry;
use crate::model::student::Student;
use crate::model::ValidationError;
use crate::policy::late::{days_late, LatePolicy};
use crate::repo::grade_repo::GradeRepository;
use crate::repo::student_repo::StudentRepository;
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input-provider collaborator for the grading workflow.
///
/// Implementations supply validated primitives; every prompt may return
/// `None`/decline to cancel, which aborts the workflow before any write.
pub trait GradingPrompt {
    /// Awarded points, already constrained to `0 < points <= point_value`.
    fn points_awarded(&mut self, assignment: &Assignment) -> Option<f64>;
    /// Submission date, already validated as a three-component calendar date.
    fn submission_date(&mut self) -> Option<NaiveDate>;
    /// Whether to apply the late penalty for the given lateness.
    fn confirm_penalty(&mut self, days_late: i64, penalty_percent: u32) -> bool;
    /// Whether to overwrite a previously recorded grade.
    fn confirm_overwrite(&mut self, previous_points: f64) -> bool;
}

/// Terminal result of one grading operation.
#[derive(Debug, Clone, PartialEq)]
pub enum GradeOutcome {
    /// First grade for the pair was recorded.
    Recorded {
        points_earned: f64,
        days_late: i64,
        penalized: bool,
    },
    /// An existing grade was confirmed and replaced.
    Replaced {
        previous_points: f64,
        points_earned: f64,
        days_late: i64,
        penalized: bool,
    },
    /// An existing grade was found and the operator declined the overwrite.
    Declined,
    /// The operator cancelled a prompt before any write happened.
    Cancelled,
}

/// Errors from the grading workflow.
#[derive(Debug)]
pub enum GradingError {
    /// Positional selection does not name an existing row; no side effects.
    SelectionOutOfRange(usize),
    /// The collaborator handed back an out-of-contract value.
    Validation(ValidationError),
    /// Persistence-layer failure before the total write.
    Repo(RepoError),
    /// The ledger was mutated but persisting the new running total failed;
    /// the stored total is stale until totals are recomputed.
    TotalWriteFailed {
        number: String,
        total_points: f64,
        source: RepoError,
    },
}

impl Display for GradingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelectionOutOfRange(index) => {
                write!(f, "selection {index} is out of range")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::TotalWriteFailed {
                number,
                total_points,
                source,
            } => write!(
                f,
                "grade recorded but persisting total {total_points} for {number} failed: {source}"
            ),
        }
    }
}

impl Error for GradingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::TotalWriteFailed { source, .. } => Some(source),
            Self::SelectionOutOfRange(_) => None,
        }
    }
}

impl From<ValidationError> for GradingError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for GradingError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Per-student grade sheet assembled from the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentReport {
    pub student: Student,
    pub entries: Vec<GradeEntry>,
    pub total_possible: u32,
    pub total_earned: f64,
    /// `None` when the student has no graded assignments yet.
    pub percent: Option<f64>,
}

/// Use-case facade for the grading workflow.
pub struct GradingService<G, S>
where
    G: GradeRepository,
    S: StudentRepository,
{
    grades: G,
    students: S,
    policy: LatePolicy,
}

impl<G, S> GradingService<G, S>
where
    G: GradeRepository,
    S: StudentRepository,
{
    pub fn new(grades: G, students: S, policy: LatePolicy) -> Self {
        Self {
            grades,
            students,
            policy,
        }
    }

    /// Runs one grading operation for the selected student and assignment.
    ///
    /// # Contract
    /// - Invalid selections abort with `SelectionOutOfRange` and no side
    ///   effects.
    /// - Cancelled prompts abort with `GradeOutcome::Cancelled` and no side
    ///   effects.
    /// - A declined overwrite aborts with `GradeOutcome::Declined`; the new
    ///   awarded value is discarded.
    pub fn grade(
        &self,
        course: &mut Course,
        student_index: usize,
        assignment_index: usize,
        prompt: &mut dyn GradingPrompt,
    ) -> Result<GradeOutcome, GradingError> {
        let student = course
            .student_at(student_index)
            .ok_or(GradingError::SelectionOutOfRange(student_index))?;
        let number = student.number.clone();
        let current_total = student.total_points;
        let assignment = course
            .assignment_at(assignment_index)
            .ok_or(GradingError::SelectionOutOfRange(assignment_index))?
            .clone();

        let Some(mut awarded) = prompt.points_awarded(&assignment) else {
            return Ok(GradeOutcome::Cancelled);
        };
        if !awarded.is_finite() || awarded <= 0.0 || awarded > f64::from(assignment.point_value) {
            return Err(ValidationError::PointsOutOfRange {
                awarded,
                max: assignment.point_value,
            }
            .into());
        }

        let Some(submitted) = prompt.submission_date() else {
            return Ok(GradeOutcome::Cancelled);
        };

        let days_late = days_late(assignment.due_date, submitted);
        let mut penalized = false;
        if days_late > 0
            && prompt.confirm_penalty(days_late, self.policy.penalty_percent(days_late))
        {
            awarded *= self.policy.multiplier(days_late);
            penalized = true;
        }

        let outcome = match self.grades.find_entry(&number, &assignment.name)? {
            Some(existing) => {
                if !prompt.confirm_overwrite(existing.points_earned) {
                    info!(
                        "event=grade_replace module=grading status=declined number={number} assignment={}",
                        assignment.name
                    );
                    return Ok(GradeOutcome::Declined);
                }

                self.grades
                    .update_points(&number, &assignment.name, awarded)?;
                let new_total = current_total - existing.points_earned + awarded;
                self.finish_total(course, &number, new_total)?;

                info!(
                    "event=grade_replace module=grading status=ok number={number} assignment={} days_late={days_late}",
                    assignment.name
                );
                GradeOutcome::Replaced {
                    previous_points: existing.points_earned,
                    points_earned: awarded,
                    days_late,
                    penalized,
                }
            }
            None => {
                let entry = GradeEntry::new(
                    number.as_str(),
                    assignment.name.as_str(),
                    assignment.point_value,
                    awarded,
                )?;
                self.grades.insert_entry(&entry)?;
                let new_total = current_total + awarded;
                self.finish_total(course, &number, new_total)?;

                info!(
                    "event=grade_record module=grading status=ok number={number} assignment={} days_late={days_late}",
                    assignment.name
                );
                GradeOutcome::Recorded {
                    points_earned: awarded,
                    days_late,
                    penalized,
                }
            }
        };

        Ok(outcome)
    }

    /// Assembles the grade sheet for the selected student.
    pub fn student_report(
        &self,
        course: &Course,
        student_index: usize,
    ) -> Result<StudentReport, GradingError> {
        let student = course
            .student_at(student_index)
            .ok_or(GradingError::SelectionOutOfRange(student_index))?
            .clone();

        let entries = self.grades.list_for_student(&student.number)?;
        let total_possible: u32 = entries.iter().map(|entry| entry.points_possible).sum();
        let total_earned: f64 = entries.iter().map(|entry| entry.points_earned).sum();
        let percent = (total_possible > 0)
            .then(|| total_earned / f64::from(total_possible) * 100.0);

        Ok(StudentReport {
            student,
            entries,
            total_possible,
            total_earned,
            percent,
        })
    }

    /// Updates the in-memory total, then persists it.
    ///
    /// The catalog is updated first so memory keeps tracking the ledger even
    /// when the durable total write fails; that failure is surfaced as
    /// `TotalWriteFailed` and recovered by recomputing totals.
    fn finish_total(
        &self,
        course: &mut Course,
        number: &str,
        total_points: f64,
    ) -> Result<(), GradingError> {
        course.set_total(number, total_points);
        self.students
            .update_total(number, total_points)
            .map_err(|source| {
                warn!(
                    "event=total_write module=grading status=error number={number} error={source}"
                );
                GradingError::TotalWriteFailed {
                    number: number.to_string(),
                    total_points,
                    source,
                }
            })
    }
}
