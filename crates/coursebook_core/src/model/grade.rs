//! Grade ledger entry model.
//!
//! # Responsibility
//! - Define one recorded grade for a (student, assignment) pair.
//!
//! # Invariants
//! - At most one entry exists per (student number, assignment name) pair.
//! - `points_possible` is snapshotted from the assignment at grading time and
//!   is never live-joined back to the catalog.
//! - `points_earned` may be fractional after a late penalty.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};

/// One recorded grade in the course ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    pub student_number: String,
    pub assignment_name: String,
    /// Point value of the assignment at the time the grade was recorded.
    pub points_possible: u32,
    pub points_earned: f64,
}

impl GradeEntry {
    /// Creates a ledger entry after validating the earned points.
    ///
    /// # Errors
    /// - `BlankField` when either key component is blank.
    /// - `NonPositivePointValue` when `points_possible` is zero.
    /// - `PointsOutOfRange` when `points_earned` is negative, not finite, or
    ///   exceeds `points_possible`.
    pub fn new(
        student_number: impl Into<String>,
        assignment_name: impl Into<String>,
        points_possible: u32,
        points_earned: f64,
    ) -> Result<Self, ValidationError> {
        let student_number = student_number.into();
        let assignment_name = assignment_name.into();
        if student_number.trim().is_empty() {
            return Err(ValidationError::BlankField("student number"));
        }
        if assignment_name.trim().is_empty() {
            return Err(ValidationError::BlankField("assignment name"));
        }
        if points_possible == 0 {
            return Err(ValidationError::NonPositivePointValue);
        }
        if !points_earned.is_finite()
            || points_earned < 0.0
            || points_earned > f64::from(points_possible)
        {
            return Err(ValidationError::PointsOutOfRange {
                awarded: points_earned,
                max: points_possible,
            });
        }

        Ok(Self {
            student_number,
            assignment_name,
            points_possible,
            points_earned,
        })
    }
}
