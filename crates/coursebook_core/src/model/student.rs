//! Student domain model.
//!
//! # Responsibility
//! - Define the roster record keyed by student number.
//! - Decompose the operator-supplied full name into first/last parts.
//!
//! # Invariants
//! - `number` is immutable once assigned and unique within the course.
//! - `total_points` is a derived cache of the student's ledger sum; it is
//!   recomputable from the ledger at any time.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};

/// Roster record for one enrolled student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Stable student number, e.g. `@01234567`.
    pub number: String,
    pub first_name: String,
    pub last_name: String,
    /// Cached sum of `points_earned` across this student's ledger entries.
    pub total_points: f64,
}

impl Student {
    /// Creates a student from a `First Last` full name and a student number.
    ///
    /// # Errors
    /// - `StudentNameFormat` when the name is not exactly two
    ///   whitespace-separated tokens.
    /// - `BlankField` when the student number is blank.
    pub fn new(full_name: &str, number: impl Into<String>) -> Result<Self, ValidationError> {
        let number = number.into();
        if number.trim().is_empty() {
            return Err(ValidationError::BlankField("student number"));
        }

        let mut tokens = full_name.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(first), Some(last), None) => Ok(Self {
                number,
                first_name: first.to_string(),
                last_name: last.to_string(),
                total_points: 0.0,
            }),
            _ => Err(ValidationError::StudentNameFormat(full_name.to_string())),
        }
    }

    /// Rebuilds a student from persisted parts, keeping the stored total.
    pub fn from_parts(
        number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        total_points: f64,
    ) -> Self {
        Self {
            number: number.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            total_points,
        }
    }

    /// Display name in `First Last` order.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Roster sort key: case-insensitive last name.
    pub fn sort_key(&self) -> String {
        self.last_name.to_lowercase()
    }
}
