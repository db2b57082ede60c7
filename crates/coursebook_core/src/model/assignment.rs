//! Assignment domain model.
//!
//! # Responsibility
//! - Define the catalog record keyed by assignment name.
//!
//! # Invariants
//! - `name` is the unique key within the course; edits never rename.
//! - `point_value` is the positive integer maximum awardable.

use crate::model::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Catalog record for one course assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    /// Calendar due date, no time component.
    pub due_date: NaiveDate,
    /// Maximum awardable points.
    pub point_value: u32,
}

impl Assignment {
    /// Creates an assignment after validating name and point value.
    ///
    /// # Errors
    /// - `BlankField` when the name is blank after trimming.
    /// - `NonPositivePointValue` when `point_value` is zero.
    pub fn new(
        name: impl Into<String>,
        due_date: NaiveDate,
        point_value: u32,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::BlankField("assignment name"));
        }
        if point_value == 0 {
            return Err(ValidationError::NonPositivePointValue);
        }

        Ok(Self {
            name,
            due_date,
            point_value,
        })
    }
}
