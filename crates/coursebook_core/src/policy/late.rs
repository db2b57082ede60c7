//! Date parsing, lateness evaluation and the late-penalty policy.
//!
//! # Responsibility
//! - Parse operator-entered calendar dates in strict `YYYY-MM-DD` shape.
//! - Compute whole days of lateness between due and submission dates.
//! - Translate lateness into a penalty multiplier in `[0, 1]`.
//!
//! # Invariants
//! - Date input must be exactly three numeric `-`-separated components and a
//!   real calendar date; everything else is a recoverable validation error.
//! - `multiplier` is `1` at or before the due date and exactly `0` once
//!   lateness reaches the policy floor.

use crate::model::ValidationError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static COURSE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,4})-(\d{1,2})-(\d{1,2})$").expect("valid date regex"));

/// Parses a calendar date entered as `YYYY-MM-DD`.
///
/// # Errors
/// - `InvalidDate` when the input is not three numeric components or does not
///   name a real calendar date (e.g. `2020-13-45`).
pub fn parse_course_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    let invalid = || ValidationError::InvalidDate(input.to_string());

    let captures = COURSE_DATE_RE.captures(trimmed).ok_or_else(invalid)?;
    let year: i32 = captures[1].parse().map_err(|_| invalid())?;
    let month: u32 = captures[2].parse().map_err(|_| invalid())?;
    let day: u32 = captures[3].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Whole days between due date and submission date.
///
/// Positive means late; zero or negative means on time or early.
pub fn days_late(due_date: NaiveDate, submitted: NaiveDate) -> i64 {
    submitted.signed_duration_since(due_date).num_days()
}

/// Linear-decay late penalty: a fixed percent per day late, floored at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatePolicy {
    /// Percent of the awarded points lost per day late.
    pub penalty_percent_per_day: u32,
    /// Lateness at which the multiplier becomes exactly zero.
    pub zero_floor_days: i64,
}

impl Default for LatePolicy {
    fn default() -> Self {
        Self {
            penalty_percent_per_day: 10,
            zero_floor_days: 10,
        }
    }
}

impl LatePolicy {
    /// Total penalty percent for the given lateness, capped at 100.
    pub fn penalty_percent(&self, days_late: i64) -> u32 {
        if days_late <= 0 {
            return 0;
        }
        let days = u32::try_from(days_late).unwrap_or(u32::MAX);
        days.saturating_mul(self.penalty_percent_per_day).min(100)
    }

    /// Fraction of awarded points retained after the penalty.
    ///
    /// `1.0` for on-time or early submissions, exactly `0.0` at or beyond
    /// `zero_floor_days`, linear in between.
    pub fn multiplier(&self, days_late: i64) -> f64 {
        if days_late <= 0 {
            return 1.0;
        }
        if days_late >= self.zero_floor_days {
            return 0.0;
        }
        f64::from(100 - self.penalty_percent(days_late)) / 100.0
    }
}
