//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the roster, the
//!   assignment catalog and the grade ledger.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - All statements are parameterized; operator-entered text is never
//!   interpolated into SQL.
//! - Repository APIs return semantic errors (`NotFound`, `Duplicate`) in
//!   addition to DB transport errors.
//! - Every implementation is scoped to a single course at construction.

use crate::db::DbError;
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod assignment_repo;
pub mod grade_repo;
pub mod student_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Business key of a persisted record, used in semantic errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKey {
    Student(String),
    Assignment(String),
    Grade { student: String, assignment: String },
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student(number) => write!(f, "student {number}"),
            Self::Assignment(name) => write!(f, "assignment `{name}`"),
            Self::Grade {
                student,
                assignment,
            } => write!(f, "grade for {student} on `{assignment}`"),
        }
    }
}

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// A record with this key already exists; nothing was written.
    Duplicate(RecordKey),
    /// No record with this key exists; the logical operation aborts.
    NotFound(RecordKey),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Duplicate(key) => write!(f, "{key} already exists"),
            Self::NotFound(key) => write!(f, "{key} not found"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Duplicate(_) | Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps a unique-constraint violation on insert to a keyed `Duplicate`.
pub(crate) fn map_insert_error(err: rusqlite::Error, key: RecordKey) -> RepoError {
    if let rusqlite::Error::SqliteFailure(inner, _) = &err {
        if inner.code == rusqlite::ErrorCode::ConstraintViolation {
            return RepoError::Duplicate(key);
        }
    }
    err.into()
}
