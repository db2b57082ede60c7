//! Grading policies.
//!
//! # Responsibility
//! - Define pure date/lateness evaluation and the late-penalty policy.
//!
//! # Invariants
//! - Policy functions are pure; no I/O, no catalog or store access.
//! - Penalty application is opt-in at the workflow layer; nothing here
//!   mutates a grade.

pub mod late;
