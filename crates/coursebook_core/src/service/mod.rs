//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs: roster/catalog
//!   management and the grading workflow.
//! - Keep CLI layers decoupled from storage details.
//!
//! # Invariants
//! - Services receive the course catalog explicitly; there is no global
//!   current-course state.
//! - Durable writes happen before the paired in-memory catalog mutation.

pub mod grading_service;
pub mod roster_service;
