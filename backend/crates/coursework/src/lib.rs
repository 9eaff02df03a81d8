//! Coursework Backend Module
//!
//! Assignments, submissions, grades, and discussions for batches.

pub mod domain;
pub mod infra;
pub mod presentation;

pub use infra::postgres::PgCourseworkStore;
pub use presentation::router::{discussions_router, instructor_router, student_router};
