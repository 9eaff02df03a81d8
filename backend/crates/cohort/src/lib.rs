//! Cohort Backend Module
//!
//! Batches in two flavors: structured cohorts that students join after
//! purchasing the batch's course, and classrooms that students join by
//! code. Seat limits are enforced under a row lock.

pub mod domain;
pub mod infra;
pub mod presentation;

pub use infra::postgres::PgCohortStore;
pub use presentation::router::{
    admin_router, classes_router, instructor_router, student_router,
};
