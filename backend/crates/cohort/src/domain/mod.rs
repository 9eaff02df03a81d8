//! Domain Layer

pub mod batch;
pub mod pivot;

pub use batch::{Batch, BatchStatus, BatchType};
pub use pivot::{BatchCourse, BatchInstructor, InstructorRole};
