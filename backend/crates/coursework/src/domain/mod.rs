//! Domain Layer

pub mod assignment;
pub mod discussion;
pub mod grade;
pub mod submission;

pub use assignment::{Assignment, AssignmentType};
pub use discussion::{Discussion, DiscussionType};
pub use grade::{Grade, GradeStatus};
pub use submission::{Submission, SubmissionStatus};
