//! Domain Layer

pub mod category;
pub mod course;
pub mod lesson;
pub mod section;

pub use category::Category;
pub use course::{Course, CourseLevel, CourseStatus, CourseType};
pub use lesson::{Lesson, LessonType};
pub use section::Section;
