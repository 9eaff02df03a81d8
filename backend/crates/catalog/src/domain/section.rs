//! Section Entity

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, SectionId};

/// A titled group of lessons inside a course
#[derive(Debug, Clone)]
pub struct Section {
    pub section_id: SectionId,
    pub course_id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Section {
    pub fn new(course_id: CourseId, title: String, sort_order: i32) -> Self {
        let now = Utc::now();
        Self {
            section_id: SectionId::new(),
            course_id,
            title,
            description: None,
            sort_order,
            created_at: now,
            updated_at: now,
        }
    }
}
