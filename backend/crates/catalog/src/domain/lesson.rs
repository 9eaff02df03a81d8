//! Lesson Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{LessonId, SectionId};

/// Lesson content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    #[default]
    Video,
    Text,
    Quiz,
    Assignment,
}

impl LessonType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LessonType::Video => "video",
            LessonType::Text => "text",
            LessonType::Quiz => "quiz",
            LessonType::Assignment => "assignment",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "video" => Ok(LessonType::Video),
            "text" => Ok(LessonType::Text),
            "quiz" => Ok(LessonType::Quiz),
            "assignment" => Ok(LessonType::Assignment),
            _ => Err(AppError::bad_request(format!("Invalid lesson type: {}", s))),
        }
    }
}

/// Lesson entity
#[derive(Debug, Clone)]
pub struct Lesson {
    pub lesson_id: LessonId,
    pub section_id: SectionId,
    pub title: String,
    pub lesson_type: LessonType,
    pub video_url: Option<String>,
    pub video_duration_secs: Option<i32>,
    pub content: Option<String>,
    /// Free preview lessons expose their content to everyone
    pub is_free: bool,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lesson {
    pub fn new(
        section_id: SectionId,
        title: String,
        lesson_type: LessonType,
        sort_order: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            lesson_id: LessonId::new(),
            section_id,
            title,
            lesson_type,
            video_url: None,
            video_duration_secs: None,
            content: None,
            is_free: false,
            is_published: true,
            sort_order,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_type_roundtrip() {
        for ty in [
            LessonType::Video,
            LessonType::Text,
            LessonType::Quiz,
            LessonType::Assignment,
        ] {
            assert_eq!(LessonType::parse(ty.as_str()).unwrap(), ty);
        }
        assert!(LessonType::parse("podcast").is_err());
    }
}
