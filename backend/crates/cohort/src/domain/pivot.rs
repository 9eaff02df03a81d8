//! Batch Pivots

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{BatchId, CourseId, UserId};
use serde::{Deserialize, Serialize};

/// Course attached to a batch, in curriculum order
#[derive(Debug, Clone)]
pub struct BatchCourse {
    pub batch_id: BatchId,
    pub course_id: CourseId,
    pub sort_order: i32,
    pub is_required: bool,
    pub created_at: DateTime<Utc>,
}

impl BatchCourse {
    pub fn new(batch_id: BatchId, course_id: CourseId, sort_order: i32, is_required: bool) -> Self {
        Self {
            batch_id,
            course_id,
            sort_order,
            is_required,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructorRole {
    Primary,
    #[default]
    Instructor,
    Assistant,
}

impl InstructorRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            InstructorRole::Primary => "primary",
            InstructorRole::Instructor => "instructor",
            InstructorRole::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "primary" => Ok(InstructorRole::Primary),
            "instructor" => Ok(InstructorRole::Instructor),
            "assistant" => Ok(InstructorRole::Assistant),
            _ => Err(AppError::bad_request(format!(
                "Invalid instructor role: {}",
                s
            ))),
        }
    }
}

/// Instructor assigned to a batch
#[derive(Debug, Clone)]
pub struct BatchInstructor {
    pub batch_id: BatchId,
    pub user_id: UserId,
    pub role: InstructorRole,
    pub created_at: DateTime<Utc>,
}

impl BatchInstructor {
    pub fn new(batch_id: BatchId, user_id: UserId, role: InstructorRole) -> Self {
        Self {
            batch_id,
            user_id,
            role,
            created_at: Utc::now(),
        }
    }
}
