//! Batch Entity
//!
//! A batch is either a structured cohort tied to purchased courses or
//! a classroom joined by code. Both share the schedule, capacity, and
//! status machinery.

use chrono::{DateTime, Duration, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{BatchId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchType {
    #[default]
    Structured,
    Classroom,
}

impl BatchType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BatchType::Structured => "structured",
            BatchType::Classroom => "classroom",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "structured" => Ok(BatchType::Structured),
            "classroom" => Ok(BatchType::Classroom),
            _ => Err(AppError::bad_request(format!("Invalid batch type: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    #[default]
    Draft,
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl BatchStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Draft => "draft",
            BatchStatus::Open => "open",
            BatchStatus::InProgress => "in_progress",
            BatchStatus::Completed => "completed",
            BatchStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "draft" => Ok(BatchStatus::Draft),
            "open" => Ok(BatchStatus::Open),
            "in_progress" => Ok(BatchStatus::InProgress),
            "completed" => Ok(BatchStatus::Completed),
            "cancelled" => Ok(BatchStatus::Cancelled),
            _ => Err(AppError::bad_request(format!("Invalid batch status: {}", s))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Batch {
    pub batch_id: BatchId,
    pub batch_type: BatchType,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Join code for classrooms, generated for every batch
    pub class_code: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub enrollment_start: Option<DateTime<Utc>>,
    pub enrollment_end: Option<DateTime<Utc>>,
    /// None means unlimited seats
    pub max_students: Option<i32>,
    pub current_students: i32,
    pub status: BatchStatus,
    pub is_public: bool,
    /// Owning instructor, set for classrooms
    pub owner_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Batch {
    pub fn new_structured(name: String) -> Self {
        let now = Utc::now();
        Self {
            batch_id: BatchId::new(),
            batch_type: BatchType::Structured,
            slug: platform::code::slugify_unique(&name),
            name,
            description: None,
            class_code: platform::code::generate_class_code(),
            start_date: None,
            end_date: None,
            enrollment_start: None,
            enrollment_end: None,
            max_students: None,
            current_students: 0,
            status: BatchStatus::Draft,
            is_public: true,
            owner_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Classrooms open immediately, stay private, and accept joins for
    /// a year.
    pub fn new_classroom(owner_id: UserId, name: String) -> Self {
        let now = Utc::now();
        Self {
            batch_id: BatchId::new(),
            batch_type: BatchType::Classroom,
            slug: platform::code::slugify_unique(&name),
            name,
            description: None,
            class_code: platform::code::generate_class_code(),
            start_date: Some(now),
            end_date: None,
            enrollment_start: Some(now),
            enrollment_end: Some(now + Duration::days(365)),
            max_students: None,
            current_students: 0,
            status: BatchStatus::Open,
            is_public: false,
            owner_id: Some(owner_id),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_full(&self) -> bool {
        match self.max_students {
            Some(max) => self.current_students >= max,
            None => false,
        }
    }

    /// Open status, inside the enrollment window, seats left
    pub fn is_open_for_enrollment(&self) -> bool {
        if self.status != BatchStatus::Open || self.is_full() {
            return false;
        }

        let now = Utc::now();
        if let Some(start) = self.enrollment_start {
            if now < start {
                return false;
            }
        }
        if let Some(end) = self.enrollment_end {
            if now > end {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_batch_starts_draft() {
        let batch = Batch::new_structured("Rust Cohort 2026".into());
        assert_eq!(batch.status, BatchStatus::Draft);
        assert!(!batch.is_open_for_enrollment());
        assert_eq!(batch.class_code.len(), 6);
    }

    #[test]
    fn test_classroom_is_open_and_private() {
        let classroom = Batch::new_classroom(UserId::new(), "Algebra 101".into());
        assert_eq!(classroom.batch_type, BatchType::Classroom);
        assert!(!classroom.is_public);
        assert!(classroom.is_open_for_enrollment());
    }

    #[test]
    fn test_full_batch_rejects_enrollment() {
        let mut batch = Batch::new_classroom(UserId::new(), "Full Class".into());
        batch.max_students = Some(2);
        batch.current_students = 2;

        assert!(batch.is_full());
        assert!(!batch.is_open_for_enrollment());
    }

    #[test]
    fn test_unlimited_seats_never_full() {
        let mut batch = Batch::new_classroom(UserId::new(), "Open Class".into());
        batch.current_students = 10_000;
        assert!(!batch.is_full());
    }

    #[test]
    fn test_closed_enrollment_window() {
        let mut batch = Batch::new_classroom(UserId::new(), "Old Class".into());
        batch.enrollment_end = Some(Utc::now() - Duration::days(1));
        assert!(!batch.is_open_for_enrollment());

        batch.enrollment_end = None;
        batch.enrollment_start = Some(Utc::now() + Duration::days(1));
        assert!(!batch.is_open_for_enrollment());
    }

    #[test]
    fn test_cancelled_batch_is_closed() {
        let mut batch = Batch::new_classroom(UserId::new(), "Cancelled".into());
        batch.status = BatchStatus::Cancelled;
        assert!(!batch.is_open_for_enrollment());
    }
}
