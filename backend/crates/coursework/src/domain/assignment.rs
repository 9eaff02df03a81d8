//! Assignment Entity

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{AssignmentId, BatchId, LessonId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentType {
    #[default]
    Assignment,
    Quiz,
    Project,
    Discussion,
}

impl AssignmentType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AssignmentType::Assignment => "assignment",
            AssignmentType::Quiz => "quiz",
            AssignmentType::Project => "project",
            AssignmentType::Discussion => "discussion",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "assignment" => Ok(AssignmentType::Assignment),
            "quiz" => Ok(AssignmentType::Quiz),
            "project" => Ok(AssignmentType::Project),
            "discussion" => Ok(AssignmentType::Discussion),
            _ => Err(AppError::bad_request(format!(
                "Invalid assignment type: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Assignment {
    pub assignment_id: AssignmentId,
    pub batch_id: BatchId,
    pub lesson_id: Option<LessonId>,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub assignment_type: AssignmentType,
    /// Structured body (quiz questions etc.), shape owned by the client
    pub content: Option<serde_json::Value>,
    pub available_from: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub max_points: Option<Decimal>,
    pub is_gradable: bool,
    pub allow_multiple_submissions: bool,
    pub is_published: bool,
    pub is_required: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn new(batch_id: BatchId, title: String, assignment_type: AssignmentType) -> Self {
        let now = Utc::now();
        Self {
            assignment_id: AssignmentId::new(),
            batch_id,
            lesson_id: None,
            title,
            description: None,
            instructions: None,
            assignment_type,
            content: None,
            available_from: None,
            due_date: None,
            max_points: None,
            is_gradable: true,
            allow_multiple_submissions: false,
            is_published: false,
            is_required: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_available(&self) -> bool {
        match self.available_from {
            Some(from) => Utc::now() >= from,
            None => true,
        }
    }

    pub fn is_past_due(&self) -> bool {
        match self.due_date {
            Some(due) => Utc::now() > due,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_no_due_date_never_past_due() {
        let assignment = Assignment::new(BatchId::new(), "Essay".into(), AssignmentType::Assignment);
        assert!(!assignment.is_past_due());
        assert!(assignment.is_available());
    }

    #[test]
    fn test_availability_window() {
        let mut assignment =
            Assignment::new(BatchId::new(), "Quiz 1".into(), AssignmentType::Quiz);
        assignment.available_from = Some(Utc::now() + Duration::hours(1));
        assert!(!assignment.is_available());

        assignment.available_from = Some(Utc::now() - Duration::hours(1));
        assert!(assignment.is_available());
    }

    #[test]
    fn test_past_due() {
        let mut assignment =
            Assignment::new(BatchId::new(), "Project".into(), AssignmentType::Project);
        assignment.due_date = Some(Utc::now() - Duration::minutes(5));
        assert!(assignment.is_past_due());
    }
}
