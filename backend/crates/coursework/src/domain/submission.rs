//! Submission Entity
//!
//! One row per assignment and student; resubmission updates the row
//! in place. Submitting after the due date marks the row `late`.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{AssignmentId, SubmissionId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::Assignment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Draft,
    Submitted,
    Late,
    Graded,
}

impl SubmissionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Draft => "draft",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Late => "late",
            SubmissionStatus::Graded => "graded",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "draft" => Ok(SubmissionStatus::Draft),
            "submitted" => Ok(SubmissionStatus::Submitted),
            "late" => Ok(SubmissionStatus::Late),
            "graded" => Ok(SubmissionStatus::Graded),
            _ => Err(AppError::bad_request(format!(
                "Invalid submission status: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub submission_id: SubmissionId,
    pub assignment_id: AssignmentId,
    pub user_id: UserId,
    pub content: Option<String>,
    /// Quiz answers, shape mirroring the assignment content
    pub answers: Option<serde_json::Value>,
    /// Client-supplied file metadata; no upload handling here
    pub files: Option<serde_json::Value>,
    pub status: SubmissionStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub points: Option<Decimal>,
    pub feedback: Option<String>,
    pub graded_by: Option<UserId>,
    pub graded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(assignment_id: AssignmentId, user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            submission_id: SubmissionId::new(),
            assignment_id,
            user_id,
            content: None,
            answers: None,
            files: None,
            status: SubmissionStatus::Draft,
            submitted_at: None,
            points: None,
            feedback: None,
            graded_by: None,
            graded_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark submitted, or late when the assignment's due date passed
    pub fn submit(&mut self, assignment: &Assignment) {
        self.status = if assignment.is_past_due() {
            SubmissionStatus::Late
        } else {
            SubmissionStatus::Submitted
        };
        self.submitted_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Award points and feedback. Points above the assignment's
    /// maximum are rejected.
    pub fn grade(
        &mut self,
        assignment: &Assignment,
        points: Decimal,
        feedback: Option<String>,
        graded_by: UserId,
    ) -> AppResult<()> {
        if points < Decimal::ZERO {
            return Err(AppError::unprocessable("Points cannot be negative"));
        }
        if let Some(max) = assignment.max_points {
            if points > max {
                return Err(AppError::unprocessable(format!(
                    "Points cannot exceed the maximum of {}",
                    max
                )));
            }
        }

        self.points = Some(points);
        self.feedback = feedback;
        self.graded_by = Some(graded_by);
        self.graded_at = Some(Utc::now());
        self.status = SubmissionStatus::Graded;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AssignmentType;
    use chrono::Duration;
    use kernel::id::BatchId;
    use rust_decimal_macros::dec;

    fn assignment() -> Assignment {
        Assignment::new(BatchId::new(), "Homework".into(), AssignmentType::Assignment)
    }

    #[test]
    fn test_submit_before_due_date() {
        let mut a = assignment();
        a.due_date = Some(Utc::now() + Duration::days(1));

        let mut submission = Submission::new(a.assignment_id, UserId::new());
        submission.submit(&a);
        assert_eq!(submission.status, SubmissionStatus::Submitted);
        assert!(submission.submitted_at.is_some());
    }

    #[test]
    fn test_submit_past_due_is_late() {
        let mut a = assignment();
        a.due_date = Some(Utc::now() - Duration::hours(1));

        let mut submission = Submission::new(a.assignment_id, UserId::new());
        submission.submit(&a);
        assert_eq!(submission.status, SubmissionStatus::Late);
    }

    #[test]
    fn test_grade_within_max_points() {
        let mut a = assignment();
        a.max_points = Some(dec!(100));

        let mut submission = Submission::new(a.assignment_id, UserId::new());
        submission.submit(&a);

        let grader = UserId::new();
        submission
            .grade(&a, dec!(87.5), Some("Good work".into()), grader)
            .unwrap();

        assert_eq!(submission.status, SubmissionStatus::Graded);
        assert_eq!(submission.points, Some(dec!(87.5)));
        assert_eq!(submission.graded_by, Some(grader));
    }

    #[test]
    fn test_grade_above_max_points_rejected() {
        let mut a = assignment();
        a.max_points = Some(dec!(10));

        let mut submission = Submission::new(a.assignment_id, UserId::new());
        let err = submission.grade(&a, dec!(11), None, UserId::new()).unwrap_err();
        assert_eq!(
            err.kind(),
            kernel::error::kind::ErrorKind::UnprocessableEntity
        );
    }

    #[test]
    fn test_negative_points_rejected() {
        let a = assignment();
        let mut submission = Submission::new(a.assignment_id, UserId::new());
        assert!(submission.grade(&a, dec!(-1), None, UserId::new()).is_err());
    }
}
