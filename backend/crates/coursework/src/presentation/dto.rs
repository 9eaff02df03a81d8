//! Coursework DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Assignment, AssignmentType, Discussion, DiscussionType, GradeStatus, Submission,
    SubmissionStatus,
};
use crate::infra::postgres::{
    DiscussionWithAuthor, GradeWithBatch, StudentAssignment, SubmissionWithStudent,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub lesson_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub assignment_type: AssignmentType,
    pub content: Option<serde_json::Value>,
    pub available_from: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub max_points: Option<Decimal>,
    pub is_gradable: bool,
    pub allow_multiple_submissions: bool,
    pub is_published: bool,
    pub is_required: bool,
}

impl From<Assignment> for AssignmentResponse {
    fn from(a: Assignment) -> Self {
        Self {
            id: a.assignment_id.into_uuid(),
            batch_id: a.batch_id.into_uuid(),
            lesson_id: a.lesson_id.map(|id| id.into_uuid()),
            title: a.title,
            description: a.description,
            instructions: a.instructions,
            assignment_type: a.assignment_type,
            content: a.content,
            available_from: a.available_from,
            due_date: a.due_date,
            max_points: a.max_points,
            is_gradable: a.is_gradable,
            allow_multiple_submissions: a.allow_multiple_submissions,
            is_published: a.is_published,
            is_required: a.is_required,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAssignmentResponse {
    #[serde(flatten)]
    pub assignment: AssignmentResponse,
    pub batch_name: String,
    pub submission_status: Option<SubmissionStatus>,
}

impl From<StudentAssignment> for StudentAssignmentResponse {
    fn from(sa: StudentAssignment) -> Self {
        Self {
            assignment: sa.assignment.into(),
            batch_name: sa.batch_name,
            submission_status: sa.submission_status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub content: Option<String>,
    pub answers: Option<serde_json::Value>,
    pub files: Option<serde_json::Value>,
    pub status: SubmissionStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub points: Option<Decimal>,
    pub feedback: Option<String>,
    pub graded_at: Option<DateTime<Utc>>,
}

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        Self {
            id: s.submission_id.into_uuid(),
            assignment_id: s.assignment_id.into_uuid(),
            content: s.content,
            answers: s.answers,
            files: s.files,
            status: s.status,
            submitted_at: s.submitted_at,
            points: s.points,
            feedback: s.feedback,
            graded_at: s.graded_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionWithStudentResponse {
    #[serde(flatten)]
    pub submission: SubmissionResponse,
    pub student_name: String,
}

impl From<SubmissionWithStudent> for SubmissionWithStudentResponse {
    fn from(s: SubmissionWithStudent) -> Self {
        Self {
            submission: s.submission.into(),
            student_name: s.student_name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeResponse {
    pub batch_id: Uuid,
    pub batch_name: String,
    pub score: Option<Decimal>,
    pub letter: Option<String>,
    pub breakdown: Option<serde_json::Value>,
    pub status: GradeStatus,
    pub updated_at: DateTime<Utc>,
}

impl From<GradeWithBatch> for GradeResponse {
    fn from(g: GradeWithBatch) -> Self {
        Self {
            batch_id: g.grade.batch_id.into_uuid(),
            batch_name: g.batch_name,
            score: g.grade.score,
            letter: g.grade.letter,
            breakdown: g.grade.breakdown,
            status: g.grade.status,
            updated_at: g.grade.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionResponse {
    pub id: Uuid,
    pub batch_id: Option<Uuid>,
    pub lesson_id: Option<Uuid>,
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub parent_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: String,
    pub discussion_type: DiscussionType,
    pub is_pinned: bool,
    pub is_locked: bool,
    pub replies_count: i32,
    pub views_count: i32,
    pub created_at: DateTime<Utc>,
}

impl DiscussionResponse {
    pub fn from_domain(d: Discussion, author_name: Option<String>) -> Self {
        Self {
            id: d.discussion_id.into_uuid(),
            batch_id: d.batch_id.map(|id| id.into_uuid()),
            lesson_id: d.lesson_id.map(|id| id.into_uuid()),
            author_id: d.user_id.into_uuid(),
            author_name,
            parent_id: d.parent_id.map(|id| id.into_uuid()),
            title: d.title,
            content: d.content,
            discussion_type: d.discussion_type,
            is_pinned: d.is_pinned,
            is_locked: d.is_locked,
            replies_count: d.replies_count,
            views_count: d.views_count,
            created_at: d.created_at,
        }
    }
}

impl From<DiscussionWithAuthor> for DiscussionResponse {
    fn from(d: DiscussionWithAuthor) -> Self {
        Self::from_domain(d.discussion, Some(d.author_name))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionDetailResponse {
    #[serde(flatten)]
    pub discussion: DiscussionResponse,
    pub replies: Vec<DiscussionResponse>,
}

// ---------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    #[serde(default)]
    pub assignment_type: AssignmentType,
    pub lesson_id: Option<Uuid>,
    pub content: Option<serde_json::Value>,
    pub available_from: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub max_points: Option<Decimal>,
    #[serde(default = "default_true")]
    pub is_gradable: bool,
    #[serde(default)]
    pub allow_multiple_submissions: bool,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default = "default_true")]
    pub is_required: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub assignment_type: Option<AssignmentType>,
    pub lesson_id: Option<Uuid>,
    pub content: Option<serde_json::Value>,
    pub available_from: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub max_points: Option<Decimal>,
    pub is_gradable: Option<bool>,
    pub allow_multiple_submissions: Option<bool>,
    pub is_published: Option<bool>,
    pub is_required: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub content: Option<String>,
    pub answers: Option<serde_json::Value>,
    pub files: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSubmissionRequest {
    pub points: Decimal,
    pub feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertGradeRequest {
    pub user_id: Uuid,
    pub score: Option<Decimal>,
    pub letter: Option<String>,
    pub breakdown: Option<serde_json::Value>,
    #[serde(default)]
    pub status: GradeStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionListQuery {
    pub batch: Option<Uuid>,
    pub lesson: Option<Uuid>,
    #[serde(rename = "type")]
    pub discussion_type: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscussionRequest {
    pub batch_id: Option<Uuid>,
    pub lesson_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub discussion_type: DiscussionType,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDiscussionRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}
