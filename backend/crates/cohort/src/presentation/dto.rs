//! Cohort DTOs
//!
//! The class code only appears in instructor-facing responses; students
//! get it from their teacher, not the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Batch, BatchStatus, BatchType, InstructorRole};
use crate::infra::postgres::{
    BatchStats, ClassworkMaterial, ClassworkTopic, PersonSummary, StreamPost,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub id: Uuid,
    pub batch_type: BatchType,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_code: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub enrollment_start: Option<DateTime<Utc>>,
    pub enrollment_end: Option<DateTime<Utc>>,
    pub max_students: Option<i32>,
    pub current_students: i32,
    pub status: BatchStatus,
    pub is_public: bool,
    pub is_open_for_enrollment: bool,
}

impl BatchResponse {
    pub fn public(batch: Batch) -> Self {
        Self::build(batch, false)
    }

    pub fn for_instructor(batch: Batch) -> Self {
        Self::build(batch, true)
    }

    fn build(batch: Batch, with_code: bool) -> Self {
        let is_open = batch.is_open_for_enrollment();
        Self {
            id: batch.batch_id.into_uuid(),
            batch_type: batch.batch_type,
            name: batch.name,
            slug: batch.slug,
            description: batch.description,
            class_code: with_code.then_some(batch.class_code),
            start_date: batch.start_date,
            end_date: batch.end_date,
            enrollment_start: batch.enrollment_start,
            enrollment_end: batch.enrollment_end,
            max_students: batch.max_students,
            current_students: batch.current_students,
            status: batch.status,
            is_public: batch.is_public,
            is_open_for_enrollment: is_open,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatsResponse {
    pub enrolled: i64,
    pub max_students: Option<i32>,
    pub capacity_pct: Option<f64>,
    pub assignments: i64,
    pub published_assignments: i64,
}

impl From<BatchStats> for BatchStatsResponse {
    fn from(stats: BatchStats) -> Self {
        Self {
            enrolled: stats.enrolled,
            max_students: stats.max_students,
            capacity_pct: stats.capacity_pct,
            assignments: stats.assignments,
            published_assignments: stats.published_assignments,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<InstructorRole>,
}

impl From<PersonSummary> for PersonResponse {
    fn from(person: PersonSummary) -> Self {
        Self {
            id: person.user_id.into_uuid(),
            name: person.name,
            role: person.role,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeopleResponse {
    pub instructors: Vec<PersonResponse>,
    pub students: Vec<PersonResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseBatchesResponse {
    pub batches: Vec<BatchResponse>,
    pub current_batch_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollResponse {
    pub batch_id: Uuid,
    pub already_enrolled: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamPostResponse {
    pub id: Uuid,
    pub author_name: String,
    pub title: Option<String>,
    pub content: String,
    pub is_pinned: bool,
    pub replies_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<StreamPost> for StreamPostResponse {
    fn from(post: StreamPost) -> Self {
        Self {
            id: post.discussion_id,
            author_name: post.author_name,
            title: post.title,
            content: post.content,
            is_pinned: post.is_pinned,
            replies_count: post.replies_count,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassworkTopicResponse {
    pub section_id: Uuid,
    pub course_title: String,
    pub section_title: String,
    pub materials: Vec<ClassworkMaterialResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassworkMaterialResponse {
    pub lesson_id: Uuid,
    pub title: String,
    pub lesson_type: String,
}

impl From<ClassworkTopic> for ClassworkTopicResponse {
    fn from(topic: ClassworkTopic) -> Self {
        Self {
            section_id: topic.section_id,
            course_title: topic.course_title,
            section_title: topic.section_title,
            materials: topic.materials.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<ClassworkMaterial> for ClassworkMaterialResponse {
    fn from(material: ClassworkMaterial) -> Self {
        Self {
            lesson_id: material.lesson_id,
            title: material.title,
            lesson_type: material.lesson_type,
        }
    }
}

// ---------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchRequest {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub enrollment_start: Option<DateTime<Utc>>,
    pub enrollment_end: Option<DateTime<Utc>>,
    pub max_students: Option<i32>,
    #[serde(default)]
    pub course_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBatchRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub enrollment_start: Option<DateTime<Utc>>,
    pub enrollment_end: Option<DateTime<Utc>>,
    pub max_students: Option<i32>,
    pub status: Option<BatchStatus>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachCourseRequest {
    pub course_id: Uuid,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_required: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignInstructorRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub role: InstructorRole,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchListQuery {
    #[serde(rename = "type")]
    pub batch_type: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseBatchesQuery {
    #[serde(default)]
    pub include_all: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinClassRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStreamPostRequest {
    pub title: Option<String>,
    pub content: String,
}
