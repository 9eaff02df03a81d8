//! Coursework HTTP Handlers

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use auth::CurrentUser;
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{AssignmentId, BatchId, DiscussionId, LessonId, SubmissionId, UserId};

use crate::domain::{Assignment, Discussion, DiscussionType, Grade, Submission};
use crate::infra::postgres::{DiscussionFilter, PgCourseworkStore};
use crate::presentation::dto::{
    AssignmentResponse, CreateAssignmentRequest, CreateDiscussionRequest, DiscussionDetailResponse,
    DiscussionListQuery, DiscussionResponse, GradeResponse, GradeSubmissionRequest,
    StudentAssignmentResponse, SubmissionResponse, SubmissionWithStudentResponse, SubmitRequest,
    UpdateAssignmentRequest, UpdateDiscussionRequest, UpsertGradeRequest,
};

async fn assignment_or_404(
    store: &PgCourseworkStore,
    assignment_id: Uuid,
) -> AppResult<Assignment> {
    store
        .find_assignment(AssignmentId::from_uuid(assignment_id))
        .await?
        .ok_or_else(|| AppError::not_found("Assignment not found"))
}

/// Instructor pivot, classroom ownership, or admin role
async fn require_batch_instructor(
    store: &PgCourseworkStore,
    current: &CurrentUser,
    batch_id: BatchId,
) -> AppResult<()> {
    if current.is_admin() {
        return Ok(());
    }
    if store.is_batch_instructor(batch_id, current.user_id).await? {
        return Ok(());
    }
    Err(AppError::forbidden("You do not manage this batch"))
}

// ---------------------------------------------------------------------
// Instructor: assignments
// ---------------------------------------------------------------------

/// GET /api/v1/instructor/batches/{id}/assignments
pub async fn list_batch_assignments(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<Vec<AssignmentResponse>>> {
    let batch_id = BatchId::from_uuid(batch_id);
    require_batch_instructor(&store, &current, batch_id).await?;

    let assignments = store.list_for_batch(batch_id).await?;
    Ok(Json(
        assignments.into_iter().map(AssignmentResponse::from).collect(),
    ))
}

/// POST /api/v1/instructor/batches/{id}/assignments
pub async fn create_assignment(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
    Path(batch_id): Path<Uuid>,
    Json(req): Json<CreateAssignmentRequest>,
) -> AppResult<(StatusCode, Json<AssignmentResponse>)> {
    let batch_id = BatchId::from_uuid(batch_id);
    require_batch_instructor(&store, &current, batch_id).await?;

    let mut assignment = Assignment::new(batch_id, req.title, req.assignment_type);
    assignment.lesson_id = req.lesson_id.map(LessonId::from_uuid);
    assignment.description = req.description;
    assignment.instructions = req.instructions;
    assignment.content = req.content;
    assignment.available_from = req.available_from;
    assignment.due_date = req.due_date;
    assignment.max_points = req.max_points;
    assignment.is_gradable = req.is_gradable;
    assignment.allow_multiple_submissions = req.allow_multiple_submissions;
    assignment.is_published = req.is_published;
    assignment.is_required = req.is_required;

    store.create_assignment(&assignment).await?;
    Ok((StatusCode::CREATED, Json(assignment.into())))
}

/// GET /api/v1/instructor/assignments/{id}
pub async fn show_assignment(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
    Path(assignment_id): Path<Uuid>,
) -> AppResult<Json<AssignmentResponse>> {
    let assignment = assignment_or_404(&store, assignment_id).await?;
    require_batch_instructor(&store, &current, assignment.batch_id).await?;

    Ok(Json(assignment.into()))
}

/// PUT /api/v1/instructor/assignments/{id}
pub async fn update_assignment(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
    Path(assignment_id): Path<Uuid>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> AppResult<Json<AssignmentResponse>> {
    let mut assignment = assignment_or_404(&store, assignment_id).await?;
    require_batch_instructor(&store, &current, assignment.batch_id).await?;

    if let Some(title) = req.title {
        assignment.title = title;
    }
    if let Some(assignment_type) = req.assignment_type {
        assignment.assignment_type = assignment_type;
    }
    if req.lesson_id.is_some() {
        assignment.lesson_id = req.lesson_id.map(LessonId::from_uuid);
    }
    if req.description.is_some() {
        assignment.description = req.description;
    }
    if req.instructions.is_some() {
        assignment.instructions = req.instructions;
    }
    if req.content.is_some() {
        assignment.content = req.content;
    }
    if req.available_from.is_some() {
        assignment.available_from = req.available_from;
    }
    if req.due_date.is_some() {
        assignment.due_date = req.due_date;
    }
    if req.max_points.is_some() {
        assignment.max_points = req.max_points;
    }
    if let Some(is_gradable) = req.is_gradable {
        assignment.is_gradable = is_gradable;
    }
    if let Some(allow) = req.allow_multiple_submissions {
        assignment.allow_multiple_submissions = allow;
    }
    if let Some(is_published) = req.is_published {
        assignment.is_published = is_published;
    }
    if let Some(is_required) = req.is_required {
        assignment.is_required = is_required;
    }
    assignment.updated_at = chrono::Utc::now();

    store.update_assignment(&assignment).await?;
    Ok(Json(assignment.into()))
}

/// DELETE /api/v1/instructor/assignments/{id}
pub async fn delete_assignment(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
    Path(assignment_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let assignment = assignment_or_404(&store, assignment_id).await?;
    require_batch_instructor(&store, &current, assignment.batch_id).await?;

    store.delete_assignment(assignment.assignment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/instructor/assignments/{id}/submissions
pub async fn list_submissions(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
    Path(assignment_id): Path<Uuid>,
) -> AppResult<Json<Vec<SubmissionWithStudentResponse>>> {
    let assignment = assignment_or_404(&store, assignment_id).await?;
    require_batch_instructor(&store, &current, assignment.batch_id).await?;

    let submissions = store.list_submissions(assignment.assignment_id).await?;
    Ok(Json(
        submissions
            .into_iter()
            .map(SubmissionWithStudentResponse::from)
            .collect(),
    ))
}

/// POST /api/v1/instructor/submissions/{id}/grade
pub async fn grade_submission(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
    Path(submission_id): Path<Uuid>,
    Json(req): Json<GradeSubmissionRequest>,
) -> AppResult<Json<SubmissionResponse>> {
    let mut submission = store
        .find_submission_by_id(SubmissionId::from_uuid(submission_id))
        .await?
        .ok_or_else(|| AppError::not_found("Submission not found"))?;

    let assignment = store
        .find_assignment(submission.assignment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Assignment not found"))?;
    require_batch_instructor(&store, &current, assignment.batch_id).await?;

    if !assignment.is_gradable {
        return Err(AppError::unprocessable("This assignment is not gradable"));
    }

    submission.grade(&assignment, req.points, req.feedback, current.user_id)?;
    store.save_grading(&submission).await?;

    Ok(Json(submission.into()))
}

/// POST /api/v1/instructor/batches/{id}/grades
pub async fn upsert_grade(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
    Path(batch_id): Path<Uuid>,
    Json(req): Json<UpsertGradeRequest>,
) -> AppResult<StatusCode> {
    let batch_id = BatchId::from_uuid(batch_id);
    require_batch_instructor(&store, &current, batch_id).await?;

    let mut grade = Grade::new(batch_id, UserId::from_uuid(req.user_id));
    grade.score = req.score;
    grade.letter = req.letter;
    grade.breakdown = req.breakdown;
    grade.status = req.status;

    store.upsert_grade(&grade).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------
// Student
// ---------------------------------------------------------------------

/// GET /api/v1/student/assignments
pub async fn list_my_assignments(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<StudentAssignmentResponse>>> {
    let assignments = store.list_for_student(current.user_id).await?;
    Ok(Json(
        assignments
            .into_iter()
            .map(StudentAssignmentResponse::from)
            .collect(),
    ))
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAssignmentDetail {
    #[serde(flatten)]
    pub assignment: AssignmentResponse,
    pub submission: Option<SubmissionResponse>,
}

/// GET /api/v1/student/assignments/{id}
pub async fn show_my_assignment(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
    Path(assignment_id): Path<Uuid>,
) -> AppResult<Json<StudentAssignmentDetail>> {
    let assignment = assignment_or_404(&store, assignment_id).await?;
    if !assignment.is_published || !assignment.is_available() {
        return Err(AppError::not_found("Assignment not found"));
    }
    if !store.is_enrolled(assignment.batch_id, current.user_id).await? {
        return Err(AppError::forbidden("You are not enrolled in this batch"));
    }

    let submission = store
        .find_submission(assignment.assignment_id, current.user_id)
        .await?;

    Ok(Json(StudentAssignmentDetail {
        assignment: assignment.into(),
        submission: submission.map(SubmissionResponse::from),
    }))
}

/// POST /api/v1/student/assignments/{id}/submit
pub async fn submit_assignment(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
    Path(assignment_id): Path<Uuid>,
    Json(req): Json<SubmitRequest>,
) -> AppResult<(StatusCode, Json<SubmissionResponse>)> {
    let assignment = assignment_or_404(&store, assignment_id).await?;
    if !assignment.is_published || !assignment.is_available() {
        return Err(AppError::not_found("Assignment not found"));
    }
    if !store.is_enrolled(assignment.batch_id, current.user_id).await? {
        return Err(AppError::forbidden("You are not enrolled in this batch"));
    }

    let existing = store
        .find_submission(assignment.assignment_id, current.user_id)
        .await?;

    let mut submission = match existing {
        Some(prev) => {
            if prev.submitted_at.is_some() && !assignment.allow_multiple_submissions {
                return Err(AppError::conflict(
                    "This assignment does not allow resubmission",
                ));
            }
            prev
        }
        None => Submission::new(assignment.assignment_id, current.user_id),
    };

    submission.content = req.content;
    submission.answers = req.answers;
    submission.files = req.files;
    submission.submit(&assignment);

    store.save_submission(&submission).await?;

    tracing::info!(
        assignment_id = %assignment.assignment_id.as_uuid(),
        status = submission.status.as_str(),
        "submission received"
    );

    Ok((StatusCode::CREATED, Json(submission.into())))
}

/// GET /api/v1/student/grades
pub async fn list_my_grades(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<GradeResponse>>> {
    let grades = store.list_grades(current.user_id).await?;
    Ok(Json(grades.into_iter().map(GradeResponse::from).collect()))
}

// ---------------------------------------------------------------------
// Discussions
// ---------------------------------------------------------------------

async fn discussion_or_404(
    store: &PgCourseworkStore,
    discussion_id: Uuid,
) -> AppResult<Discussion> {
    store
        .find_discussion(DiscussionId::from_uuid(discussion_id))
        .await?
        .ok_or_else(|| AppError::not_found("Discussion not found"))
}

/// GET /api/v1/discussions
pub async fn list_discussions(
    State(store): State<PgCourseworkStore>,
    Query(query): Query<DiscussionListQuery>,
) -> AppResult<Json<Vec<DiscussionResponse>>> {
    let filter = DiscussionFilter {
        batch_id: query.batch.map(BatchId::from_uuid),
        lesson_id: query.lesson.map(LessonId::from_uuid),
        discussion_type: query
            .discussion_type
            .as_deref()
            .map(DiscussionType::parse)
            .transpose()?,
        search: query.search,
    };

    let discussions = store.list_discussions(&filter).await?;
    Ok(Json(
        discussions.into_iter().map(DiscussionResponse::from).collect(),
    ))
}

/// POST /api/v1/discussions
pub async fn create_discussion(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateDiscussionRequest>,
) -> AppResult<(StatusCode, Json<DiscussionResponse>)> {
    let discussion = match req.parent_id {
        Some(parent_id) => {
            let parent = discussion_or_404(&store, parent_id).await?;
            if parent.is_reply() {
                return Err(AppError::unprocessable("Cannot reply to a reply"));
            }
            if parent.is_locked {
                return Err(AppError::conflict("This thread is locked"));
            }
            Discussion::new_reply(current.user_id, &parent, req.content)
        }
        None => {
            let title = req
                .title
                .ok_or_else(|| AppError::bad_request("A thread needs a title"))?;
            if req.discussion_type == DiscussionType::Announcement
                && !current.is_instructor_or_higher()
            {
                return Err(AppError::forbidden(
                    "Only instructors can post announcements",
                ));
            }
            let mut thread =
                Discussion::new_thread(current.user_id, title, req.content, req.discussion_type);
            thread.batch_id = req.batch_id.map(BatchId::from_uuid);
            thread.lesson_id = req.lesson_id.map(LessonId::from_uuid);
            thread
        }
    };

    store.create_discussion(&discussion).await?;
    Ok((
        StatusCode::CREATED,
        Json(DiscussionResponse::from_domain(discussion, None)),
    ))
}

/// GET /api/v1/discussions/{id}
pub async fn show_discussion(
    State(store): State<PgCourseworkStore>,
    Path(discussion_id): Path<Uuid>,
) -> AppResult<Json<DiscussionDetailResponse>> {
    let discussion = discussion_or_404(&store, discussion_id).await?;
    if discussion.is_reply() {
        return Err(AppError::not_found("Discussion not found"));
    }

    store.increment_views(discussion.discussion_id).await?;
    let replies = store.list_replies(discussion.discussion_id).await?;

    Ok(Json(DiscussionDetailResponse {
        discussion: DiscussionResponse::from_domain(discussion, None),
        replies: replies.into_iter().map(DiscussionResponse::from).collect(),
    }))
}

/// PUT /api/v1/discussions/{id}
pub async fn update_discussion(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
    Path(discussion_id): Path<Uuid>,
    Json(req): Json<UpdateDiscussionRequest>,
) -> AppResult<Json<DiscussionResponse>> {
    let mut discussion = discussion_or_404(&store, discussion_id).await?;
    if discussion.user_id != current.user_id && !current.is_admin() {
        return Err(AppError::forbidden("You can only edit your own posts"));
    }

    if req.title.is_some() && !discussion.is_reply() {
        discussion.title = req.title;
    }
    if let Some(content) = req.content {
        discussion.content = content;
    }
    discussion.updated_at = chrono::Utc::now();

    store.update_discussion(&discussion).await?;
    Ok(Json(DiscussionResponse::from_domain(discussion, None)))
}

/// DELETE /api/v1/discussions/{id}
pub async fn delete_discussion(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
    Path(discussion_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let discussion = discussion_or_404(&store, discussion_id).await?;
    if discussion.user_id != current.user_id && !current.is_instructor_or_higher() {
        return Err(AppError::forbidden("You can only delete your own posts"));
    }

    store.delete_discussion(&discussion).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/discussions/{id}/pin
pub async fn toggle_pin(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
    Path(discussion_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !current.is_instructor_or_higher() {
        return Err(AppError::forbidden("Only instructors can pin threads"));
    }
    let discussion = discussion_or_404(&store, discussion_id).await?;
    if discussion.is_reply() {
        return Err(AppError::unprocessable("Replies cannot be pinned"));
    }

    store
        .set_pinned(discussion.discussion_id, !discussion.is_pinned)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/discussions/{id}/lock
pub async fn toggle_lock(
    State(store): State<PgCourseworkStore>,
    Extension(current): Extension<CurrentUser>,
    Path(discussion_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !current.is_instructor_or_higher() {
        return Err(AppError::forbidden("Only instructors can lock threads"));
    }
    let discussion = discussion_or_404(&store, discussion_id).await?;
    if discussion.is_reply() {
        return Err(AppError::unprocessable("Replies cannot be locked"));
    }

    store
        .set_locked(discussion.discussion_id, !discussion.is_locked)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
